use chrono::NaiveDateTime;
use dose_scheduler::{
    derive_alerts, frequency_interval, generate_schedule, parse_instant, project_today_agenda,
    treatment_end, units::day_bounds, DoseLedger, DoseStatus, MemberSummary, ScheduleError,
    TimeUnit, TreatmentDefinition, TreatmentStatus, MAX_DOSES,
};
use std::collections::HashMap;

fn at(text: &str) -> NaiveDateTime {
    parse_instant(text).unwrap()
}

fn treatment(
    id: &str,
    start: &str,
    frequency: (i64, TimeUnit),
    duration: (i64, TimeUnit),
) -> TreatmentDefinition {
    TreatmentDefinition {
        id: id.to_string(),
        member_id: "mom".to_string(),
        medication_name: "Paracetamol".to_string(),
        dosage: "1 tablet".to_string(),
        frequency_value: frequency.0,
        frequency_unit: frequency.1,
        duration_value: duration.0,
        duration_unit: duration.1,
        start: at(start),
        status: TreatmentStatus::Active,
        notes: None,
    }
}

fn members() -> HashMap<String, MemberSummary> {
    let mut map = HashMap::new();
    map.insert("mom".to_string(), MemberSummary {
        id: "mom".to_string(),
        name: "Mom".to_string(),
        avatar: None,
    });
    map
}

#[test]
fn eight_hourly_two_day_course_has_seven_doses() {
    let t = treatment("t1", "2024-01-01T08:00", (8, TimeUnit::Hours), (2, TimeUnit::Days));
    let schedule = generate_schedule(&t).unwrap();

    assert_eq!(schedule.len(), 7);
    assert_eq!(schedule[0].scheduled_time, t.start);
    assert_eq!(schedule[6].scheduled_time, at("2024-01-03T08:00"));
    assert!(schedule.len() <= MAX_DOSES);
    assert!(schedule.windows(2).all(|w| w[0].scheduled_time < w[1].scheduled_time));
}

#[test]
fn agenda_advances_past_yesterday() {
    let t = treatment("t1", "2024-01-01T06:00", (12, TimeUnit::Hours), (10, TimeUnit::Days));
    let items = project_today_agenda(&[t], &members(), at("2024-01-02T10:00")).unwrap();

    let times: Vec<NaiveDateTime> = items.iter().map(|i| i.scheduled_time).collect();
    assert_eq!(times, vec![at("2024-01-02T06:00"), at("2024-01-02T18:00")]);
}

#[test]
fn agenda_ignores_treatment_starting_tomorrow() {
    let t = treatment("t1", "2024-01-03T06:00", (12, TimeUnit::Hours), (10, TimeUnit::Days));
    let items = project_today_agenda(&[t], &members(), at("2024-01-02T10:00")).unwrap();
    assert!(items.is_empty());
}

#[test]
fn monthly_course_pins_calendar_end_and_flat_step() {
    let t = treatment("t1", "2024-01-31T08:00", (1, TimeUnit::Months), (1, TimeUnit::Months));

    assert_eq!(treatment_end(&t).unwrap(), at("2024-02-29T08:00"));
    let step = t.start + frequency_interval(1, TimeUnit::Months).unwrap();
    assert_eq!(step, at("2024-03-01T08:00"));

    let schedule = generate_schedule(&t).unwrap();
    assert_eq!(schedule.len(), 1);
}

#[test]
fn overdue_dose_alerts_until_taken() {
    let now = at("2024-01-02T10:00");
    let t = treatment("t1", "2024-01-02T08:00", (12, TimeUnit::Hours), (3, TimeUnit::Days));
    let mut items = project_today_agenda(&[t], &members(), now).unwrap();

    assert_eq!(items[0].status(now), DoseStatus::Overdue);
    let alerts = derive_alerts(&items, now);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Paracetamol for Mom was scheduled for 08:00.");

    let mut ledger = DoseLedger::new();
    ledger.mark_taken(&alerts[0].id);
    ledger.mark_taken(&alerts[0].id);
    ledger.apply(&mut items);

    assert!(derive_alerts(&items, now).is_empty());
    assert!(items[0].taken);
}

#[test]
fn zero_frequency_signals_invalid_frequency() {
    let t = treatment("t1", "2024-01-01T08:00", (0, TimeUnit::Hours), (2, TimeUnit::Days));
    let err = generate_schedule(&t).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidFrequency(_)));
}

#[test]
fn agenda_stays_within_today_for_mixed_treatments() {
    let now = at("2024-06-15T13:20");
    let (start, end) = day_bounds(now);
    let treatments = vec![
        treatment("a", "2024-06-01T07:45", (5, TimeUnit::Hours), (1, TimeUnit::Months)),
        treatment("b", "2024-06-14T22:00", (1, TimeUnit::Days), (1, TimeUnit::Weeks)),
        treatment("c", "2024-06-15T13:00", (3, TimeUnit::Hours), (2, TimeUnit::Days)),
        treatment("d", "2024-06-15T14:00", (3, TimeUnit::Hours), (2, TimeUnit::Days)),
    ];

    let items = project_today_agenda(&treatments, &members(), now).unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i.scheduled_time >= start && i.scheduled_time <= end));
    assert!(items.iter().all(|i| i.treatment_id != "d"));
    assert!(items.windows(2).all(|w| w[0].scheduled_time <= w[1].scheduled_time));

    let alerts = derive_alerts(&items, now);
    assert!(alerts.iter().all(|a| {
        let item = items.iter().find(|i| i.id == a.id).unwrap();
        item.scheduled_time < now && !item.taken
    }));
}
