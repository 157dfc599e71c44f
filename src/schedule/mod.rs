use crate::error::ScheduleResult;
use crate::models::{ScheduledDose, TreatmentDefinition};
use crate::units::add_interval;
use chrono::{Duration, NaiveDateTime};
use log::{debug, warn};

/// Upper bound on doses generated for a single treatment.
pub const MAX_DOSES: usize = 1000;

/// Calendar end of a treatment: start plus its duration.
pub fn treatment_end(treatment: &TreatmentDefinition) -> ScheduleResult<NaiveDateTime> {
    add_interval(treatment.start, treatment.duration_value, treatment.duration_unit)
}

/// Generate every dose of a treatment from its start up to and including its
/// end date.
///
/// The end date uses calendar arithmetic while dose stepping uses the flat
/// frequency interval, so a monthly treatment steps by 720 hours.
pub fn generate_schedule(treatment: &TreatmentDefinition) -> ScheduleResult<Vec<ScheduledDose>> {
    generate_schedule_with_end(treatment).map(|(_, doses)| doses)
}

/// Like `generate_schedule`, also returning the calendar end date it stepped to.
pub fn generate_schedule_with_end(
    treatment: &TreatmentDefinition,
) -> ScheduleResult<(NaiveDateTime, Vec<ScheduledDose>)> {
    treatment.validate()?;

    let end = treatment_end(treatment)?;
    let interval = treatment.interval()?;
    let (doses, truncated) = step_doses(treatment, end, interval, MAX_DOSES);

    if truncated {
        warn!(
            "Schedule for treatment {} truncated at {} doses (end {}); upstream validation was bypassed",
            treatment.id, MAX_DOSES, end
        );
    }

    debug!("Generated {} doses for treatment {} ending {}", doses.len(), treatment.id, end);
    Ok((end, doses))
}

/// Step from the start to `end`, stopping at `cap` doses. The flag is set
/// only when the cap cut off doses that were still on or before `end`.
fn step_doses(
    treatment: &TreatmentDefinition,
    end: NaiveDateTime,
    interval: Duration,
    cap: usize,
) -> (Vec<ScheduledDose>, bool) {
    let mut doses = Vec::new();
    let mut current = Some(treatment.start);

    while let Some(time) = current {
        if time > end {
            break;
        }
        if doses.len() >= cap {
            return (doses, true);
        }

        doses.push(ScheduledDose {
            treatment_id: treatment.id.clone(),
            scheduled_time: time,
            sequence_index: doses.len(),
        });
        current = time.checked_add_signed(interval);
    }

    (doses, false)
}

/// Doses still ahead of `now`, for handing to a reminder service.
pub fn upcoming_doses(schedule: &[ScheduledDose], now: NaiveDateTime) -> Vec<ScheduledDose> {
    schedule.iter()
        .filter(|dose| dose.scheduled_time > now)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::fixtures::treatment;
    use crate::units::{parse_instant, TimeUnit};

    fn at(text: &str) -> NaiveDateTime {
        parse_instant(text).unwrap()
    }

    #[test]
    fn test_eight_hourly_for_two_days() {
        let t = treatment("t1", "2024-01-01T08:00", (8, TimeUnit::Hours), (2, TimeUnit::Days));
        let schedule = generate_schedule(&t).unwrap();

        let times: Vec<NaiveDateTime> = schedule.iter().map(|d| d.scheduled_time).collect();
        assert_eq!(times, vec![
            at("2024-01-01T08:00"),
            at("2024-01-01T16:00"),
            at("2024-01-02T00:00"),
            at("2024-01-02T08:00"),
            at("2024-01-02T16:00"),
            at("2024-01-03T00:00"),
            at("2024-01-03T08:00"),
        ]);
        let indices: Vec<usize> = schedule.iter().map(|d| d.sequence_index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_monthly_frequency_uses_flat_hours() {
        let t = treatment("t1", "2024-01-31T08:00", (1, TimeUnit::Months), (1, TimeUnit::Months));
        assert_eq!(treatment_end(&t).unwrap(), at("2024-02-29T08:00"));

        // next flat step lands on 2024-03-01, past the calendar end
        let schedule = generate_schedule(&t).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].scheduled_time, at("2024-01-31T08:00"));

        let t = treatment("t2", "2024-01-31T08:00", (1, TimeUnit::Months), (2, TimeUnit::Months));
        let schedule = generate_schedule(&t).unwrap();
        assert_eq!(treatment_end(&t).unwrap(), at("2024-03-31T08:00"));
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[1].scheduled_time, at("2024-03-01T08:00"));
        assert_eq!(schedule[2].scheduled_time, at("2024-03-31T08:00"));
    }

    #[test]
    fn test_zero_frequency_is_rejected() {
        let t = treatment("t1", "2024-01-01T08:00", (0, TimeUnit::Hours), (2, TimeUnit::Days));
        let err = generate_schedule(&t).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidFrequency(_)));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let t = treatment("t1", "2024-01-01T08:00", (8, TimeUnit::Hours), (-1, TimeUnit::Days));
        let err = generate_schedule(&t).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDuration(_)));
    }

    #[test]
    fn test_frequency_longer_than_duration_yields_start_only() {
        let t = treatment("t1", "2024-01-01T08:00", (2, TimeUnit::Weeks), (3, TimeUnit::Days));
        let schedule = generate_schedule(&t).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].scheduled_time, t.start);
    }

    #[test]
    fn test_runaway_generation_is_capped() {
        let t = treatment("t1", "2024-01-01T00:00", (1, TimeUnit::Hours), (12, TimeUnit::Months));
        let schedule = generate_schedule(&t).unwrap();
        assert_eq!(schedule.len(), MAX_DOSES);
        assert_eq!(schedule.last().unwrap().sequence_index, MAX_DOSES - 1);
    }

    #[test]
    fn test_exactly_max_doses_is_not_truncated() {
        // hourly over 999 hours: doses at 0..=999 hours, the next step is past the end
        let t = treatment("t1", "2024-01-01T00:00", (1, TimeUnit::Hours), (999, TimeUnit::Hours));
        let end = treatment_end(&t).unwrap();
        let (doses, truncated) = step_doses(&t, end, t.interval().unwrap(), MAX_DOSES);
        assert_eq!(doses.len(), MAX_DOSES);
        assert!(!truncated);
        assert_eq!(doses.last().unwrap().scheduled_time, end);
    }

    #[test]
    fn test_one_past_max_doses_is_truncated() {
        let t = treatment("t1", "2024-01-01T00:00", (1, TimeUnit::Hours), (1000, TimeUnit::Hours));
        let end = treatment_end(&t).unwrap();
        let (doses, truncated) = step_doses(&t, end, t.interval().unwrap(), MAX_DOSES);
        assert_eq!(doses.len(), MAX_DOSES);
        assert!(truncated);
    }

    #[test]
    fn test_generate_with_end_matches_treatment_end() {
        let t = treatment("t1", "2024-01-31T08:00", (1, TimeUnit::Weeks), (1, TimeUnit::Months));
        let (end, doses) = generate_schedule_with_end(&t).unwrap();
        assert_eq!(end, treatment_end(&t).unwrap());
        assert_eq!(doses, generate_schedule(&t).unwrap());
    }

    #[test]
    fn test_generation_is_pure() {
        let t = treatment("t1", "2024-03-10T07:15", (6, TimeUnit::Hours), (1, TimeUnit::Weeks));
        let first = generate_schedule(&t).unwrap();
        let second = generate_schedule(&t).unwrap();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].scheduled_time < w[1].scheduled_time));
        assert_eq!(first[0].scheduled_time, t.start);
    }

    #[test]
    fn test_upcoming_doses() {
        let t = treatment("t1", "2024-01-01T08:00", (12, TimeUnit::Hours), (1, TimeUnit::Days));
        let schedule = generate_schedule(&t).unwrap();
        let upcoming = upcoming_doses(&schedule, at("2024-01-01T20:00"));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].scheduled_time, at("2024-01-02T08:00"));
    }
}
