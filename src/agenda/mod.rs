use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{dose_id, MemberSummary, TreatmentDefinition};
use crate::status::DoseStatus;
use crate::units::day_bounds;
use chrono::{Duration, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const UNKNOWN_MEMBER: &str = "Unknown";

/// One dose due today, joined with its treatment and member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: String,
    pub treatment_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub member_name: String,
    pub member_avatar: Option<String>,
    pub scheduled_time: NaiveDateTime,
    pub taken: bool,
}

impl AgendaItem {
    pub fn mark_taken(&mut self) {
        self.taken = true;
    }

    pub fn status(&self, now: NaiveDateTime) -> DoseStatus {
        DoseStatus::derive(self.scheduled_time, self.taken, now)
    }
}

/// Project the doses of every active treatment that fall on the calendar day
/// containing `now`, sorted by scheduled time.
///
/// Treatments that started on an earlier day are advanced by whole frequency
/// intervals to their first dose at or after midnight. Treatments that have
/// not started yet contribute nothing.
pub fn project_today_agenda(
    treatments: &[TreatmentDefinition],
    members: &HashMap<String, MemberSummary>,
    now: NaiveDateTime,
) -> ScheduleResult<Vec<AgendaItem>> {
    let (today_start, today_end) = day_bounds(now);
    let mut items = Vec::new();

    for treatment in treatments {
        if !treatment.is_active() {
            debug!("Skipping {:?} treatment {}", treatment.status, treatment.id);
            continue;
        }
        treatment.validate()?;

        if treatment.start > now {
            continue;
        }

        let interval = treatment.interval()?;
        let member = members.get(&treatment.member_id);
        let mut current = match first_dose_on_or_after(treatment.start, today_start, interval)? {
            Some(first) => first,
            None => {
                debug!("Treatment {} has no representable dose after {}", treatment.id, today_start);
                continue;
            }
        };

        while current <= today_end {
            items.push(AgendaItem {
                id: dose_id(&treatment.id, current),
                treatment_id: treatment.id.clone(),
                medication_name: treatment.medication_name.clone(),
                dosage: treatment.dosage.clone(),
                member_name: member
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
                member_avatar: member.and_then(|m| m.avatar.clone()),
                scheduled_time: current,
                taken: false,
            });

            current = match current.checked_add_signed(interval) {
                Some(next) => next,
                None => break,
            };
        }
    }

    items.sort_by(|a, b| {
        a.scheduled_time
            .cmp(&b.scheduled_time)
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!("Projected {} agenda items for {}", items.len(), today_start.date());
    Ok(items)
}

/// Earliest `start + k * interval` (k >= 0) that is not before `boundary`.
///
/// `Ok(None)` when that instant lies beyond chrono's representable range.
fn first_dose_on_or_after(
    start: NaiveDateTime,
    boundary: NaiveDateTime,
    interval: Duration,
) -> ScheduleResult<Option<NaiveDateTime>> {
    if start >= boundary {
        return Ok(Some(start));
    }

    let elapsed_ms = (boundary - start).num_milliseconds();
    let interval_ms = interval.num_milliseconds();
    if interval_ms <= 0 {
        return Err(ScheduleError::InvalidFrequency(
            "frequency interval must be positive".to_string()
        ));
    }

    let mut periods = elapsed_ms.div_euclid(interval_ms);
    if elapsed_ms.rem_euclid(interval_ms) != 0 {
        periods += 1;
    }

    Ok(periods
        .checked_mul(interval_ms)
        .and_then(Duration::try_milliseconds)
        .and_then(|offset| start.checked_add_signed(offset)))
}
