use crate::agenda::AgendaItem;
use crate::status::DoseStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub acknowledged: bool,
}

/// Build an alert for every agenda item that is overdue at `now`.
///
/// Nothing is remembered between calls; acknowledged alerts reappear on the
/// next derivation while their dose is still untaken.
pub fn derive_alerts(items: &[AgendaItem], now: NaiveDateTime) -> Vec<Alert> {
    items.iter()
        .filter(|item| item.status(now) == DoseStatus::Overdue)
        .map(|item| Alert {
            id: item.id.clone(),
            message: format!(
                "{} for {} was scheduled for {}.",
                item.medication_name,
                item.member_name,
                item.scheduled_time.format("%H:%M")
            ),
            acknowledged: false,
        })
        .collect()
}
