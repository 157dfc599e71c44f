//! Per-dose status. `Taken` is the only recorded transition; `Overdue` is a
//! view of a pending dose whose time has passed and is recomputed against
//! `now` on every read.

use crate::agenda::AgendaItem;
use crate::models::ScheduledDose;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Pending,
    Taken,
    Overdue,
}

impl DoseStatus {
    pub fn derive(scheduled_time: NaiveDateTime, taken: bool, now: NaiveDateTime) -> Self {
        if taken {
            DoseStatus::Taken
        } else if scheduled_time < now {
            DoseStatus::Overdue
        } else {
            DoseStatus::Pending
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseStatus::Pending => write!(f, "pending"),
            DoseStatus::Taken => write!(f, "taken"),
            DoseStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// Set of dose ids the caller has marked as taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseLedger {
    taken: BTreeSet<String>,
}

impl DoseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dose as taken. Returns false if it was already taken.
    pub fn mark_taken(&mut self, dose_id: &str) -> bool {
        let inserted = self.taken.insert(dose_id.to_string());
        if !inserted {
            debug!("Dose {} already marked taken", dose_id);
        }
        inserted
    }

    pub fn is_taken(&self, dose_id: &str) -> bool {
        self.taken.contains(dose_id)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn status_of(&self, dose: &ScheduledDose, now: NaiveDateTime) -> DoseStatus {
        DoseStatus::derive(dose.scheduled_time, self.is_taken(&dose.id()), now)
    }

    /// Copy taken marks onto a freshly projected agenda.
    pub fn apply(&self, items: &mut [AgendaItem]) {
        for item in items.iter_mut() {
            if self.is_taken(&item.id) {
                item.mark_taken();
            }
        }
    }
}

impl FromIterator<String> for DoseLedger {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            taken: iter.into_iter().collect(),
        }
    }
}
