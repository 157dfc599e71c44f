use crate::error::{ScheduleError, ScheduleResult};
use crate::units::{frequency_interval, TimeUnit};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

/// A prescribed medication course for one family member.
///
/// Frequency and duration are signed so that degenerate values coming from
/// storage can be represented and rejected by `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentDefinition {
    pub id: String,
    pub member_id: String,
    pub medication_name: String,
    #[serde(default)]
    pub dosage: String,
    pub frequency_value: i64,
    pub frequency_unit: TimeUnit,
    pub duration_value: i64,
    pub duration_unit: TimeUnit,
    pub start: NaiveDateTime,
    #[serde(default)]
    pub status: TreatmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TreatmentDefinition {
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.medication_name.trim().is_empty() {
            return Err(ScheduleError::Validation(
                format!("Treatment {} has an empty medication name", self.id)
            ));
        }

        if self.frequency_value <= 0 {
            return Err(ScheduleError::InvalidFrequency(format!(
                "treatment {}: frequency must be positive, got {} {}",
                self.id, self.frequency_value, self.frequency_unit
            )));
        }

        if self.duration_value <= 0 {
            return Err(ScheduleError::InvalidDuration(format!(
                "treatment {}: duration must be positive, got {} {}",
                self.id, self.duration_value, self.duration_unit
            )));
        }

        Ok(())
    }

    /// Flat-hours gap between doses.
    pub fn interval(&self) -> ScheduleResult<Duration> {
        frequency_interval(self.frequency_value, self.frequency_unit)
    }

    pub fn is_active(&self) -> bool {
        self.status == TreatmentStatus::Active
    }
}

/// One generated administration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDose {
    pub treatment_id: String,
    pub scheduled_time: NaiveDateTime,
    pub sequence_index: usize,
}

impl ScheduledDose {
    pub fn id(&self) -> String {
        dose_id(&self.treatment_id, self.scheduled_time)
    }
}

/// Stable identity shared by generated doses and agenda items:
/// `{treatment_id}_{epoch millis}` with the naive instant read as UTC.
pub fn dose_id(treatment_id: &str, scheduled_time: NaiveDateTime) -> String {
    format!("{}_{}", treatment_id, scheduled_time.and_utc().timestamp_millis())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}
