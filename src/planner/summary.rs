use super::PlanResult;
use crate::models::TreatmentStatus;
use crate::status::DoseStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanSummary {
    pub generated_at: NaiveDateTime,
    pub n_treatments: usize,
    pub n_active: usize,
    pub agenda_today: usize,
    pub alerts: usize,
    pub mean_adherence: Option<f64>,
    pub treatments: Vec<TreatmentSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TreatmentSummary {
    pub treatment_id: String,
    pub medication_name: String,
    pub status: TreatmentStatus,
    pub dose_count: usize,
    pub first_dose: Option<NaiveDateTime>,
    pub last_dose: Option<NaiveDateTime>,
    pub end: NaiveDateTime,
    pub next_dose: Option<NaiveDateTime>,
    pub taken: usize,
    pub overdue: usize,
    pub adherence: Option<f64>,
}

impl PlanSummary {
    pub fn from_result(result: &PlanResult) -> Self {
        let treatments: Vec<TreatmentSummary> = result.schedules.iter()
            .map(|schedule| TreatmentSummary {
                treatment_id: schedule.treatment.id.clone(),
                medication_name: schedule.treatment.medication_name.clone(),
                status: schedule.treatment.status,
                dose_count: schedule.doses.len(),
                first_dose: schedule.doses.first().map(|d| d.scheduled_time),
                last_dose: schedule.doses.last().map(|d| d.scheduled_time),
                end: schedule.end,
                next_dose: schedule.next_dose(result.now).map(|d| d.scheduled_time),
                taken: schedule.count_with_status(&result.ledger, result.now, DoseStatus::Taken),
                overdue: schedule.count_with_status(&result.ledger, result.now, DoseStatus::Overdue),
                adherence: schedule.adherence(&result.ledger, result.now),
            })
            .collect();

        let adherence_values: Vec<f64> = treatments.iter()
            .filter_map(|t| t.adherence)
            .collect();

        Self {
            generated_at: result.now,
            n_treatments: treatments.len(),
            n_active: result.schedules.iter().filter(|s| s.treatment.is_active()).count(),
            agenda_today: result.agenda.len(),
            alerts: result.alerts.len(),
            mean_adherence: mean(&adherence_values),
            treatments,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
