pub mod summary;

use crate::agenda::{project_today_agenda, AgendaItem};
use crate::alerts::{derive_alerts, Alert};
use crate::config::Config;
use crate::error::ScheduleResult;
use crate::models::{ScheduledDose, TreatmentDefinition};
use crate::schedule::generate_schedule_with_end;
use crate::status::{DoseLedger, DoseStatus};
use chrono::NaiveDateTime;
use log::{info, debug};
use serde::{Deserialize, Serialize};

pub use summary::*;

/// A treatment together with its full generated dose list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentSchedule {
    pub treatment: TreatmentDefinition,
    pub end: NaiveDateTime,
    pub doses: Vec<ScheduledDose>,
}

impl TreatmentSchedule {
    pub fn build(treatment: &TreatmentDefinition) -> ScheduleResult<Self> {
        let (end, doses) = generate_schedule_with_end(treatment)?;
        Ok(Self {
            treatment: treatment.clone(),
            end,
            doses,
        })
    }

    pub fn count_with_status(&self, ledger: &DoseLedger, now: NaiveDateTime, status: DoseStatus) -> usize {
        self.doses.iter()
            .filter(|dose| ledger.status_of(dose, now) == status)
            .count()
    }

    pub fn next_dose(&self, now: NaiveDateTime) -> Option<&ScheduledDose> {
        self.doses.iter().find(|dose| dose.scheduled_time >= now)
    }

    /// Percentage of doses due by `now` that were taken; `None` before the
    /// first dose is due.
    pub fn adherence(&self, ledger: &DoseLedger, now: NaiveDateTime) -> Option<f64> {
        let due: Vec<&ScheduledDose> = self.doses.iter()
            .filter(|dose| dose.scheduled_time <= now)
            .collect();
        if due.is_empty() {
            return None;
        }

        let taken = due.iter().filter(|dose| ledger.is_taken(&dose.id())).count();
        Some(taken as f64 / due.len() as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub now: NaiveDateTime,
    pub schedules: Vec<TreatmentSchedule>,
    pub agenda: Vec<AgendaItem>,
    pub alerts: Vec<Alert>,
    #[serde(skip)]
    pub ledger: DoseLedger,
}

impl PlanResult {
    pub fn status_of(&self, dose: &ScheduledDose) -> DoseStatus {
        self.ledger.status_of(dose, self.now)
    }
}

/// Runs generation, projection and alert derivation over a loaded plan.
pub struct Planner {
    config: Config,
    ledger: DoseLedger,
}

impl Planner {
    pub fn new(config: Config) -> Self {
        let ledger = config.ledger();
        Self { config, ledger }
    }

    /// Record a dose as taken; repeated marks are ignored.
    pub fn mark_taken(&mut self, dose_id: &str) -> bool {
        self.ledger.mark_taken(dose_id)
    }

    pub fn ledger(&self) -> &DoseLedger {
        &self.ledger
    }

    pub fn run(&self, now: NaiveDateTime) -> ScheduleResult<PlanResult> {
        info!("Planning {} treatments at {}", self.config.treatments.len(), now);

        let mut schedules = Vec::with_capacity(self.config.treatments.len());
        for treatment in &self.config.treatments {
            let schedule = TreatmentSchedule::build(treatment)?;
            debug!(
                "Treatment {} ({}): {} doses until {}",
                treatment.id, treatment.medication_name, schedule.doses.len(), schedule.end
            );
            schedules.push(schedule);
        }

        let members = self.config.member_lookup();
        let mut agenda = project_today_agenda(&self.config.treatments, &members, now)?;
        self.ledger.apply(&mut agenda);

        let alerts = derive_alerts(&agenda, now);
        info!("Agenda has {} doses today, {} overdue", agenda.len(), alerts.len());

        Ok(PlanResult {
            now,
            schedules,
            agenda,
            alerts,
            ledger: self.ledger.clone(),
        })
    }
}
