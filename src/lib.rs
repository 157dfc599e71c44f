//! Dose-schedule generation, daily agenda projection and overdue alerts for
//! family medication tracking.
//!
//! Every operation is a pure function of its inputs; callers pass `now`
//! explicitly and own storage, notifications and rendering.

pub mod agenda;
pub mod alerts;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod planner;
pub mod schedule;
pub mod status;
pub mod units;

pub use agenda::{project_today_agenda, AgendaItem};
pub use alerts::{derive_alerts, Alert};
pub use config::Config;
pub use error::{ScheduleError, ScheduleResult};
pub use models::{dose_id, MemberSummary, ScheduledDose, TreatmentDefinition, TreatmentStatus};
pub use planner::{PlanResult, PlanSummary, Planner, TreatmentSchedule};
pub use schedule::{generate_schedule, generate_schedule_with_end, treatment_end, upcoming_doses, MAX_DOSES};
pub use status::{DoseLedger, DoseStatus};
pub use units::{add_interval, frequency_interval, parse_instant, unit_to_hours, TimeUnit};
