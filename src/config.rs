use serde::{Deserialize, Serialize};
use std::path::Path;
use std::collections::{HashMap, HashSet};
use log::warn;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{MemberSummary, TreatmentDefinition};
use crate::status::DoseLedger;

/// Treatment plan file: family members, their treatments, and the ids of
/// doses already marked taken.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub members: Vec<MemberSummary>,
    pub treatments: Vec<TreatmentDefinition>,
    #[serde(default)]
    pub taken: Vec<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ScheduleResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        self.validate_members()?;
        self.validate_treatments()?;
        Ok(())
    }

    fn validate_members(&self) -> ScheduleResult<()> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id.as_str()) {
                return Err(ScheduleError::Validation(
                    format!("Duplicate member id: {}", member.id)
                ));
            }
        }
        Ok(())
    }

    fn validate_treatments(&self) -> ScheduleResult<()> {
        let member_ids: HashSet<&str> = self.members.iter().map(|m| m.id.as_str()).collect();
        let mut seen = HashSet::new();

        for treatment in &self.treatments {
            if !seen.insert(treatment.id.as_str()) {
                return Err(ScheduleError::Validation(
                    format!("Duplicate treatment id: {}", treatment.id)
                ));
            }

            treatment.validate()?;

            if !member_ids.contains(treatment.member_id.as_str()) {
                warn!(
                    "Treatment {} references unknown member {}",
                    treatment.id, treatment.member_id
                );
            }
        }

        Ok(())
    }

    pub fn member_lookup(&self) -> HashMap<String, MemberSummary> {
        self.members.iter()
            .map(|m| (m.id.clone(), m.clone()))
            .collect()
    }

    pub fn ledger(&self) -> DoseLedger {
        self.taken.iter().cloned().collect()
    }
}
