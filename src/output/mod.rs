use crate::planner::{PlanResult, PlanSummary};
use crate::error::ScheduleResult;
use chrono::NaiveDateTime;
use std::path::Path;
use std::fs::File;
use log::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn iso(time: NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn save_results<P: AsRef<Path>>(result: &PlanResult, output_dir: P) -> ScheduleResult<()> {
    let output_path = output_dir.as_ref();

    // Full dose lists
    save_schedule(result, &output_path.join("schedule.csv"))?;

    // Today's agenda
    save_agenda(result, &output_path.join("agenda.csv"))?;

    save_alerts(result, &output_path.join("alerts.json"))?;

    let summary = PlanSummary::from_result(result);
    save_summary(&summary, &output_path.join("summary.json"))?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_schedule<P: AsRef<Path>>(result: &PlanResult, path: P) -> ScheduleResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&[
        "TREATMENT_ID", "SEQUENCE", "DOSE_ID", "SCHEDULED_TIME", "STATUS"
    ])?;

    for schedule in &result.schedules {
        for dose in &schedule.doses {
            writer.write_record(&[
                dose.treatment_id.clone(),
                dose.sequence_index.to_string(),
                dose.id(),
                iso(dose.scheduled_time),
                result.status_of(dose).to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn save_agenda<P: AsRef<Path>>(result: &PlanResult, path: P) -> ScheduleResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&[
        "DOSE_ID", "SCHEDULED_TIME", "MEMBER", "MEDICATION", "DOSAGE", "STATUS"
    ])?;

    for item in &result.agenda {
        writer.write_record(&[
            item.id.clone(),
            iso(item.scheduled_time),
            item.member_name.clone(),
            item.medication_name.clone(),
            item.dosage.clone(),
            item.status(result.now).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_alerts<P: AsRef<Path>>(result: &PlanResult, path: P) -> ScheduleResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &result.alerts)?;
    Ok(())
}

fn save_summary<P: AsRef<Path>>(summary: &PlanSummary, path: P) -> ScheduleResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

/// Write a markdown overview of today's agenda and each treatment's progress.
pub fn generate_report<P: AsRef<Path>>(result: &PlanResult, output_dir: P) -> ScheduleResult<()> {
    let report_path = output_dir.as_ref().join("schedule_report.md");
    let summary = PlanSummary::from_result(result);

    let mut agenda_lines = String::new();
    for item in &result.agenda {
        agenda_lines.push_str(&format!(
            "| {} | {} | {} ({}) | {} |\n",
            item.scheduled_time.format("%H:%M"),
            item.member_name,
            item.medication_name,
            item.dosage,
            item.status(result.now),
        ));
    }

    let mut treatment_lines = String::new();
    for t in &summary.treatments {
        treatment_lines.push_str(&format!(
            "| {} | {} | {:?} | {} | {} | {} | {} |\n",
            t.treatment_id,
            t.medication_name,
            t.status,
            t.dose_count,
            t.taken,
            t.overdue,
            t.adherence.map(|a| format!("{:.1}%", a)).unwrap_or_else(|| "-".to_string()),
        ));
    }

    let report_content = format!(
        r#"# Treatment Schedule Report

Generated for **{}**.

## Today's Agenda
- **Doses today**: {}
- **Overdue**: {}

| Time | Member | Medication | Status |
|------|--------|------------|--------|
{}
## Treatments
| Id | Medication | Status | Doses | Taken | Overdue | Adherence |
|----|------------|--------|-------|-------|---------|-----------|
{}
## Files Generated
- `schedule.csv`: every generated dose with its current status
- `agenda.csv`: doses falling on the current day
- `alerts.json`: overdue dose alerts
- `summary.json`: per-treatment progress
"#,
        result.now.format("%Y-%m-%d %H:%M"),
        summary.agenda_today,
        summary.alerts,
        agenda_lines,
        treatment_lines,
    );

    std::fs::write(report_path, report_content)?;
    Ok(())
}
