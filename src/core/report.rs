use crate::domain::model::{FilterSummary, NameTotal, ReportFormat, Role, TallyReport};
use crate::utils::error::{Result, TallyError};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a TallyReport,
}

pub fn render(report: &TallyReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report, Utc::now()),
        ReportFormat::Csv => render_csv(report),
    }
}

pub fn render_text(report: &TallyReport) -> String {
    let mut out = String::new();
    push_section(&mut out, "Explorers:", &report.explorers);
    out.push('\n');
    push_section(&mut out, "Surveyors:", &report.surveyors);
    out
}

fn push_section(out: &mut String, heading: &str, totals: &[NameTotal]) {
    out.push_str(heading);
    out.push('\n');
    for total in totals {
        out.push_str(&format!("{}  Length: {:.6}\n", total.name, total.length));
    }
}

pub fn render_json(report: &TallyReport, generated_at: DateTime<Utc>) -> Result<String> {
    let json = serde_json::to_string_pretty(&JsonReport {
        generated_at,
        report,
    })?;
    Ok(json + "\n")
}

pub fn render_csv(report: &TallyReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["role", "name", "length"])?;

    for (role, totals) in [
        (Role::Explorer, &report.explorers),
        (Role::Surveyor, &report.surveyors),
    ] {
        for total in totals {
            writer.write_record([
                role.to_string(),
                total.name.clone(),
                format!("{:.6}", total.length),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TallyError::ProcessingError {
            message: format!("Failed to flush CSV report: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| TallyError::ProcessingError {
        message: format!("CSV report is not valid UTF-8: {}", e),
    })
}

/// Matched leg texts in visit order, then the sum.
pub fn render_filter(summary: &FilterSummary) -> String {
    let mut out = String::new();
    for text in &summary.matched_legs {
        out.push_str(text);
        out.push('\n');
    }
    out.push_str(&format!("Total length: {:.6}\n", summary.total));
    out
}
