use std::collections::BTreeMap;
use std::time::Duration;

use crate::engine::RequestReport;

use super::palette::Palette;

const VARIABLE_PREVIEW_CHARS: usize = 50;

/// One line per finished request: `name | METHOD url [status] (duration)`.
#[must_use]
pub fn format_result_line(report: &RequestReport<'_>, palette: Palette) -> String {
    let prefix = if report.name.is_empty() {
        String::new()
    } else {
        format!("{} | ", palette.name(report.name))
    };
    let status = report
        .status_code
        .filter(|code| *code > 0)
        .map(|code| format!(" [{}]", code))
        .unwrap_or_default();
    let duration = format_duration(report.duration);
    let outcome = match report.error {
        None => match report.status_code {
            Some(200..=299) => format!("{}{}", palette.success(&status), duration),
            Some(_) | None => format!("{}{}", palette.warning(&status), duration),
        },
        Some(err) => format!(
            "{}{} {}",
            palette.error(&status),
            duration,
            palette.error(&err.to_string())
        ),
    };
    format!(
        "{}{} {}{}",
        prefix,
        palette.method(report.method),
        report.url,
        outcome
    )
}

fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return String::new();
    }
    format!(" ({}ms)", duration.as_millis())
}

/// Indented `name = value` lines for a chain request's extracted variables.
#[must_use]
pub fn format_variables(variables: &BTreeMap<String, String>, palette: Palette) -> String {
    if variables.is_empty() {
        return String::new();
    }
    let body: String = variables
        .iter()
        .map(|(name, value)| format!("    {} = {}\n", palette.name(name), preview(value)))
        .collect();
    format!("{}\n{}", palette.info("  Extracted variables:"), body)
}

fn preview(value: &str) -> String {
    if value.chars().count() <= VARIABLE_PREVIEW_CHARS {
        return value.to_owned();
    }
    let kept: String = value
        .chars()
        .take(VARIABLE_PREVIEW_CHARS.saturating_sub(3))
        .collect();
    format!("{}...", kept)
}
