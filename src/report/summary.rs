use std::time::Duration;

use crate::engine::RequestReport;

use super::palette::Palette;

const BOX_WIDTH: usize = 46;

/// Running totals over every reported request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub const fn record(&mut self, report: &RequestReport<'_>) {
        self.total = self.total.saturating_add(1);
        if report.succeeded() {
            self.succeeded = self.succeeded.saturating_add(1);
        } else {
            self.failed = self.failed.saturating_add(1);
        }
        self.elapsed = self.elapsed.saturating_add(report.duration);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Boxed summary table; empty when nothing was reported.
    #[must_use]
    pub fn render(&self, palette: Palette) -> String {
        if self.is_empty() {
            return String::new();
        }
        let rule = "─".repeat(BOX_WIDTH);
        let rows = [
            ("Total Requests:", self.total.to_string()),
            ("Successful:", palette.success(&self.succeeded.to_string())),
            ("Failed:", palette.error(&self.failed.to_string())),
            ("Total Time:", format!("{}ms", self.elapsed.as_millis())),
        ];
        let body: String = rows
            .iter()
            .map(|(label, value)| format!("│ {} {}\n", label, value))
            .collect();
        format!(
            "\n{}\n│ SUMMARY\n{}\n{}{}\n",
            palette.header(&format!("┌─{}┐", rule)),
            palette.header(&format!("├─{}┤", rule)),
            body,
            palette.header(&format!("└─{}┘", rule)),
        )
    }
}
