//! Terminal output for request results, run summaries and responses.
mod lines;
mod palette;
mod response;
mod summary;


pub use lines::{format_result_line, format_variables};
pub use palette::Palette;
pub use response::{format_response, status_text};
pub use summary::RunSummary;
