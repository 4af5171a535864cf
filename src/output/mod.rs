//! Report rendering: console and JSON output, feedback PDFs, ranking chart

pub mod artifacts;
pub mod chart;
pub mod formatter;
pub mod layout;
pub mod pdf;
