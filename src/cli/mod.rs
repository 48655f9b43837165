//! CLI output formatting
//!
//! Human-readable, colored terminal output for the `relcycle` commands.

pub mod display;

pub use display::format_deliverable;
pub use display::print_file_header;
pub use display::print_findings;
pub use display::print_load_failure;
pub use display::print_summary;
