//! Terminal output: tables, serialised reports and progress bars

/// Tables and serialised reports
pub mod display;
/// indicatif progress bars
pub mod progress;

pub use progress::ProgressReporter;
