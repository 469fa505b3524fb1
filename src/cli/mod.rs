//! Command-line front end

pub mod context;
pub mod progress;
pub mod ship;
pub mod style;

pub use progress::CliProgress;
