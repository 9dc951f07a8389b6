//! Small shared helpers.

/// Deadline queue for delayed UI events.
pub mod timer;

pub use timer::Timers;
