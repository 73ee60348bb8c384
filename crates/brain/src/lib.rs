//! Pipeline orchestration: the signal brain and its scheduler.

pub mod brain;
pub mod scheduler;

pub use brain::SignalBrain;
pub use scheduler::BrainScheduler;
