//! Contact intake pipeline: validation, then persistence, then notification.

pub mod email;
pub mod html;
mod orchestrator;
pub mod validation;

pub use orchestrator::{DurabilityPolicy, IntakeError, IntakeReceipt, Orchestrator};
pub use validation::{Validation, validate};
