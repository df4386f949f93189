/// Validation results shared between the fork rules and their caller
pub mod state;

pub use state::{ValidationMode, ValidationSink, ValidationState, REJECT_INVALID, REJECT_MALFORMED};
