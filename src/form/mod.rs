//! Form model: state snapshots, time sub-fields, validation and payload.

/// Request payload construction.
pub mod request;
/// Form state and field updates.
pub mod state;
/// Hour/minute/second composition.
pub mod time;
/// Submission-time rules.
pub mod validate;

pub use request::FilterRequest;
pub use state::{BreakBound, FieldUpdate, FormState, SourceFile};
pub use time::{TimeComponent, TimeValue};
pub use validate::ValidationError;
