//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Functions in this workspace return [`anyhow::Result`]; the variants below
/// can be recovered from an [`anyhow::Error`] with
/// [`downcast_ref`](anyhow::Error::downcast_ref).
#[derive(Error, Debug, PartialEq)]
pub enum ImagineError {
    /// A synthetic transition was requested while the source buffer holds no
    /// transition.
    #[error("Source buffer is empty; at least one transition is required")]
    EmptySource,

    /// A minibatch larger than the number of stored transitions was requested.
    #[error("Requested a batch of {requested} transitions, but only {available} are stored")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,
        /// Number of transitions in the buffer.
        available: usize,
    },

    /// The dynamics model failed on the given state or action.
    #[error("Dynamics model invocation failed: {0}")]
    ModelInvocation(String),

    /// The shape of pushed or forwarded data disagrees with the expected one.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape without the batch dimension.
        expected: Vec<usize>,
        /// Actual shape without the batch dimension.
        actual: Vec<usize>,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
