//! Key-value records of training metrics and their sinks.
//!
//! * [`Record`] holds named [`RecordValue`]s, for example `train/loss`.
//! * [`Recorder`] receives records from the [`Trainer`](crate::Trainer).
//! * [`RecordStorage`] aggregates the records stored between two flushes.
//! * [`BufferedRecorder`] keeps every record in memory, [`NullRecorder`]
//!   discards them.
//!
//! ```rust
//! use imagine_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("train/loss", 0.25);
//! record.insert("train/n_updates", RecordValue::Scalar(4.0));
//! assert_eq!(record.get_scalar("train/loss").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
