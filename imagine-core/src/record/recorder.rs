use super::Record;

/// Destination of records.
///
/// [`Recorder::write`] outputs a record immediately, while
/// [`Recorder::store`] keeps it until the next [`Recorder::flush`], where the
/// stored records are aggregated and written at the given step.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);

    /// Stores a record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    fn flush(&mut self, step: i64);
}
