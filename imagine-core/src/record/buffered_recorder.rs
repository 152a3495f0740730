use super::{Record, RecordStorage, Recorder};

/// Keeps records in memory.
///
/// Written records and the records aggregated at each flush are appended to a
/// buffer, paired with the step of the flush (`None` for written records).
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(Option<i64>, Record)>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.buf.iter().map(|(_, r)| r)
    }

    /// Returns an iterator over the aggregated records with their steps.
    pub fn flushed(&self) -> impl Iterator<Item = (i64, &Record)> {
        self.buf
            .iter()
            .filter_map(|(step, r)| step.map(|step| (step, r)))
    }

    /// Returns the number of records kept.
    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push((None, record));
    }

    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            self.buf.push((Some(step), record));
        }
    }
}
