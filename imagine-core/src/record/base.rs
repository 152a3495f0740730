//! Record and its values.
use crate::error::ImagineError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value such as a loss or a return.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array, for example an observation.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A set of named values.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record with a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a value, replacing an existing one of the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Consumes the record and returns an iterator over the key-value pairs.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Returns the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges `record` into `self`. Values of `record` win on key collisions.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Returns the scalar value of the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ImagineError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ImagineError::RecordValueTypeError("Scalar".to_string())),
            None => Err(ImagineError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the 1-dimensional array of the given key.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, ImagineError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(ImagineError::RecordValueTypeError("Array1".to_string())),
            None => Err(ImagineError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the string of the given key.
    pub fn get_string(&self, k: &str) -> Result<String, ImagineError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(ImagineError::RecordValueTypeError("String".to_string())),
            None => Err(ImagineError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record has no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scalar_errors() {
        let mut record = Record::from_scalar("train/loss", 1.5);
        record.insert("name", RecordValue::String("dqn".to_string()));

        assert_eq!(record.get_scalar("train/loss"), Ok(1.5));
        assert_eq!(
            record.get_scalar("name"),
            Err(ImagineError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            record.get_scalar("train/n_updates"),
            Err(ImagineError::RecordKeyError("train/n_updates".to_string()))
        );
    }

    #[test]
    fn test_merge_overwrites() {
        let a = Record::from_slice(&[
            ("x", RecordValue::Scalar(1.0)),
            ("y", RecordValue::Scalar(2.0)),
        ]);
        let b = Record::from_scalar("y", 3.0);
        let mut c = a.clone().merge(b.clone());
        assert_eq!(c.get_scalar("x"), Ok(1.0));
        assert_eq!(c.get_scalar("y"), Ok(3.0));

        c.merge_inplace(Record::from_scalar("x", 0.0));
        assert_eq!(c.get_scalar("x"), Ok(0.0));
        assert_eq!(c.len(), 2);
    }
}
