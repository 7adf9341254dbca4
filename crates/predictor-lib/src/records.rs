//! Core data types for queries and predictions

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Number of input fields a query record carries
pub const NUM_FEATURES: usize = 5;

/// One demand query: a date plus the store and item being asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub store_id: i64,
    pub item_id: i64,
}

impl QueryRecord {
    pub fn new(year: i64, month: i64, day: i64, store_id: i64, item_id: i64) -> Self {
        Self {
            year,
            month,
            day,
            store_id,
            item_id,
        }
    }

    /// Build a record from an ordered field sequence, checking arity first
    pub fn from_slice(fields: &[i64]) -> Result<Self, PredictError> {
        if fields.len() != NUM_FEATURES {
            return Err(PredictError::ShapeMismatch {
                expected: NUM_FEATURES,
                actual: fields.len(),
            });
        }
        Ok(Self::new(fields[0], fields[1], fields[2], fields[3], fields[4]))
    }

    /// Check the declared range invariants for each field
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.year <= 0 {
            return Err(PredictError::InvalidQuery {
                field: "year",
                value: self.year,
                constraint: "must be positive",
            });
        }
        if !(1..=12).contains(&self.month) {
            return Err(PredictError::InvalidQuery {
                field: "month",
                value: self.month,
                constraint: "must be in 1..=12",
            });
        }
        if !(1..=31).contains(&self.day) {
            return Err(PredictError::InvalidQuery {
                field: "day",
                value: self.day,
                constraint: "must be in 1..=31",
            });
        }
        if self.store_id < 0 {
            return Err(PredictError::InvalidQuery {
                field: "store_id",
                value: self.store_id,
                constraint: "must be non-negative",
            });
        }
        if self.item_id < 0 {
            return Err(PredictError::InvalidQuery {
                field: "item_id",
                value: self.item_id,
                constraint: "must be non-negative",
            });
        }
        Ok(())
    }

    /// Convert to the feature layout the model was trained on
    pub fn to_features(&self) -> [f32; NUM_FEATURES] {
        [
            self.year as f32,
            self.month as f32,
            self.day as f32,
            self.store_id as f32,
            self.item_id as f32,
        ]
    }
}

/// Prediction output returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted demand for the queried store/item/date
    pub value: f32,
    pub model_version: String,
    pub generated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_correct_arity() {
        let record = QueryRecord::from_slice(&[2013, 1, 1, 25, 103665]).unwrap();
        assert_eq!(record.year, 2013);
        assert_eq!(record.item_id, 103665);
    }

    #[test]
    fn test_from_slice_wrong_arity() {
        let err = QueryRecord::from_slice(&[2013, 1, 1, 25]).unwrap_err();
        match err {
            PredictError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, 5);
                assert_eq!(actual, 4);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_sample_query() {
        let record = QueryRecord::new(2013, 1, 1, 25, 103665);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_month() {
        let record = QueryRecord::new(2013, 13, 1, 25, 103665);
        let err = record.validate().unwrap_err();
        match err {
            PredictError::InvalidQuery { field, value, .. } => {
                assert_eq!(field, "month");
                assert_eq!(value, 13);
            }
            other => panic!("expected InvalidQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_ids() {
        assert!(QueryRecord::new(2013, 1, 1, -1, 103665).validate().is_err());
        assert!(QueryRecord::new(2013, 1, 1, 25, -1).validate().is_err());
        assert!(QueryRecord::new(0, 1, 1, 25, 103665).validate().is_err());
        assert!(QueryRecord::new(2013, 1, 32, 25, 103665).validate().is_err());
    }

    #[test]
    fn test_feature_layout_matches_field_order() {
        let record = QueryRecord::new(2013, 1, 2, 25, 103665);
        assert_eq!(record.to_features(), [2013.0, 1.0, 2.0, 25.0, 103665.0]);
    }
}
