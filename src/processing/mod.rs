//! Decoding and cleaning of survey table columns.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion and a
//! read-only [`crate::codebook::Codebook`].
//!
//! - [`decode_categorical()`]: codes → labels; anything without a label becomes missing
//! - [`clean_continuous()`]: caller-supplied sentinel codes → missing
//! - [`apply_plan()`]: many columns at once, computed in parallel
//!
//! ## Example: decode one column, clean another
//!
//! ```rust
//! use survey_codebook::codebook::VariableDefinition;
//! use survey_codebook::processing::{clean_continuous, decode_categorical, SentinelSet};
//! use survey_codebook::types::{DataSet, DataType, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::uniform(["AA4", "AG2"], DataType::Float64),
//!     vec![
//!         vec![Value::Float64(1.0), Value::Float64(3.0)],
//!         vec![Value::Float64(5.0), Value::Float64(98.0)],
//!         vec![Value::Null, Value::Null],
//!     ],
//! );
//! let aa4 = VariableDefinition::categorical()
//!     .with_code(1, "Yes")
//!     .with_code(5, "No");
//!
//! let ds = decode_categorical(&ds, "AA4", &aa4).unwrap();
//! let ds = clean_continuous(&ds, "AG2", &SentinelSet::from([98, 99])).unwrap();
//!
//! assert_eq!(ds.rows[1], vec![Value::Utf8("No".to_string()), Value::Null]);
//! assert_eq!(ds.rows[2], vec![Value::Null, Value::Null]);
//! ```

pub mod clean;
pub mod decode;
pub mod plan;
pub mod sentinel;

pub use clean::{clean_continuous, clean_continuous_in_place, is_sentinel};
pub use decode::{decode_categorical, decode_categorical_in_place, decode_value};
pub use plan::{apply_plan, ColumnOp, ColumnReport, DecodePlan, OpKind, PlanReport};
pub use sentinel::{ParseSentinelError, SentinelSet};
