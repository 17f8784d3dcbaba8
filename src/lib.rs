//! `survey-codebook` extracts variable definitions from a panel-survey codebook and uses them to
//! decode raw survey tables.
//!
//! Two independent pipelines:
//!
//! - **Extraction** ([`codebook`]): page text → [`codebook::Codebook`] (variable name → codes,
//!   labels and categorical/continuous type), persisted as JSON.
//! - **Decoding** ([`processing`]): codebook + [`types::DataSet`] → categorical columns with
//!   labels instead of codes, continuous columns with sentinel codes removed.
//!
//! ## Extract a codebook
//!
//! ```rust
//! use survey_codebook::codebook::{extract_codebook_from_lines, VariableType};
//!
//! let cb = extract_codebook_from_lines(["AG2 Code number of owners", "CODE NUMBER"]);
//! assert_eq!(cb.get("AG2").unwrap().kind, VariableType::Continuous);
//! ```
//!
//! ## Decode a table
//!
//! ```no_run
//! use survey_codebook::codebook::load_codebook;
//! use survey_codebook::ingestion::{ingest_table_from_path, TableOptions};
//! use survey_codebook::processing::{apply_plan, DecodePlan};
//!
//! # fn main() -> Result<(), survey_codebook::CodebookError> {
//! let codebook = load_codebook("data/codebook.json")?;
//! let ds = ingest_table_from_path("data/37202-0003-Data.tsv", &TableOptions::default())?;
//!
//! let plan = DecodePlan::new().decode("AA4").clean("AG2", [98, 99]);
//! let (decoded, report) = apply_plan(&ds, &codebook, &plan)?;
//! println!("rows={} steps={}", decoded.row_count(), report.columns.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`codebook`]: codebook model, extraction and JSON storage
//! - [`ingestion`]: document pages and delimited tables
//! - [`processing`]: categorical decoding, sentinel cleaning, batch plans
//! - [`pipeline`]: end-to-end runs used by the binary
//! - [`types`]: in-memory table types
//! - [`error`]: crate error type

pub mod codebook;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{CodebookError, CodebookResult};
