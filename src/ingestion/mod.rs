//! Reading codebook documents and survey tables.
//!
//! - [`document`]: codebook page text (plain text with form-feed page breaks, or PDF behind the
//!   `pdf` feature)
//! - [`table`]: tab-separated survey tables into an in-memory [`crate::types::DataSet`]
//! - [`observability`]: optional success/failure/alert hooks for both

pub mod document;
pub mod observability;
pub mod table;

pub use document::{
    read_document_pages, DocumentFormat, DocumentOptions, PageSource, TextPages, PAGE_BREAK,
};
#[cfg(feature = "pdf")]
pub use document::PdfPages;
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    ObserverOptions, SourceKind, TracingObserver,
};
pub use table::{
    ingest_table_from_path, ingest_table_from_reader, ingest_with_schema, read_header, write_table,
    TableOptions,
};
