//! End-to-end runs: document → codebook file, and codebook + table → decoded table.

use std::path::Path;

use tracing::{info, info_span};

use crate::codebook::{load_codebook, save_codebook, Codebook, CodebookExtractor};
use crate::error::CodebookResult;
use crate::ingestion::{
    ingest_table_from_path, read_document_pages, write_table, DocumentOptions, TableOptions,
};
use crate::processing::{apply_plan, DecodePlan, PlanReport};

/// Read a codebook document, extract its variables and write them to `output` as JSON.
pub fn build_codebook(
    document: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &DocumentOptions,
) -> CodebookResult<Codebook> {
    let document = document.as_ref();
    let _span = info_span!("build_codebook", document = %document.display()).entered();

    let pages = read_document_pages(document, options)?;
    let mut extractor = CodebookExtractor::new();
    for page in &pages {
        extractor.push_page(page);
    }
    let stats = extractor.stats();
    let codebook = extractor.finish();
    info!(
        pages = stats.pages,
        variables = codebook.len(),
        code_labels = stats.code_labels,
        overwrites = stats.overwrites,
        "codebook extracted"
    );

    save_codebook(&codebook, output)?;
    Ok(codebook)
}

/// Load a saved codebook and a table, apply `plan` and write the result.
///
/// When `plan` is `None`, every categorical codebook variable present in the table is decoded.
pub fn decode_table(
    codebook: impl AsRef<Path>,
    table: impl AsRef<Path>,
    output: impl AsRef<Path>,
    plan: Option<DecodePlan>,
    options: &TableOptions,
) -> CodebookResult<PlanReport> {
    let table = table.as_ref();
    let _span = info_span!("decode_table", table = %table.display()).entered();

    let codebook = load_codebook(codebook)?;
    let dataset = ingest_table_from_path(table, options)?;
    let plan = plan.unwrap_or_else(|| DecodePlan::from_codebook(&codebook, &dataset));

    let (decoded, report) = apply_plan(&dataset, &codebook, &plan)?;
    write_table(&decoded, output, options.delimiter)?;
    Ok(report)
}
