//! Codebook document page sources.
//!
//! Extraction works on plain page text. Two sources are supported:
//!
//! - [`TextPages`]: text where pages are separated by form feeds (`\x0c`), the layout
//!   `pdftotext` produces.
//! - `PdfPages` (feature `pdf`): reads the PDF directly with `pdf-extract`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodebookError, CodebookResult};

use super::observability::{IngestionContext, ObserverOptions, SourceKind};

/// Page separator emitted by text extractors.
pub const PAGE_BREAK: char = '\x0c';

/// Supported codebook document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain text with form-feed page breaks.
    Text,
    /// PDF (requires the `pdf` feature).
    Pdf,
}

impl DocumentFormat {
    /// Parse a document format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Something that yields codebook page texts in document order.
pub trait PageSource {
    /// Read all pages. Blank pages may be included; extraction skips them.
    fn pages(&self) -> CodebookResult<Vec<String>>;
}

/// Page text held in memory, split on form feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPages {
    text: String,
}

impl TextPages {
    /// Wrap already-extracted text.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a text file.
    pub fn from_path(path: impl AsRef<Path>) -> CodebookResult<Self> {
        Ok(Self::from_string(fs::read_to_string(path)?))
    }
}

impl PageSource for TextPages {
    fn pages(&self) -> CodebookResult<Vec<String>> {
        Ok(self.text.split(PAGE_BREAK).map(str::to_owned).collect())
    }
}

#[cfg(feature = "pdf")]
/// A PDF file read with `pdf-extract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPages {
    path: PathBuf,
}

#[cfg(feature = "pdf")]
impl PdfPages {
    /// Point at a PDF on disk. Nothing is read until [`PageSource::pages`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[cfg(feature = "pdf")]
impl PageSource for PdfPages {
    fn pages(&self) -> CodebookResult<Vec<String>> {
        // Surface a plain io error for a missing file rather than a pdf parse error.
        fs::metadata(&self.path)?;
        pdf_extract::extract_text_by_pages(&self.path)
            .map_err(|e| CodebookError::Pdf(e.to_string()))
    }
}

/// Options for [`read_document_pages`].
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<DocumentFormat>,
    /// Observer/alert settings.
    pub observe: ObserverOptions,
}

/// Read a codebook document into page texts.
///
/// The format comes from `options.format` or the file extension. Missing and unreadable files
/// fail with [`CodebookError::Io`].
pub fn read_document_pages(
    path: impl AsRef<Path>,
    options: &DocumentOptions,
) -> CodebookResult<Vec<String>> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        kind: SourceKind::Document,
    };

    let result = match format {
        DocumentFormat::Text => TextPages::from_path(path).and_then(|src| src.pages()),
        DocumentFormat::Pdf => read_pdf_dispatch(path),
    };

    options.observe.report(&ctx, &result, Vec::len);
    result
}

fn infer_format_from_path(path: &Path) -> CodebookResult<DocumentFormat> {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(DocumentFormat::from_extension)
        .ok_or_else(|| CodebookError::UnsupportedDocument {
            path: path.to_path_buf(),
        })
}

fn read_pdf_dispatch(path: &Path) -> CodebookResult<Vec<String>> {
    #[cfg(feature = "pdf")]
    {
        PdfPages::new(path).pages()
    }

    #[cfg(not(feature = "pdf"))]
    {
        tracing::warn!(
            path = %path.display(),
            "pdf reading not enabled (enable cargo feature 'pdf')"
        );
        Err(CodebookError::UnsupportedDocument {
            path: PathBuf::from(path),
        })
    }
}
