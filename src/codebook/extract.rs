//! Line-pattern extraction of variable definitions from codebook page text.
//!
//! Every line goes through three independent checks, always in this order:
//!
//! 1. **Header**: a line starting with a variable token (`[A-Z]+\d[A-Z0-9_]*` followed by
//!    whitespace) moves the cursor to that variable, creating it as categorical if new.
//! 2. **Code/label**: `N. Label` anywhere in the line records `codes[N] = Label` on the variable
//!    under the cursor. A later label for the same code replaces the earlier one.
//! 3. **Continuous marker**: `CODE NUMBER`, `CODE AMOUNT` or `CODE PERCENT` marks the variable
//!    under the cursor as continuous, keeping any codes already collected.
//!
//! Checks 1 and 2 can both fire on one line; the header always moves the cursor first, so the
//! code lands on the new variable. Lines before the first header are ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Codebook, VariableType};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+\d[A-Z0-9_]*)\s+").unwrap());
static CODE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.\s+([A-Za-z].+)").unwrap());
static CONTINUOUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CODE\s+(NUMBER|AMOUNT|PERCENT)").unwrap());

/// Counters collected while scanning a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Non-empty pages scanned.
    pub pages: usize,
    /// Lines scanned.
    pub lines: usize,
    /// Lines that matched the variable header pattern.
    pub headers: usize,
    /// Code/label pairs recorded on a variable.
    pub code_labels: usize,
    /// Code/label pairs that replaced a different label for the same code.
    pub overwrites: usize,
    /// Lines that marked a variable continuous.
    pub continuous_marks: usize,
}

/// Incremental codebook extractor.
///
/// Holds the codebook under construction and the cursor (the variable the most recent header
/// named). Feed it pages or single lines in document order, then call [`Self::finish`].
#[derive(Debug, Default)]
pub struct CodebookExtractor {
    codebook: Codebook,
    current: Option<String>,
    stats: ExtractionStats,
}

impl CodebookExtractor {
    /// Create an extractor with an empty codebook and no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable under the cursor, if any header has been seen.
    pub fn current_variable(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Counters so far.
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    /// The codebook built so far.
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Scan one page of text. Blank pages are skipped.
    ///
    /// The cursor carries over from the previous page, since a variable's code list may
    /// continue past a page break.
    pub fn push_page(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.stats.pages += 1;
        for line in text.split('\n') {
            self.push_line(line);
        }
    }

    /// Scan one line.
    pub fn push_line(&mut self, line: &str) {
        self.stats.lines += 1;

        if let Some(caps) = HEADER_RE.captures(line) {
            let name = &caps[1];
            self.stats.headers += 1;
            if self.codebook.ensure(name) {
                debug!(variable = name, "new variable");
            }
            self.current = Some(name.to_string());
        }

        let Some(current) = self.current.as_deref() else {
            return;
        };
        let Some(def) = self.codebook.get_mut(current) else {
            return;
        };

        if let Some(caps) = CODE_LABEL_RE.captures(line) {
            // Digit runs too long for i64 are treated like any other non-matching line.
            if let Ok(code) = caps[1].parse::<i64>() {
                let label = caps[2].trim().to_string();
                if let Some(old) = def.codes.insert(code, label.as_str()) {
                    if old != label {
                        self.stats.overwrites += 1;
                        debug!(
                            variable = current,
                            code,
                            old = %old,
                            new = %label,
                            "code label overwritten"
                        );
                    }
                }
                self.stats.code_labels += 1;
            }
        }

        if CONTINUOUS_RE.is_match(line) {
            def.kind = VariableType::Continuous;
            self.stats.continuous_marks += 1;
        }
    }

    /// Finish extraction and return the codebook.
    pub fn finish(self) -> Codebook {
        debug!(
            variables = self.codebook.len(),
            pages = self.stats.pages,
            lines = self.stats.lines,
            code_labels = self.stats.code_labels,
            overwrites = self.stats.overwrites,
            "codebook extraction finished"
        );
        self.codebook
    }
}

/// Extract a codebook from page texts in document order.
pub fn extract_codebook<I, S>(pages: I) -> Codebook
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = CodebookExtractor::new();
    for page in pages {
        extractor.push_page(page.as_ref());
    }
    extractor.finish()
}

/// Extract a codebook from a flat sequence of lines.
pub fn extract_codebook_from_lines<I, S>(lines: I) -> Codebook
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = CodebookExtractor::new();
    for line in lines {
        extractor.push_line(line.as_ref());
    }
    extractor.finish()
}
