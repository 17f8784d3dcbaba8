//! Codebook model, extraction and persistence.
//!
//! A [`Codebook`] maps survey variable names (`AA4`, `BA50`, ...) to a [`VariableDefinition`]:
//! whether the variable is categorical or continuous, and the integer code → label mapping
//! recovered from the codebook document.
//!
//! - [`extract`]: line-pattern extraction from page text
//! - [`storage`]: JSON persistence (`variable → {codes, type}`)
//!
//! ```rust
//! use survey_codebook::codebook::{extract_codebook, VariableType};
//!
//! let page = "AA4 Did you ...\n1. Yes\n5. No\n8. DK\n9. NA\n";
//! let codebook = extract_codebook([page]);
//!
//! let aa4 = codebook.get("AA4").unwrap();
//! assert_eq!(aa4.kind, VariableType::Categorical);
//! assert_eq!(aa4.label(5), Some("No"));
//! ```

pub mod extract;
pub mod storage;

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use extract::{
    extract_codebook, extract_codebook_from_lines, CodebookExtractor, ExtractionStats,
};
pub use storage::{from_json_str, load_codebook, save_codebook, to_json_string};

/// Declared measurement type of a survey variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Raw integer values stand for labeled categories.
    #[default]
    Categorical,
    /// Raw values are measurements (counts, amounts, percentages).
    Continuous,
}

/// Coding scheme of one survey variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Integer code → label. Serialized with stringified keys.
    #[serde(default)]
    pub codes: CodeLabels,
    /// Categorical or continuous.
    #[serde(rename = "type")]
    pub kind: VariableType,
}

impl VariableDefinition {
    /// A categorical definition with no codes yet.
    pub fn categorical() -> Self {
        Self::default()
    }

    /// A continuous definition with no codes.
    pub fn continuous() -> Self {
        Self {
            codes: CodeLabels::new(),
            kind: VariableType::Continuous,
        }
    }

    /// Builder-style helper for adding a code/label pair.
    #[must_use]
    pub fn with_code(mut self, code: i64, label: impl Into<String>) -> Self {
        self.codes.insert(code, label.into());
        self
    }

    /// Label for `code`, if the codebook defines one.
    pub fn label(&self, code: i64) -> Option<&str> {
        self.codes.get(code)
    }

    /// Returns `true` when the variable is categorical.
    pub fn is_categorical(&self) -> bool {
        self.kind == VariableType::Categorical
    }
}

/// Integer code → label pairs of one variable, in first-seen order.
///
/// A later label for an existing code replaces it in place, so the written JSON lists codes
/// in the order the document first introduces them. Code lists are short; lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLabels {
    entries: Vec<(i64, String)>,
}

impl CodeLabels {
    /// Create an empty code list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no codes are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for `code`.
    pub fn get(&self, code: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, l)| l.as_str())
    }

    /// Returns `true` if `code` has a label.
    pub fn contains(&self, code: i64) -> bool {
        self.get(code).is_some()
    }

    /// Set the label for `code`, returning the previous one.
    pub fn insert(&mut self, code: i64, label: impl Into<String>) -> Option<String> {
        let label = label.into();
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some((_, existing)) => Some(std::mem::replace(existing, label)),
            None => {
                self.entries.push((code, label));
                None
            }
        }
    }

    /// Iterate `(code, label)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(c, l)| (*c, l.as_str()))
    }

    /// Iterate labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, l)| l.as_str())
    }
}

impl<L: Into<String>> FromIterator<(i64, L)> for CodeLabels {
    fn from_iter<T: IntoIterator<Item = (i64, L)>>(iter: T) -> Self {
        let mut codes = CodeLabels::new();
        for (code, label) in iter {
            codes.insert(code, label);
        }
        codes
    }
}

impl Serialize for CodeLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, label) in &self.entries {
            map.serialize_entry(&code.to_string(), label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CodeLabels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeLabelsVisitor;

        impl<'de> Visitor<'de> for CodeLabelsVisitor {
            type Value = CodeLabels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of integer code to label")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CodeLabels, A::Error> {
                let mut codes = CodeLabels::new();
                while let Some((code, label)) = access.next_entry::<i64, String>()? {
                    codes.insert(code, label);
                }
                Ok(codes)
            }
        }

        deserializer.deserialize_map(CodeLabelsVisitor)
    }
}

/// Variable name → [`VariableDefinition`], in first-seen order.
///
/// Iteration and serialization follow insertion order, which for an extracted codebook is the
/// order variables first appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    variables: Vec<(String, VariableDefinition)>,
    index: HashMap<String, usize>,
}

impl Codebook {
    /// Create an empty codebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables are defined.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Definition for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.index.get(name).map(|&i| &self.variables[i].1)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut VariableDefinition> {
        let i = *self.index.get(name)?;
        Some(&mut self.variables[i].1)
    }

    /// Insert or replace a definition.
    ///
    /// Replacing keeps the variable's original position. Returns the previous definition.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: VariableDefinition,
    ) -> Option<VariableDefinition> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.variables[i].1, definition)),
            None => {
                self.index.insert(name.clone(), self.variables.len());
                self.variables.push((name, definition));
                None
            }
        }
    }

    /// Returns `true` if `name` was newly added as an empty categorical definition.
    pub(crate) fn ensure(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.insert(name, VariableDefinition::categorical());
        true
    }

    /// Iterate `(name, definition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableDefinition)> {
        self.variables.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Iterate variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate categorical variables only.
    pub fn categorical(&self) -> impl Iterator<Item = (&str, &VariableDefinition)> {
        self.iter().filter(|(_, d)| d.kind == VariableType::Categorical)
    }

    /// Iterate continuous variables only.
    pub fn continuous(&self) -> impl Iterator<Item = (&str, &VariableDefinition)> {
        self.iter().filter(|(_, d)| d.kind == VariableType::Continuous)
    }
}

impl<N: Into<String>> FromIterator<(N, VariableDefinition)> for Codebook {
    fn from_iter<T: IntoIterator<Item = (N, VariableDefinition)>>(iter: T) -> Self {
        let mut cb = Codebook::new();
        for (name, def) in iter {
            cb.insert(name, def);
        }
        cb
    }
}

impl Serialize for Codebook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variables.len()))?;
        for (name, def) in &self.variables {
            map.serialize_entry(name, def)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Codebook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodebookVisitor;

        impl<'de> Visitor<'de> for CodebookVisitor {
            type Value = Codebook;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable name to {codes, type}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Codebook, A::Error> {
                let mut cb = Codebook::new();
                while let Some((name, def)) = access.next_entry::<String, VariableDefinition>()? {
                    cb.insert(name, def);
                }
                Ok(cb)
            }
        }

        deserializer.deserialize_map(CodebookVisitor)
    }
}
