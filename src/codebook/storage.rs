//! JSON persistence for [`Codebook`].
//!
//! The file is a single object keyed by variable name, in first-seen order:
//!
//! ```json
//! {
//!   "AA4": {
//!     "codes": { "1": "Yes", "5": "No" },
//!     "type": "categorical"
//!   }
//! }
//! ```
//!
//! JSON object keys are strings, so codes are written stringified and parsed back to integers on
//! load. A code key that is not an integer fails the load.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::CodebookResult;

use super::Codebook;

/// Serialize a codebook to pretty-printed JSON (2-space indent).
pub fn to_json_string(codebook: &Codebook) -> CodebookResult<String> {
    Ok(serde_json::to_string_pretty(codebook)?)
}

/// Parse a codebook from JSON text.
pub fn from_json_str(input: &str) -> CodebookResult<Codebook> {
    Ok(serde_json::from_str(input)?)
}

/// Write a codebook to `path`, replacing any existing file.
pub fn save_codebook(codebook: &Codebook, path: impl AsRef<Path>) -> CodebookResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, codebook)?;
    out.flush()?;
    info!(path = %path.display(), variables = codebook.len(), "codebook saved");
    Ok(())
}

/// Load a codebook previously written by [`save_codebook`].
pub fn load_codebook(path: impl AsRef<Path>) -> CodebookResult<Codebook> {
    let path = path.as_ref();
    let codebook: Codebook = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    info!(path = %path.display(), variables = codebook.len(), "codebook loaded");
    Ok(codebook)
}

#[cfg(test)]
mod tests {
    use super::{from_json_str, to_json_string};
    use crate::codebook::{Codebook, VariableDefinition, VariableType};
    use crate::error::CodebookError;

    fn sample() -> Codebook {
        vec![
            (
                "BA50",
                VariableDefinition::categorical()
                    .with_code(1, "New firm")
                    .with_code(2, "Active start-up")
                    .with_code(3, "Quit"),
            ),
            (
                "AA4",
                VariableDefinition::categorical()
                    .with_code(1, "Yes")
                    .with_code(5, "No"),
            ),
            ("AG2", VariableDefinition::continuous().with_code(98, "Don't know")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn json_round_trip_preserves_structure_and_order() {
        let cb = sample();
        let json = to_json_string(&cb).unwrap();
        let back = from_json_str(&json).unwrap();

        assert_eq!(back, cb);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["BA50", "AA4", "AG2"]);
    }

    #[test]
    fn codes_are_written_with_string_keys() {
        let json = to_json_string(&sample()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["AA4"]["codes"]["5"], "No");
        assert_eq!(v["AA4"]["type"], "categorical");
        assert_eq!(v["AG2"]["type"], "continuous");
        assert!(json.contains("\n  \"BA50\": {"));
    }

    #[test]
    fn codes_are_written_in_document_order() {
        let mut cb = Codebook::new();
        cb.insert(
            "AA4",
            VariableDefinition::categorical()
                .with_code(9, "NA")
                .with_code(1, "Yes")
                .with_code(9, "Refused"),
        );
        let json = to_json_string(&cb).unwrap();

        let refused = json.find("\"9\": \"Refused\"").unwrap();
        let yes = json.find("\"1\": \"Yes\"").unwrap();
        assert!(refused < yes, "codes reordered: {json}");
        assert_eq!(from_json_str(&json).unwrap(), cb);
    }

    #[test]
    fn load_coerces_string_keys_to_integers() {
        let cb = from_json_str(
            r#"{"AG2": {"codes": {}, "type": "continuous"},
                "AA4": {"type": "categorical", "codes": {"8": "DK", "9": "NA"}}}"#,
        )
        .unwrap();

        assert_eq!(cb.get("AG2").unwrap().kind, VariableType::Continuous);
        assert_eq!(cb.get("AA4").unwrap().label(8), Some("DK"));
        assert_eq!(cb.names().collect::<Vec<_>>(), vec!["AG2", "AA4"]);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let non_integer_key =
            from_json_str(r#"{"AA4": {"codes": {"x": "Yes"}, "type": "categorical"}}"#);
        assert!(matches!(non_integer_key, Err(CodebookError::Json(_))));

        let bad_type = from_json_str(r#"{"AA4": {"codes": {}, "type": "ordinal"}}"#);
        assert!(matches!(bad_type, Err(CodebookError::Json(_))));

        let not_a_map = from_json_str("[1, 2]");
        assert!(matches!(not_a_map, Err(CodebookError::Json(_))));
    }
}
