//! Categorical decoding: raw integer codes → codebook labels.

use tracing::debug;

use crate::codebook::VariableDefinition;
use crate::error::{CodebookError, CodebookResult};
use crate::types::{DataSet, DataType, Value};

/// Returns a new [`DataSet`] with `column` decoded through `definition.codes`.
///
/// - A value whose integer code (see [`Value::as_code`]) is a key in `codes` becomes that label.
/// - Everything else becomes [`Value::Null`]: missing values, codes the codebook does not list,
///   non-integral numbers and free text. No raw code survives decoding.
///
/// The column's type becomes [`DataType::Utf8`]. Fails with
/// [`CodebookError::SchemaMismatch`] if `column` is not in the dataset.
pub fn decode_categorical(
    dataset: &DataSet,
    column: &str,
    definition: &VariableDefinition,
) -> CodebookResult<DataSet> {
    let mut out = dataset.clone();
    decode_categorical_in_place(&mut out, column, definition)?;
    Ok(out)
}

/// In-place variant of [`decode_categorical`].
pub fn decode_categorical_in_place(
    dataset: &mut DataSet,
    column: &str,
    definition: &VariableDefinition,
) -> CodebookResult<()> {
    let idx = column_index(dataset, column)?;
    let mut unmapped = 0usize;
    dataset.update_column(idx, |cell| {
        let was_present = !cell.is_null();
        *cell = decode_value(cell, definition);
        if was_present && cell.is_null() {
            unmapped += 1;
        }
    });
    dataset.schema.fields[idx].data_type = DataType::Utf8;
    debug!(column, unmapped, "decoded categorical column");
    Ok(())
}

/// Decode a single value through `definition`.
pub fn decode_value(value: &Value, definition: &VariableDefinition) -> Value {
    value
        .as_code()
        .and_then(|code| definition.label(code))
        .map_or(Value::Null, |label| Value::Utf8(label.to_string()))
}

pub(crate) fn column_index(dataset: &DataSet, column: &str) -> CodebookResult<usize> {
    dataset
        .schema
        .index_of(column)
        .ok_or_else(|| CodebookError::SchemaMismatch {
            message: format!("column '{column}' not found in dataset"),
        })
}

#[cfg(test)]
mod tests {
    use super::{decode_categorical, decode_value};
    use crate::codebook::VariableDefinition;
    use crate::error::CodebookError;
    use crate::types::{DataSet, DataType, Schema, Value};

    fn aa4() -> VariableDefinition {
        VariableDefinition::categorical()
            .with_code(1, "Yes")
            .with_code(5, "No")
            .with_code(8, "DK")
            .with_code(9, "NA")
    }

    fn column_of(values: Vec<Value>) -> DataSet {
        DataSet::new(
            Schema::uniform(["AA4"], DataType::Float64),
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    fn utf8(s: &str) -> Value {
        Value::Utf8(s.to_string())
    }

    #[test]
    fn decodes_codes_and_keeps_missing_missing() {
        let ds = column_of(vec![
            Value::Float64(1.0),
            Value::Float64(5.0),
            Value::Float64(8.0),
            Value::Float64(9.0),
            Value::Null,
            Value::Float64(1.0),
        ]);

        let out = decode_categorical(&ds, "AA4", &aa4()).unwrap();
        assert_eq!(
            out.column("AA4").unwrap(),
            vec![utf8("Yes"), utf8("No"), utf8("DK"), utf8("NA"), Value::Null, utf8("Yes")]
        );
        assert_eq!(out.schema.fields[0].data_type, DataType::Utf8);
        // Input untouched.
        assert_eq!(ds.rows[0][0], Value::Float64(1.0));
    }

    #[test]
    fn unmapped_codes_become_missing() {
        let ds = column_of(vec![
            Value::Float64(2.0),
            Value::Float64(1.5),
            Value::Int64(5),
            utf8("x"),
        ]);
        let out = decode_categorical(&ds, "AA4", &aa4()).unwrap();
        assert_eq!(
            out.column("AA4").unwrap(),
            vec![Value::Null, Value::Null, utf8("No"), Value::Null]
        );
    }

    #[test]
    fn all_missing_column_stays_missing_for_any_definition() {
        let ds = column_of(vec![Value::Null; 4]);
        for def in [aa4(), VariableDefinition::categorical(), VariableDefinition::continuous()] {
            let out = decode_categorical(&ds, "AA4", &def).unwrap();
            assert!(out.column("AA4").unwrap().iter().all(Value::is_null));
        }
    }

    #[test]
    fn decoded_values_are_only_labels_or_missing() {
        let def = aa4();
        let ds = column_of((-2..12).map(|i| Value::Float64(i as f64)).collect());
        let out = decode_categorical(&ds, "AA4", &def).unwrap();

        for v in out.column("AA4").unwrap() {
            match v {
                Value::Null => {}
                Value::Utf8(s) => assert!(def.codes.labels().any(|l| l == s)),
                other => panic!("unexpected decoded value {other:?}"),
            }
        }
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let ds = column_of(vec![Value::Null]);
        let err = decode_categorical(&ds, "ZZ1", &aa4()).unwrap_err();
        assert!(matches!(err, CodebookError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("column 'ZZ1' not found"));
    }

    #[test]
    fn decode_value_uses_integer_coercion() {
        assert_eq!(decode_value(&utf8(" 9 "), &aa4()), utf8("NA"));
        assert_eq!(decode_value(&Value::Null, &aa4()), Value::Null);
    }
}
