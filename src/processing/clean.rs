//! Continuous cleaning: sentinel codes → missing.

use tracing::debug;

use crate::error::CodebookResult;
use crate::types::{DataSet, Value};

use super::decode::column_index;
use super::sentinel::SentinelSet;

/// Returns a new [`DataSet`] where every `column` value equal to a sentinel is [`Value::Null`].
///
/// Values are compared after integer coercion ([`Value::as_code`]), so `98.0` matches sentinel
/// `98` while `98.5` does not. Every other value, missing ones included, passes through
/// unchanged. No codebook lookup happens here.
pub fn clean_continuous(
    dataset: &DataSet,
    column: &str,
    sentinels: &SentinelSet,
) -> CodebookResult<DataSet> {
    let mut out = dataset.clone();
    clean_continuous_in_place(&mut out, column, sentinels)?;
    Ok(out)
}

/// In-place variant of [`clean_continuous`]. Returns how many values were replaced.
pub fn clean_continuous_in_place(
    dataset: &mut DataSet,
    column: &str,
    sentinels: &SentinelSet,
) -> CodebookResult<usize> {
    let idx = column_index(dataset, column)?;
    let mut replaced = 0usize;
    dataset.update_column(idx, |cell| {
        if is_sentinel(cell, sentinels) {
            *cell = Value::Null;
            replaced += 1;
        }
    });
    debug!(column, replaced, sentinels = %sentinels, "cleaned continuous column");
    Ok(replaced)
}

/// Returns `true` if `value` coerces to one of `sentinels`.
pub fn is_sentinel(value: &Value, sentinels: &SentinelSet) -> bool {
    value.as_code().is_some_and(|code| sentinels.contains(code))
}

#[cfg(test)]
mod tests {
    use super::{clean_continuous, clean_continuous_in_place};
    use crate::processing::SentinelSet;
    use crate::types::{DataSet, DataType, Schema, Value};

    fn ag2(values: Vec<Value>) -> DataSet {
        DataSet::new(
            Schema::uniform(["AG2"], DataType::Float64),
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    #[test]
    fn replaces_sentinels_with_missing() {
        let ds = ag2(vec![
            Value::Float64(3.0),
            Value::Float64(98.0),
            Value::Float64(99.0),
            Value::Null,
            Value::Float64(7.0),
        ]);

        let out = clean_continuous(&ds, "AG2", &SentinelSet::from([98, 99])).unwrap();
        assert_eq!(
            out.column("AG2").unwrap(),
            vec![Value::Float64(3.0), Value::Null, Value::Null, Value::Null, Value::Float64(7.0)]
        );
        assert_eq!(out.schema, ds.schema);
    }

    #[test]
    fn non_integral_values_are_not_sentinels() {
        let mut ds = ag2(vec![Value::Float64(98.5), Value::Int64(98), Value::Float64(-99.0)]);
        let replaced =
            clean_continuous_in_place(&mut ds, "AG2", &SentinelSet::from([98, 99])).unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(
            ds.column("AG2").unwrap(),
            vec![Value::Float64(98.5), Value::Null, Value::Float64(-99.0)]
        );
    }

    #[test]
    fn output_has_no_sentinels_and_keeps_prior_missing() {
        let sentinels = SentinelSet::from([-1, 0, 97, 98, 99]);
        let values: Vec<Value> = (-3..102)
            .map(|i| if i % 7 == 0 { Value::Null } else { Value::Float64(i as f64) })
            .collect();
        let ds = ag2(values.clone());
        let out = clean_continuous(&ds, "AG2", &sentinels).unwrap().column("AG2").unwrap();

        for (before, after) in values.iter().zip(&out) {
            assert!(after.as_code().is_none_or(|c| !sentinels.contains(c)));
            if before.is_null() {
                assert!(after.is_null());
            }
        }
    }

    #[test]
    fn empty_sentinel_set_is_identity() {
        let ds = ag2(vec![Value::Float64(98.0), Value::Null]);
        assert_eq!(clean_continuous(&ds, "AG2", &SentinelSet::new()).unwrap(), ds);
    }

    #[test]
    fn missing_column_is_an_error() {
        let ds = ag2(vec![Value::Null]);
        assert!(clean_continuous(&ds, "BG2", &SentinelSet::from([98])).is_err());
    }
}
