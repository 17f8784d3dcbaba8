//! In-memory table types for raw and decoded survey data.
//!
//! A survey table is loaded into a [`DataSet`]: an ordered [`Schema`] of typed [`Field`]s plus
//! row-major [`Value`] storage. [`Value::Null`] is the missing-value marker for both blank raw
//! cells and codes that decoding/cleaning turned into missing.

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string (decoded labels end up here).
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name; for survey tables this is the variable name (e.g. `AA4`).
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a schema where every column shares one data type.
    pub fn uniform<I, S>(names: I, data_type: DataType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| Field::new(name, data_type))
                .collect(),
        )
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single cell value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerce the value to an integer code, the way raw survey responses are compared against
    /// codebook keys and sentinel sets.
    ///
    /// - `Int64` is returned as is.
    /// - `Float64` only when finite and integral (`8.0` is code 8, `8.5` is no code).
    /// - `Utf8` when the trimmed text parses as an integer or an integral float.
    /// - `Null` never has a code.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Value::Null => None,
            Value::Int64(v) => Some(*v),
            Value::Float64(v) => float_to_code(*v),
            Value::Utf8(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_code))
            }
        }
    }
}

fn float_to_code(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound must be exclusive.
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Clone out the values of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.column_at(idx))
    }

    pub(crate) fn column_at(&self, idx: usize) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Replace the values (and type) of the column at `idx`.
    ///
    /// Rows too short to hold the column are left as they are, matching [`DataSet::column`],
    /// which reads their missing cells as [`Value::Null`].
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row.
    pub fn replace_column(&mut self, idx: usize, data_type: DataType, values: Vec<Value>) {
        assert!(
            values.len() == self.rows.len(),
            "column length {} does not match row count {}",
            values.len(),
            self.rows.len()
        );
        self.schema.fields[idx].data_type = data_type;
        for (row, value) in self.rows.iter_mut().zip(values) {
            if let Some(cell) = row.get_mut(idx) {
                *cell = value;
            }
        }
    }

    /// Apply `f` to every cell of the column at `idx` in place.
    pub(crate) fn update_column<F>(&mut self, idx: usize, mut f: F)
    where
        F: FnMut(&mut Value),
    {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                f(cell);
            }
        }
    }
}
