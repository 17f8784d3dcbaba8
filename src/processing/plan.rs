//! Batch decoding/cleaning of many columns at once.
//!
//! A [`DecodePlan`] lists per-column operations. [`apply_plan`] evaluates each column on the
//! rayon pool: columns share nothing but the read-only codebook, so they are computed
//! independently and written back afterwards. Several operations on the same column run in plan
//! order inside one task.

use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::codebook::{Codebook, VariableDefinition};
use crate::error::{CodebookError, CodebookResult};
use crate::types::{DataSet, DataType, Value};

use super::clean::is_sentinel;
use super::decode::{column_index, decode_value};
use super::sentinel::SentinelSet;

/// One column operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOp {
    /// Decode `column` with the codebook entry of the same name.
    Decode { column: String },
    /// Replace `sentinels` in `column` with missing.
    Clean { column: String, sentinels: SentinelSet },
}

impl ColumnOp {
    /// Target column.
    pub fn column(&self) -> &str {
        match self {
            ColumnOp::Decode { column } | ColumnOp::Clean { column, .. } => column,
        }
    }
}

/// Ordered list of column operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodePlan {
    ops: Vec<ColumnOp>,
}

impl DecodePlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decode step.
    #[must_use]
    pub fn decode(mut self, column: impl Into<String>) -> Self {
        self.ops.push(ColumnOp::Decode {
            column: column.into(),
        });
        self
    }

    /// Add a sentinel cleaning step.
    #[must_use]
    pub fn clean(mut self, column: impl Into<String>, sentinels: impl Into<SentinelSet>) -> Self {
        self.ops.push(ColumnOp::Clean {
            column: column.into(),
            sentinels: sentinels.into(),
        });
        self
    }

    /// Decode every categorical codebook variable that is also a dataset column.
    ///
    /// Variables with no codes are left out, since decoding them would blank the column.
    /// Steps follow dataset column order.
    pub fn from_codebook(codebook: &Codebook, dataset: &DataSet) -> Self {
        let ops = dataset
            .schema
            .field_names()
            .filter(|name| {
                codebook
                    .get(name)
                    .is_some_and(|def| def.is_categorical() && !def.codes.is_empty())
            })
            .map(|name| ColumnOp::Decode {
                column: name.to_string(),
            })
            .collect();
        Self { ops }
    }

    /// Steps in order.
    pub fn ops(&self) -> &[ColumnOp] {
        &self.ops
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Which kind of step produced a [`ColumnReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Decode,
    Clean,
}

/// Missing-value counts for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub column: String,
    pub kind: OpKind,
    /// Missing values before the step.
    pub missing_before: usize,
    /// Missing values after the step.
    pub missing_after: usize,
}

impl ColumnReport {
    /// Values the step turned into missing (unmapped codes or sentinels).
    pub fn newly_missing(&self) -> usize {
        self.missing_after - self.missing_before
    }
}

/// Per-step reports, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanReport {
    pub columns: Vec<ColumnReport>,
}

enum ResolvedOp<'a> {
    Decode(&'a VariableDefinition),
    Clean(&'a SentinelSet),
}

struct ColumnTask<'a> {
    idx: usize,
    steps: Vec<(usize, &'a str, ResolvedOp<'a>)>,
}

/// Apply `plan` to `dataset`, returning the transformed copy and per-step reports.
///
/// Every step is validated before any work starts: a column missing from the dataset fails with
/// [`CodebookError::SchemaMismatch`], a decode step with no codebook entry fails with
/// [`CodebookError::UnknownVariable`].
pub fn apply_plan(
    dataset: &DataSet,
    codebook: &Codebook,
    plan: &DecodePlan,
) -> CodebookResult<(DataSet, PlanReport)> {
    let start = Instant::now();
    let tasks = resolve(dataset, codebook, plan)?;

    let results: Vec<(usize, DataType, Vec<Value>, Vec<(usize, ColumnReport)>)> = tasks
        .into_par_iter()
        .map(|task| run_task(dataset, task))
        .collect();

    let mut out = dataset.clone();
    let mut reports: Vec<(usize, ColumnReport)> = Vec::with_capacity(plan.len());
    for (idx, data_type, values, task_reports) in results {
        out.replace_column(idx, data_type, values);
        reports.extend(task_reports);
    }
    reports.sort_by_key(|(order, _)| *order);

    info!(
        steps = plan.len(),
        rows = dataset.row_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "decode plan applied"
    );

    Ok((
        out,
        PlanReport {
            columns: reports.into_iter().map(|(_, r)| r).collect(),
        },
    ))
}

fn resolve<'a>(
    dataset: &DataSet,
    codebook: &'a Codebook,
    plan: &'a DecodePlan,
) -> CodebookResult<Vec<ColumnTask<'a>>> {
    let mut tasks: Vec<ColumnTask<'a>> = Vec::new();
    for (order, op) in plan.ops.iter().enumerate() {
        let idx = column_index(dataset, op.column())?;
        let resolved = match op {
            ColumnOp::Decode { column } => {
                let def = codebook
                    .get(column)
                    .ok_or_else(|| CodebookError::UnknownVariable {
                        name: column.clone(),
                    })?;
                ResolvedOp::Decode(def)
            }
            ColumnOp::Clean { sentinels, .. } => ResolvedOp::Clean(sentinels),
        };

        let step = (order, op.column(), resolved);
        match tasks.iter_mut().find(|t| t.idx == idx) {
            Some(task) => task.steps.push(step),
            None => tasks.push(ColumnTask {
                idx,
                steps: vec![step],
            }),
        }
    }
    Ok(tasks)
}

fn run_task(
    dataset: &DataSet,
    task: ColumnTask<'_>,
) -> (usize, DataType, Vec<Value>, Vec<(usize, ColumnReport)>) {
    let mut data_type = dataset.schema.fields[task.idx].data_type;
    let mut values = dataset.column_at(task.idx);
    let mut reports = Vec::with_capacity(task.steps.len());

    for (order, column, op) in task.steps {
        let missing_before = count_missing(&values);
        let kind = match op {
            ResolvedOp::Decode(def) => {
                values = values.iter().map(|v| decode_value(v, def)).collect();
                data_type = DataType::Utf8;
                OpKind::Decode
            }
            ResolvedOp::Clean(sentinels) => {
                for v in values.iter_mut() {
                    if is_sentinel(v, sentinels) {
                        *v = Value::Null;
                    }
                }
                OpKind::Clean
            }
        };
        reports.push((
            order,
            ColumnReport {
                column: column.to_string(),
                kind,
                missing_before,
                missing_after: count_missing(&values),
            },
        ));
    }

    (task.idx, data_type, values, reports)
}

fn count_missing(values: &[Value]) -> usize {
    values.iter().filter(|v| v.is_null()).count()
}
