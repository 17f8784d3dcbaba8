use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::CodebookError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// What kind of input was being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Codebook document pages.
    Document,
    /// Delimited survey table.
    Table,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path.
    pub path: PathBuf,
    /// Document or table.
    pub kind: SourceKind,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Pages (documents) or rows (tables) read.
    pub records: usize,
}

/// Observer interface for ingestion outcomes.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        _severity: IngestionSeverity,
        _error: &CodebookError,
    ) {
    }

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &CodebookError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &CodebookError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &CodebookError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards ingestion events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        info!(kind = ?ctx.kind, path = %ctx.path.display(), records = stats.records, "ingested");
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &CodebookError,
    ) {
        warn!(kind = ?ctx.kind, path = %ctx.path.display(), ?severity, %error, "ingestion failed");
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &CodebookError) {
        error!(kind = ?ctx.kind, path = %ctx.path.display(), ?severity, %error, "ingestion alert");
    }
}

/// Observer settings shared by document and table reads.
#[derive(Clone)]
pub struct ObserverOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for ObserverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl ObserverOptions {
    /// Report the outcome of a read to the configured observer, if any.
    pub(crate) fn report<T>(
        &self,
        ctx: &IngestionContext,
        result: &Result<T, CodebookError>,
        records: impl FnOnce(&T) -> usize,
    ) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        match result {
            Ok(v) => obs.on_success(ctx, IngestionStats { records: records(v) }),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= self.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }
}

pub(crate) fn severity_for_error(e: &CodebookError) -> IngestionSeverity {
    match e {
        CodebookError::Io(_) => IngestionSeverity::Critical,
        CodebookError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        CodebookError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        _ => IngestionSeverity::Error,
    }
}
