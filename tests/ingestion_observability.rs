use std::sync::{Arc, Mutex};

use survey_codebook::ingestion::{
    ingest_table_from_path, read_document_pages, CompositeObserver, DocumentOptions,
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, ObserverOptions,
    SourceKind, TableOptions,
};
use survey_codebook::CodebookError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(SourceKind, usize)>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push((ctx.kind, stats.records));
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &CodebookError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &CodebookError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn observed(obs: &Arc<RecordingObserver>) -> ObserverOptions {
    ObserverOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
    }
}

#[test]
fn observer_receives_failure_and_alert_on_missing_table() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = TableOptions {
        observe: observed(&obs),
        ..Default::default()
    };

    let _ = ingest_table_from_path("tests/fixtures/does_not_exist.tsv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_schema_mismatch() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = TableOptions {
        columns: Some(vec!["definitely_missing".to_string()]),
        observe: observed(&obs),
        ..Default::default()
    };

    let _ = ingest_table_from_path("tests/fixtures/waves.tsv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out_successes() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);
    let observe = ObserverOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let table_opts = TableOptions {
        observe: observe.clone(),
        ..Default::default()
    };
    ingest_table_from_path("tests/fixtures/waves.tsv", &table_opts).unwrap();

    let doc_opts = DocumentOptions {
        observe,
        ..Default::default()
    };
    read_document_pages("tests/fixtures/codebook_pages.txt", &doc_opts).unwrap();

    for obs in [&a, &b] {
        assert_eq!(
            *obs.successes.lock().unwrap(),
            vec![(SourceKind::Table, 6), (SourceKind::Document, 5)]
        );
    }
}
