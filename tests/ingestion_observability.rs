use std::fs;
use std::sync::{Arc, Mutex};

use session_ingest::IngestError;
use session_ingest::ingestion::{
    CompositeObserver, FileObserver, IngestContext, IngestObserver, IngestOptions, IngestStats,
    Severity, ingest_with_options,
};
use session_ingest::state::{IngestStatus, SessionState};

/// Records every callback as a flat event string.
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl IngestObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestContext, stats: IngestStats) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok source={} rows={} columns={}", ctx.source, stats.rows, stats.columns));
    }

    fn on_failure(&self, ctx: &IngestContext, severity: Severity, _error: &IngestError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("fail source={} severity={severity:?}", ctx.source));
    }

    fn on_alert(&self, ctx: &IngestContext, severity: Severity, _error: &IngestError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("alert source={} severity={severity:?}", ctx.source));
    }
}

fn options_with(observer: Arc<dyn IngestObserver>, threshold: Severity) -> IngestOptions {
    IngestOptions {
        observer: Some(observer),
        alert_at_or_above: threshold,
        ..Default::default()
    }
}

#[test]
fn observer_sees_success_with_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), Severity::Critical);

    let state = ingest_with_options("tests/fixtures/people.csv", SessionState::new(), &opts);
    assert_eq!(state.status, IngestStatus::Completed);
    assert_eq!(obs.events(), vec!["ok source=csv rows=2 columns=4"]);
}

#[test]
fn validation_failure_reports_error_severity_without_alert() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), Severity::Critical);

    let state = ingest_with_options(&path, SessionState::new(), &opts);
    assert_eq!(state.status, IngestStatus::Error);
    // Empty file is a validation failure, not an I/O one: below the Critical alert threshold.
    assert_eq!(obs.events(), vec!["fail source=csv severity=Error"]);
}

#[test]
fn alert_fires_when_threshold_is_met() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), Severity::Error);

    ingest_with_options(&path, SessionState::new(), &opts);
    assert_eq!(
        obs.events(),
        vec![
            "fail source=csv severity=Error",
            "alert source=csv severity=Error"
        ]
    );
}

#[test]
fn unsupported_file_type_is_reported_to_the_observer() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), Severity::Error);

    let state = ingest_with_options("report.pdf", SessionState::new(), &opts);
    assert_eq!(state.status, IngestStatus::Error);
    assert_eq!(
        obs.events(),
        vec![
            "fail source=unknown severity=Error",
            "alert source=unknown severity=Error"
        ]
    );
}

#[test]
fn composite_observer_fans_out() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let composite = Arc::new(CompositeObserver::new(vec![
        first.clone() as Arc<dyn IngestObserver>,
        second.clone() as Arc<dyn IngestObserver>,
    ]));
    let opts = options_with(composite, Severity::Critical);

    ingest_with_options("tests/fixtures/people.json", SessionState::new(), &opts);
    assert_eq!(first.events(), vec!["ok source=json rows=2 columns=4"]);
    assert_eq!(second.events(), vec!["ok source=json rows=2 columns=4"]);
}

#[test]
fn file_observer_appends_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("ingest.log");
    let obs = Arc::new(FileObserver::new(&log_path));
    let opts = options_with(obs, Severity::Critical);

    ingest_with_options("tests/fixtures/people.csv", SessionState::new(), &opts);
    ingest_with_options("report.pdf", SessionState::new(), &opts);

    let log = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok source=csv"));
    assert!(lines[0].contains("rows=2 columns=4"));
    assert!(lines[1].contains("fail"));
    assert!(lines[1].contains("source=unknown"));
}
