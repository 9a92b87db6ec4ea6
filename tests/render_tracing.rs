use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use selectattrfirst::filter::{Filter, SelectAttrFirstFilter};
use selectattrfirst::interpreter::Interpreter;
use selectattrfirst::trace::{Outcome, Phase, RenderSummary, RenderTracer};
use selectattrfirst::value::Kwargs;

#[derive(Debug, PartialEq)]
enum Event {
    Start(String),
    End(String, RenderSummary),
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}
impl RenderTracer for Recorder {
    fn start_render(&self, name: &str) {
        self.events.lock().unwrap().push(Event::Start(name.to_owned()));
    }
    fn end_render(&self, name: &str, summary: &RenderSummary) {
        self.events.lock().unwrap().push(Event::End(name.to_owned(), summary.clone()));
    }
}

fn setup() -> (Interpreter, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    (Interpreter::new().with_tracer(recorder.clone()), recorder)
}

fn kwargs() -> Kwargs {
    let mut kwargs = Kwargs::new();
    kwargs.insert("strict".into(), json!(true));
    kwargs
}

/// Runs the filter and returns the single end summary, checking the
/// start/end pairing on the way.
fn traced(var: &Value, args: &[Value]) -> RenderSummary {
    let (interpreter, recorder) = setup();
    let _ = SelectAttrFirstFilter.filter(var, &interpreter, args, &kwargs());
    let mut events = recorder.events.lock().unwrap();
    assert_eq!(events.len(), 2, "one start and one end: {events:?}");
    assert_eq!(events[0], Event::Start("selectattrfirst".into()));
    match events.pop() {
        Some(Event::End(name, summary)) => {
            assert_eq!(name, "selectattrfirst");
            summary
        }
        other => panic!("expected end event, got {other:?}"),
    }
}

#[test]
fn match_is_traced_with_index() {
    let summary = traced(&json!([{"a": 0}, {"a": 1}]), &[json!("a")]);
    assert_eq!(summary.outcome, Outcome::Matched { index: 1 });
    assert_eq!(summary.attr, "[a]");
    assert_eq!(summary.kwargs, kwargs());
}

#[test]
fn exhausted_scan_is_traced_with_count() {
    let summary = traced(&json!([{"a": 0}, {"a": 0}, {"a": 0}]), &[json!("a"), json!("gt"), json!(5)]);
    assert_eq!(summary.outcome, Outcome::Exhausted { scanned: 3 });
    assert_eq!(summary.attr, "[a, gt, 5]");
}

#[test]
fn validation_failure_still_ends_render() {
    let summary = traced(&json!([]), &[]);
    assert_eq!(summary.outcome, Outcome::Failed { phase: Phase::Validating });
    assert_eq!(summary.attr, "[]");
}

#[test]
fn unknown_test_fails_while_resolving() {
    let summary = traced(&json!([]), &[json!("a"), json!("doesnotexist")]);
    assert_eq!(summary.outcome, Outcome::Failed { phase: Phase::Resolving });
}

#[test]
fn scan_failure_fails_while_scanning() {
    let summary = traced(&json!([{"a": 1}]), &[json!("a"), json!("divisibleby")]);
    assert_eq!(summary.outcome, Outcome::Failed { phase: Phase::Scanning });
}

#[test]
fn each_call_gets_its_own_notifications() {
    let (interpreter, recorder) = setup();
    let seq = json!([{"a": 1}]);
    for _ in 0..3 {
        SelectAttrFirstFilter.filter(&seq, &interpreter, &[json!("a")], &Kwargs::new()).unwrap();
    }
    let events = recorder.events.lock().unwrap();
    assert_eq!(events.len(), 6);
    assert!(events.iter().step_by(2).all(|e| matches!(e, Event::Start(_))));
}
