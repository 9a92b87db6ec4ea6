//! Render-lifecycle notifications around filter evaluation.
//!
//! A filter enters a [`RenderScope`] first thing. The scope notifies the
//! [`RenderTracer`] on entry and, from its `Drop`, exactly once on exit,
//! whichever way the filter returns.

use std::fmt;

use tracing::{debug, warn};

use crate::value::{Kwargs, Value, display_args};

/// Where a filter invocation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Resolving,
    Scanning,
}

/// How a filter invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The element at `index` matched; nothing after it was examined.
    Matched { index: usize },
    /// All `scanned` elements were examined without a match.
    Exhausted { scanned: usize },
    /// The invocation failed while in `phase`.
    Failed { phase: Phase },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Matched { index } => write!(f, "matched at {index}"),
            Outcome::Exhausted { scanned } => write!(f, "exhausted after {scanned}"),
            Outcome::Failed { phase } => write!(f, "failed while {phase:?}"),
        }
    }
}

/// What the exit notification reports about an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    /// The positional arguments rendered as `[a, b, c]`.
    pub attr: String,
    pub kwargs: Kwargs,
    pub outcome: Outcome,
}

pub trait RenderTracer: Send + Sync {
    fn start_render(&self, name: &str);
    fn end_render(&self, name: &str, summary: &RenderSummary);
}

/// Emits render notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderTracer;

impl RenderTracer for TracingRenderTracer {
    fn start_render(&self, name: &str) {
        debug!(filter = name, "start render");
    }
    fn end_render(&self, name: &str, summary: &RenderSummary) {
        let kwargs = Value::Object(summary.kwargs.clone());
        if summary.outcome.is_success() {
            debug!(filter = name, attr = %summary.attr, %kwargs, outcome = %summary.outcome, "end render");
        } else {
            warn!(filter = name, attr = %summary.attr, %kwargs, outcome = %summary.outcome, "end render");
        }
    }
}

pub struct RenderScope<'t> {
    tracer: &'t dyn RenderTracer,
    name: &'static str,
    attr: String,
    kwargs: Kwargs,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl<'t> RenderScope<'t> {
    pub fn enter(tracer: &'t dyn RenderTracer, name: &'static str, args: &[Value], kwargs: &Kwargs) -> Self {
        tracer.start_render(name);
        Self {
            tracer,
            name,
            attr: display_args(args),
            kwargs: kwargs.clone(),
            phase: Phase::Validating,
            outcome: None,
        }
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn advance(&mut self, phase: Phase) {
        self.phase = phase;
    }
    /// Records a successful end. A scope dropped without one reports a
    /// failure in the phase it was last in.
    pub fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for RenderScope<'_> {
    fn drop(&mut self) {
        let summary = RenderSummary {
            attr: std::mem::take(&mut self.attr),
            kwargs: std::mem::take(&mut self.kwargs),
            outcome: self.outcome.unwrap_or(Outcome::Failed { phase: self.phase }),
        };
        self.tracer.end_render(self.name, &summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);
    impl RenderTracer for Recorder {
        fn start_render(&self, name: &str) {
            self.0.lock().unwrap().push(format!("start {name}"));
        }
        fn end_render(&self, name: &str, summary: &RenderSummary) {
            self.0.lock().unwrap().push(format!("end {name} {} {}", summary.attr, summary.outcome));
        }
    }

    #[test]
    fn dropped_scope_reports_failure_in_last_phase() {
        let recorder = Recorder::default();
        {
            let mut scope = RenderScope::enter(&recorder, "f", &[json!("a")], &Kwargs::new());
            scope.advance(Phase::Resolving);
        }
        let events = recorder.0.lock().unwrap();
        assert_eq!(*events, vec!["start f", "end f [a] failed while Resolving"]);
    }

    #[test]
    fn finished_scope_reports_its_outcome_once() {
        let recorder = Recorder::default();
        {
            let mut scope = RenderScope::enter(&recorder, "f", &[], &Kwargs::new());
            scope.advance(Phase::Scanning);
            scope.finish(Outcome::Exhausted { scanned: 4 });
        }
        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], "end f [] exhausted after 4");
    }
}
