use std::sync::Arc;

use crate::error::{FilterError, Position, Result};
use crate::exptest::{ExpTest, ExpTestKeeper};
use crate::resolve::{AttributeResolver, PathResolver};
use crate::sequence::{ForLoop, ObjectIterator, SequenceAdapter};
use crate::settings::Settings;
use crate::trace::{RenderScope, RenderTracer, TracingRenderTracer};
use crate::value::{Kwargs, Value};

/// The evaluation context a filter runs in.
///
/// Bundles what the surrounding engine provides: the expression test
/// registry, attribute resolution, sequence adaptation, render tracing and
/// the current template position. One interpreter serves one render; the
/// test registry behind it is shared.
pub struct Interpreter {
    tests: Arc<ExpTestKeeper>,
    resolver: Arc<dyn AttributeResolver>,
    sequences: Arc<dyn SequenceAdapter>,
    tracer: Arc<dyn RenderTracer>,
    position: Position,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            tests: ExpTestKeeper::shared(),
            resolver: Arc::new(PathResolver::default()),
            sequences: Arc::new(ObjectIterator::default()),
            tracer: Arc::new(TracingRenderTracer),
            position: Position::default(),
        }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_resolver(Arc::new(PathResolver::new(settings.resolver.missing)))
            .with_sequences(Arc::new(ObjectIterator::new(settings.sequence.scalars)))
    }
    pub fn with_tests(mut self, tests: Arc<ExpTestKeeper>) -> Self {
        self.tests = tests;
        self
    }
    pub fn with_resolver(mut self, resolver: Arc<dyn AttributeResolver>) -> Self {
        self.resolver = resolver;
        self
    }
    pub fn with_sequences(mut self, sequences: Arc<dyn SequenceAdapter>) -> Self {
        self.sequences = sequences;
        self
    }
    pub fn with_tracer(mut self, tracer: Arc<dyn RenderTracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }
    /// Moves the interpreter to a new template position, e.g. when the
    /// renderer advances to the next node.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
    pub fn line_number(&self) -> usize {
        self.position.line
    }

    pub fn get_exp_test(&self, name: &str) -> Option<Arc<dyn ExpTest>> {
        self.tests.get(name)
    }
    pub fn resolve_property(&self, element: &Value, attribute: &str) -> Result<Value> {
        self.resolver
            .resolve(element, attribute)
            .map_err(|message| FilterError::AttributeResolution {
                attribute: attribute.to_owned(),
                message,
                position: self.position,
            })
    }
    pub fn get_loop<'a>(&self, var: &'a Value) -> Result<ForLoop<'a>> {
        self.sequences
            .adapt(var)
            .map_err(|e| FilterError::NotIterable { found: e.0, position: self.position })
    }
    pub fn start_render(&self, name: &'static str, args: &[Value], kwargs: &Kwargs) -> RenderScope<'_> {
        RenderScope::enter(self.tracer.as_ref(), name, args, kwargs)
    }
}
