use std::fmt;

use thiserror::Error;

/// Where in the template an evaluation is happening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("{filter} filter requires an {name} to filter on ({position})")]
    MissingArgument { filter: &'static str, name: &'static str, position: Position },
    #[error("{filter} filter requires the {name} arg to be a {expected}, got {found} ({position})")]
    InvalidArgumentType {
        filter: &'static str,
        name: &'static str,
        expected: &'static str,
        found: &'static str,
        position: Position,
    },
    #[error("No expression test defined with name '{name}' ({position})")]
    UnknownPredicate { name: String, position: Position },
    #[error("Value of type {found} cannot be iterated ({position})")]
    NotIterable { found: &'static str, position: Position },
    #[error("Could not resolve attribute '{attribute}': {message} ({position})")]
    AttributeResolution { attribute: String, message: String, position: Position },
    #[error("Expression test '{test}' {message} ({position})")]
    InvalidTestArgument { test: &'static str, message: String, position: Position },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Request error: {0}")]
    Request(String),
}

impl FilterError {
    /// The evaluation position for errors raised while a filter was running.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::MissingArgument { position, .. }
            | Self::InvalidArgumentType { position, .. }
            | Self::UnknownPredicate { position, .. }
            | Self::NotIterable { position, .. }
            | Self::AttributeResolution { position, .. }
            | Self::InvalidTestArgument { position, .. } => Some(*position),
            Self::Config(_) | Self::Request(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

// Helper conversions
impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self { Self::Request(e.to_string()) }
}

impl From<std::io::Error> for FilterError {
    fn from(e: std::io::Error) -> Self { Self::Request(e.to_string()) }
}
