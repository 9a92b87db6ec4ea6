//! Attribute resolution on host values.
//!
//! Filters never look inside elements themselves; they ask an
//! [`AttributeResolver`]. The default [`PathResolver`] understands dotted
//! paths where each segment is either an object key or an array index,
//! e.g. `author.emails.0`.

use serde::Deserialize;

use crate::value::{Value, type_name};

/// What to do when a path segment does not exist on the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAttribute {
    /// The attribute resolves to null (undefined).
    #[default]
    Null,
    /// Resolution fails.
    Error,
}

pub trait AttributeResolver: Send + Sync {
    /// Resolves `attribute` on `element`. The error string explains why
    /// resolution failed; the caller adds attribute name and position.
    fn resolve(&self, element: &Value, attribute: &str) -> Result<Value, String>;
}

#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    missing: MissingAttribute,
}

impl PathResolver {
    pub fn new(missing: MissingAttribute) -> Self {
        Self { missing }
    }
    pub fn missing(&self) -> MissingAttribute {
        self.missing
    }
    fn step<'v>(current: &'v Value, segment: &str) -> Option<&'v Value> {
        match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }
}

impl AttributeResolver for PathResolver {
    fn resolve(&self, element: &Value, attribute: &str) -> Result<Value, String> {
        let mut current = element;
        for segment in attribute.split('.') {
            match Self::step(current, segment) {
                Some(next) => current = next,
                None => {
                    return match self.missing {
                        MissingAttribute::Null => Ok(Value::Null),
                        MissingAttribute::Error => Err(format!(
                            "no '{}' on {}",
                            segment,
                            type_name(current)
                        )),
                    };
                }
            }
        }
        Ok(current.clone())
    }
}
