//! Adapting arbitrary host values into something a filter can loop over.

use std::iter;

use serde::Deserialize;

use crate::value::{Value, type_name};

/// How scalars (booleans, numbers, strings) are adapted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarPolicy {
    /// A scalar is a sequence of one.
    #[default]
    Singleton,
    /// A scalar is not iterable.
    Reject,
}

/// The value could not be adapted; carries its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotIterable(pub &'static str);

/// Forward, single-pass, lazy iteration over the elements of a sequence.
///
/// Elements are borrowed from the adapted value; nothing is copied until a
/// filter decides to return one.
pub struct ForLoop<'a> {
    items: Box<dyn Iterator<Item = &'a Value> + 'a>,
    index: usize,
}

impl<'a> ForLoop<'a> {
    pub fn new(items: impl Iterator<Item = &'a Value> + 'a) -> Self {
        Self { items: Box::new(items), index: 0 }
    }
    pub fn empty() -> Self {
        Self::new(iter::empty())
    }
    /// Number of elements handed out so far.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a> Iterator for ForLoop<'a> {
    type Item = &'a Value;
    fn next(&mut self) -> Option<&'a Value> {
        let next = self.items.next();
        if next.is_some() {
            self.index += 1;
        }
        next
    }
}

pub trait SequenceAdapter: Send + Sync {
    /// Obtains a fresh iteration over `var`. Called once per filter invocation.
    fn adapt<'a>(&self, var: &'a Value) -> Result<ForLoop<'a>, NotIterable>;
}

/// Null loops zero times, arrays loop over their items, objects over their
/// values in map order, scalars according to the [`ScalarPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ObjectIterator {
    scalars: ScalarPolicy,
}

impl ObjectIterator {
    pub fn new(scalars: ScalarPolicy) -> Self {
        Self { scalars }
    }
}

impl SequenceAdapter for ObjectIterator {
    fn adapt<'a>(&self, var: &'a Value) -> Result<ForLoop<'a>, NotIterable> {
        match var {
            Value::Null => Ok(ForLoop::empty()),
            Value::Array(items) => Ok(ForLoop::new(items.iter())),
            Value::Object(map) => Ok(ForLoop::new(map.values())),
            scalar => match self.scalars {
                ScalarPolicy::Singleton => Ok(ForLoop::new(iter::once(scalar))),
                ScalarPolicy::Reject => Err(NotIterable(type_name(scalar))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loop_counts_handed_out_elements() {
        let v = json!([1, 2, 3]);
        let mut l = ObjectIterator::default().adapt(&v).unwrap();
        assert_eq!(l.next(), Some(&json!(1)));
        assert_eq!(l.index(), 1);
        assert_eq!(l.by_ref().count(), 2);
        assert_eq!(l.index(), 3);
    }

    #[test]
    fn scalars_follow_policy() {
        let v = json!("abc");
        let items: Vec<_> = ObjectIterator::default().adapt(&v).unwrap().collect();
        assert_eq!(items, vec![&json!("abc")]);
        let err = ObjectIterator::new(ScalarPolicy::Reject).adapt(&v).err();
        assert_eq!(err, Some(NotIterable("string")));
    }

    #[test]
    fn null_is_empty_and_objects_yield_values() {
        assert_eq!(ObjectIterator::default().adapt(&Value::Null).unwrap().count(), 0);
        let v = json!({"a": 1, "b": 2});
        let items: Vec<_> = ObjectIterator::default().adapt(&v).unwrap().cloned().collect();
        assert_eq!(items, vec![json!(1), json!(2)]);
    }
}
