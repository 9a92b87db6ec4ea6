//! Template filters.
//!
//! A filter receives the value left of the pipe (`var`), the positional and
//! named arguments it was called with, and the interpreter it runs in.
//! [`SelectAttrFirstFilter`] implements `selectattrfirst`:
//!
//! ```text
//! {{ contents|selectattrfirst('post_list_summary_featured_image') }}
//! {{ users|selectattrfirst('age', 'gt', 30) }}
//! ```

use serde::Serialize;
use tracing::trace;

use crate::error::{FilterError, Result};
use crate::interpreter::Interpreter;
use crate::trace::{Outcome, Phase};
use crate::value::{Kwargs, Value, type_name};

pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;
    /// Documentation for the filter, as shown by documentation generators.
    fn doc(&self) -> FilterDoc;
    fn filter(&self, var: &Value, interpreter: &Interpreter, args: &[Value], kwargs: &Kwargs) -> Result<Option<Value>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamDoc>,
    pub snippets: Vec<SnippetDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDoc {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetDoc {
    pub description: &'static str,
    pub code: &'static str,
}

/// Validated positional arguments of a `selectattrfirst` call.
#[derive(Debug, PartialEq)]
struct Invocation<'a> {
    attr: &'a str,
    exp_test: Option<&'a str>,
    exp_args: &'a [Value],
}

/// Selects the first element of a sequence whose attribute passes an
/// expression test, `truthy` unless another test is named. Unlike a full
/// `selectattr` it stops at the first match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAttrFirstFilter;

impl SelectAttrFirstFilter {
    pub const NAME: &'static str = "selectattrfirst";
    pub const DEFAULT_TEST: &'static str = "truthy";

    fn validate<'a>(&self, interpreter: &Interpreter, args: &'a [Value]) -> Result<Invocation<'a>> {
        let Some(first) = args.first() else {
            return Err(FilterError::MissingArgument {
                filter: Self::NAME,
                name: "attr",
                position: interpreter.position(),
            });
        };
        let attr = Self::string_arg(interpreter, "attr", first)?;
        let exp_test = args
            .get(1)
            .map(|arg| Self::string_arg(interpreter, "exp_test", arg))
            .transpose()?;
        Ok(Invocation { attr, exp_test, exp_args: args.get(2..).unwrap_or(&[]) })
    }

    fn string_arg<'a>(interpreter: &Interpreter, name: &'static str, arg: &'a Value) -> Result<&'a str> {
        arg.as_str().ok_or_else(|| FilterError::InvalidArgumentType {
            filter: Self::NAME,
            name,
            expected: "string",
            found: type_name(arg),
            position: interpreter.position(),
        })
    }
}

impl Filter for SelectAttrFirstFilter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn doc(&self) -> FilterDoc {
        FilterDoc {
            name: Self::NAME,
            description: "Filters a sequence of objects by applying a test to an attribute of an object \
                and only selecting the first with the test succeeding. This is similar to selectattr \
                but is fast if you just want the first item",
            params: vec![
                ParamDoc {
                    name: "sequence",
                    kind: "sequence",
                    description: "Sequence to test",
                    required: true,
                    default_value: None,
                },
                ParamDoc {
                    name: "attr",
                    kind: "string",
                    description: "Attribute to test for and select items that contain it",
                    required: true,
                    default_value: None,
                },
                ParamDoc {
                    name: "exp_test",
                    kind: "name of expression test",
                    description: "Specify which expression test to run for making the selection",
                    required: false,
                    default_value: Some(Self::DEFAULT_TEST),
                },
            ],
            snippets: vec![SnippetDoc {
                description: "This expression would select the first containing content.post_list_summary_featured_image",
                code: "{{ contents|selectattrfirst('post_list_summary_featured_image') }}",
            }],
        }
    }

    fn filter(&self, var: &Value, interpreter: &Interpreter, args: &[Value], kwargs: &Kwargs) -> Result<Option<Value>> {
        let mut scope = interpreter.start_render(Self::NAME, args, kwargs);

        let call = self.validate(interpreter, args)?;

        scope.advance(Phase::Resolving);
        let test_name = call.exp_test.unwrap_or(Self::DEFAULT_TEST);
        let exp_test = interpreter
            .get_exp_test(test_name)
            .ok_or_else(|| FilterError::UnknownPredicate {
                name: test_name.to_owned(),
                position: interpreter.position(),
            })?;

        scope.advance(Phase::Scanning);
        let mut items = interpreter.get_loop(var)?;
        for (index, item) in items.by_ref().enumerate() {
            let attr_val = interpreter.resolve_property(item, call.attr)?;
            let passed = exp_test.evaluate(&attr_val, interpreter, call.exp_args)?;
            trace!(filter = Self::NAME, index, test = exp_test.name(), passed, "scanned element");
            if passed {
                scope.finish(Outcome::Matched { index });
                return Ok(Some(item.clone()));
            }
        }
        scope.finish(Outcome::Exhausted { scanned: items.index() });
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_splits_arguments() {
        let i = Interpreter::new();
        let args = [json!("age"), json!("gt"), json!(30), json!("x")];
        let call = SelectAttrFirstFilter.validate(&i, &args).unwrap();
        assert_eq!(call, Invocation { attr: "age", exp_test: Some("gt"), exp_args: &args[2..] });

        let args = [json!("flag")];
        let call = SelectAttrFirstFilter.validate(&i, &args).unwrap();
        assert_eq!(call, Invocation { attr: "flag", exp_test: None, exp_args: &[] });
    }

    #[test]
    fn validation_names_the_offending_argument() {
        let i = Interpreter::new();
        let err = SelectAttrFirstFilter.validate(&i, &[json!("a"), json!(true)]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgumentType { name: "exp_test", found: "boolean", .. }));
    }

    #[test]
    fn doc_serializes_with_param_types() {
        let doc = serde_json::to_value(SelectAttrFirstFilter.doc()).unwrap();
        assert_eq!(doc["name"], "selectattrfirst");
        assert_eq!(doc["params"][2]["type"], "name of expression test");
        assert_eq!(doc["params"][2]["default_value"], "truthy");
        assert!(doc["params"][0].get("default_value").is_none());
    }
}
