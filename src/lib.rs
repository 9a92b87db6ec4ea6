//! selectattrfirst – the "first matching element" filter of a template engine.
//!
//! Given a sequence of objects, `selectattrfirst(attr, exp_test?, ...args)`
//! returns the first element whose attribute `attr` passes the named
//! expression test (`truthy` by default), or nothing when no element does.
//! Unlike a general `selectattr` it stops at the first match, so only the
//! elements up to and including that match are ever looked at.
//!
//! ## Modules
//! * [`filter`] – The [`filter::Filter`] trait, its documentation surface, and
//!   [`filter::SelectAttrFirstFilter`].
//! * [`interpreter`] – The [`interpreter::Interpreter`] evaluation context that
//!   bundles what the host engine provides.
//! * [`exptest`] – The [`exptest::ExpTest`] trait, the built-in tests and the
//!   [`exptest::ExpTestKeeper`] registry.
//! * [`resolve`] – Attribute resolution on host values (dotted paths).
//! * [`sequence`] – Adapting host values into lazy, single-pass loops.
//! * [`trace`] – Start/end render notifications with a drop guard.
//! * [`settings`] – Settings read through the `config` crate.
//! * [`error`] – The [`error::FilterError`] taxonomy.
//!
//! ## Quick Start
//! ```
//! use serde_json::json;
//! use selectattrfirst::filter::{Filter, SelectAttrFirstFilter};
//! use selectattrfirst::interpreter::Interpreter;
//! use selectattrfirst::value::Kwargs;
//! let contents = json!([{"flag": false}, {"flag": 0}, {"flag": "x"}, {"flag": null}]);
//! let interpreter = Interpreter::new();
//! let first = SelectAttrFirstFilter
//!     .filter(&contents, &interpreter, &[json!("flag")], &Kwargs::new())
//!     .unwrap();
//! assert_eq!(first, Some(json!({"flag": "x"})));
//! ```
//!
//! ## Errors
//! Missing or mistyped arguments, unknown tests, values that cannot be
//! iterated and failed attribute lookups all abort the call with a
//! [`error::FilterError`] carrying the template position. Finding nothing is
//! not an error: the filter returns `Ok(None)`.

pub mod error;
pub mod exptest;
pub mod filter;
pub mod interpreter;
pub mod resolve;
pub mod sequence;
pub mod settings;
pub mod trace;
pub mod value;
