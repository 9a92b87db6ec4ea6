//! Expression tests and the registry that keeps them.
//!
//! An expression test is a named boolean check on a value, optionally
//! parameterized by extra arguments (`x is divisibleby 3`). Filters look
//! tests up by name through the [`Interpreter`]; they never construct them.
//!
//! The [`ExpTestKeeper`] owns the tests. It is filled before rendering starts
//! and shared read-only afterwards, typically as `Arc<ExpTestKeeper>`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

use lazy_static::lazy_static;
use seahash::SeaHasher;

use crate::error::{FilterError, Result};
use crate::interpreter::Interpreter;
use crate::value::{Value, is_truthy};

pub type TestHasher = BuildHasherDefault<SeaHasher>;

pub trait ExpTest: Send + Sync {
    fn name(&self) -> &'static str;
    /// Evaluates the test on `value`. `args` are the extra arguments given
    /// after the test name, in order.
    fn evaluate(&self, value: &Value, interpreter: &Interpreter, args: &[Value]) -> Result<bool>;
}

pub type Check = fn(&BuiltinTest, &Value, &Interpreter, &[Value]) -> Result<bool>;

/// A test implemented by a plain function.
#[derive(Clone, Copy)]
pub struct BuiltinTest {
    name: &'static str,
    check: Check,
}

impl BuiltinTest {
    pub const fn new(name: &'static str, check: Check) -> Self {
        Self { name, check }
    }
    fn arg<'a>(&self, interpreter: &Interpreter, args: &'a [Value]) -> Result<&'a Value> {
        args.first().ok_or_else(|| self.invalid(interpreter, "requires 1 argument".into()))
    }
    fn number_arg(&self, interpreter: &Interpreter, args: &[Value]) -> Result<f64> {
        let arg = self.arg(interpreter, args)?;
        arg.as_f64()
            .ok_or_else(|| self.invalid(interpreter, format!("requires a numeric argument, got {arg}")))
    }
    fn invalid(&self, interpreter: &Interpreter, message: String) -> FilterError {
        FilterError::InvalidTestArgument { test: self.name, message, position: interpreter.position() }
    }
}

impl ExpTest for BuiltinTest {
    fn name(&self) -> &'static str {
        self.name
    }
    fn evaluate(&self, value: &Value, interpreter: &Interpreter, args: &[Value]) -> Result<bool> {
        (self.check)(self, value, interpreter, args)
    }
}

// ------------- Checks -------------
fn integer(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|i| loosely_equal(i, needle)),
        Value::Object(map) => needle.as_str().is_some_and(|k| map.contains_key(k)),
        Value::String(s) => needle.as_str().is_some_and(|n| s.contains(n)),
        _ => false,
    }
}

fn ordered(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value], accept: fn(Ordering) -> bool) -> Result<bool> {
    let other = t.arg(i, a)?;
    Ok(compare(v, other).is_some_and(accept))
}

fn is_truthy_test(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(is_truthy(v))
}
fn is_defined(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(!v.is_null())
}
fn is_undefined(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_null())
}
fn is_boolean(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_boolean())
}
fn is_true(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.as_bool() == Some(true))
}
fn is_false(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.as_bool() == Some(false))
}
fn is_number(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_number())
}
fn is_integer(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_i64() || v.is_u64())
}
fn is_float(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_f64())
}
fn is_string(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_string())
}
fn is_mapping(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_object())
}
fn is_sequence(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_array())
}
fn is_iterable(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.is_array() || v.is_object())
}
fn is_even(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(integer(v).is_some_and(|n| n % 2 == 0))
}
fn is_odd(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(integer(v).is_some_and(|n| n % 2 != 0))
}
fn is_divisible_by(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    let divisor = t.number_arg(i, a)?;
    if divisor == 0.0 {
        return Err(t.invalid(i, "requires a non-zero divisor".into()));
    }
    Ok(v.as_f64().is_some_and(|n| n % divisor == 0.0))
}
fn is_equal_to(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    Ok(loosely_equal(v, t.arg(i, a)?))
}
fn is_not_equal_to(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    Ok(!loosely_equal(v, t.arg(i, a)?))
}
fn is_lt(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    ordered(t, v, i, a, Ordering::is_lt)
}
fn is_le(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    ordered(t, v, i, a, Ordering::is_le)
}
fn is_gt(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    ordered(t, v, i, a, Ordering::is_gt)
}
fn is_ge(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    ordered(t, v, i, a, Ordering::is_ge)
}
fn is_lower(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.as_str().is_some_and(|s| s.chars().all(|c| !c.is_uppercase())))
}
fn is_upper(_: &BuiltinTest, v: &Value, _: &Interpreter, _: &[Value]) -> Result<bool> {
    Ok(v.as_str().is_some_and(|s| s.chars().all(|c| !c.is_lowercase())))
}
fn is_containing(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    let needle = t.arg(i, a)?;
    Ok(v.is_array() && contains(v, needle))
}
fn is_containing_all(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    let needles = t.arg(i, a)?;
    let Value::Array(needles) = needles else {
        return Err(t.invalid(i, format!("requires a sequence argument, got {needles}")));
    };
    Ok(v.is_array() && needles.iter().all(|n| contains(v, n)))
}
fn is_within(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    Ok(contains(t.arg(i, a)?, v))
}
fn is_string_containing(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    let needle = t.arg(i, a)?;
    Ok(match (v.as_str(), needle.as_str()) {
        (Some(s), Some(n)) => s.contains(n),
        _ => false,
    })
}
fn is_string_starting_with(t: &BuiltinTest, v: &Value, i: &Interpreter, a: &[Value]) -> Result<bool> {
    let prefix = t.arg(i, a)?;
    Ok(match (v.as_str(), prefix.as_str()) {
        (Some(s), Some(p)) => s.starts_with(p),
        _ => false,
    })
}

/// Tests registered by [`ExpTestKeeper::builtin`], with their extra names.
const BUILTINS: &[(BuiltinTest, &[&str])] = &[
    (BuiltinTest::new("truthy", is_truthy_test), &[]),
    (BuiltinTest::new("defined", is_defined), &[]),
    (BuiltinTest::new("undefined", is_undefined), &["none"]),
    (BuiltinTest::new("boolean", is_boolean), &[]),
    (BuiltinTest::new("true", is_true), &[]),
    (BuiltinTest::new("false", is_false), &[]),
    (BuiltinTest::new("number", is_number), &[]),
    (BuiltinTest::new("integer", is_integer), &[]),
    (BuiltinTest::new("float", is_float), &[]),
    (BuiltinTest::new("string", is_string), &[]),
    (BuiltinTest::new("mapping", is_mapping), &[]),
    (BuiltinTest::new("sequence", is_sequence), &[]),
    (BuiltinTest::new("iterable", is_iterable), &[]),
    (BuiltinTest::new("even", is_even), &[]),
    (BuiltinTest::new("odd", is_odd), &[]),
    (BuiltinTest::new("divisibleby", is_divisible_by), &[]),
    (BuiltinTest::new("equalto", is_equal_to), &["eq", "=="]),
    (BuiltinTest::new("ne", is_not_equal_to), &["!="]),
    (BuiltinTest::new("lt", is_lt), &["<"]),
    (BuiltinTest::new("le", is_le), &["<="]),
    (BuiltinTest::new("gt", is_gt), &[">"]),
    (BuiltinTest::new("ge", is_ge), &[">="]),
    (BuiltinTest::new("lower", is_lower), &[]),
    (BuiltinTest::new("upper", is_upper), &[]),
    (BuiltinTest::new("containing", is_containing), &[]),
    (BuiltinTest::new("containingall", is_containing_all), &[]),
    (BuiltinTest::new("within", is_within), &["in"]),
    (BuiltinTest::new("string_containing", is_string_containing), &[]),
    (BuiltinTest::new("string_startingwith", is_string_starting_with), &[]),
];

lazy_static! {
    static ref BUILTIN_KEEPER: Arc<ExpTestKeeper> = Arc::new(ExpTestKeeper::builtin());
}

#[derive(Default)]
pub struct ExpTestKeeper {
    kept: HashMap<String, Arc<dyn ExpTest>, TestHasher>,
}

impl ExpTestKeeper {
    pub fn new() -> Self {
        Self { kept: HashMap::default() }
    }
    /// A keeper holding every built-in test, `truthy` included.
    pub fn builtin() -> Self {
        let mut keeper = Self::new();
        for (test, aliases) in BUILTINS {
            let test: Arc<dyn ExpTest> = Arc::new(*test);
            for name in aliases.iter().copied().chain([test.name()]) {
                keeper.keep_as(name, Arc::clone(&test));
            }
        }
        keeper
    }
    /// The process-wide built-in keeper.
    pub fn shared() -> Arc<ExpTestKeeper> {
        Arc::clone(&BUILTIN_KEEPER)
    }
    /// Keeps `test` under its own name. Returns the kept test and whether a
    /// test was already kept under that name, in which case the earlier one wins.
    pub fn keep(&mut self, test: impl ExpTest + 'static) -> (Arc<dyn ExpTest>, bool) {
        let name = test.name();
        self.keep_as(name, Arc::new(test))
    }
    pub fn keep_as(&mut self, name: &str, test: Arc<dyn ExpTest>) -> (Arc<dyn ExpTest>, bool) {
        match self.kept.entry(name.to_owned()) {
            Entry::Occupied(e) => (Arc::clone(e.get()), true),
            Entry::Vacant(e) => (Arc::clone(e.insert(test)), false),
        }
    }
    pub fn get(&self, name: &str) -> Option<Arc<dyn ExpTest>> {
        self.kept.get(name).map(Arc::clone)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.kept.contains_key(name)
    }
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kept.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
