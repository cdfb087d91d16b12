//! Semantic comparison of two dumps
//!
//! Two JSON dumps are equal when they describe the same tree, under these rules:
//!
//! - an expected value of `"<ANYTHING>"` matches any actual value
//! - values of different kinds never match
//! - strings and booleans match exactly, nulls always match
//! - numbers match within an absolute epsilon (1.0 by default) to absorb layout noise
//! - array elements explicitly marked non-`Visible` are ignored, the rest compare pairwise
//! - objects must agree on visibility; two hidden objects skip their `children`;
//!   the remaining keys must be the same set, compared recursively
//!
//! The comparison stops at the first divergence. The diagnostic trail names it and
//! every enclosing key path, innermost first.

use crate::error::{CompareError, DocumentSide};
use crate::walker::CHILDREN_KEY;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Expected value that matches anything
pub const WILDCARD: &str = "<ANYTHING>";
pub const DEFAULT_EPSILON: f64 = 1.0;
pub const VISIBILITY_KEY: &str = "Visibility";
pub const VISIBLE: &str = "Visible";

/// Unicode "Other" characters (controls, format marks) ignored when spotting the wildcard
static OTHER_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{C}").expect("valid general category pattern"));

/// Outcome of a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub equal: bool,
    /// Divergence point and enclosing contexts, innermost first; empty when equal
    pub diagnostics: Vec<String>,
}

impl ComparisonResult {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    pub fn trail(&self) -> String {
        self.diagnostics.join("\n")
    }

    /// `Err(CompareError::Mismatch)` carrying the trail when the dumps differ
    pub fn into_result(self) -> Result<(), CompareError> {
        if self.equal {
            Ok(())
        } else {
            Err(CompareError::Mismatch {
                trail: self.trail(),
            })
        }
    }
}

/// Compare two JSON dumps with the default epsilon
pub fn dumps_are_equal(expected: &str, actual: &str) -> Result<bool, CompareError> {
    Ok(Comparator::default().compare_dumps(expected, actual)?.equal)
}

/// Compare two JSON dumps, keeping the diagnostic trail
pub fn compare_dumps(expected: &str, actual: &str) -> Result<ComparisonResult, CompareError> {
    Comparator::default().compare_dumps(expected, actual)
}

/// Compare two already parsed dumps
pub fn compare_values(expected: Value, actual: Value) -> Result<ComparisonResult, CompareError> {
    Comparator::default().compare_values(expected, actual)
}

/// Configured comparator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparator {
    epsilon: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn compare_dumps(
        &self,
        expected: &str,
        actual: &str,
    ) -> Result<ComparisonResult, CompareError> {
        let expected = parse(expected, DocumentSide::Expected)?;
        let actual = parse(actual, DocumentSide::Actual)?;
        self.compare_values(expected, actual)
    }

    pub fn compare_values(
        &self,
        expected: Value,
        actual: Value,
    ) -> Result<ComparisonResult, CompareError> {
        let mut run = Run {
            epsilon: self.epsilon,
            trail: Vec::new(),
        };
        let equal = run.values(expected, actual, "root")?;
        Ok(ComparisonResult {
            equal,
            diagnostics: run.trail,
        })
    }
}

fn parse(text: &str, side: DocumentSide) -> Result<Value, CompareError> {
    serde_json::from_str(text).map_err(|source| CompareError::Parse { side, source })
}

/// One comparison; values are consumed so that object keys can be removed in place
struct Run {
    epsilon: f64,
    trail: Vec<String>,
}

impl Run {
    fn note(&mut self, line: String) {
        debug!("{}", line);
        self.trail.push(line);
    }

    fn values(&mut self, expected: Value, actual: Value, path: &str) -> Result<bool, CompareError> {
        if is_wildcard(&expected) {
            trace!(path, actual = kind_name(&actual), "wildcard matched");
            return Ok(true);
        }
        if kind_name(&expected) != kind_name(&actual) {
            self.note(format!(
                "{}: expected {} {} got {} {}",
                path,
                kind_name(&expected),
                expected,
                kind_name(&actual),
                actual
            ));
            return Ok(false);
        }

        match (expected, actual) {
            (Value::String(e), Value::String(a)) => {
                if e != a {
                    self.note(format!("{}: expected string {:?} got {:?}", path, e, a));
                    return Ok(false);
                }
                Ok(true)
            }
            (Value::Number(e), Value::Number(a)) => {
                let (e, a) = (number(&e, path)?, number(&a, path)?);
                if (e - a).abs() > self.epsilon {
                    self.note(format!(
                        "{}: expected number {} got {} (epsilon {})",
                        path, e, a, self.epsilon
                    ));
                    return Ok(false);
                }
                Ok(true)
            }
            (Value::Bool(e), Value::Bool(a)) => {
                if e != a {
                    self.note(format!("{}: expected {} got {}", path, e, a));
                    return Ok(false);
                }
                Ok(true)
            }
            (Value::Null, Value::Null) => Ok(true),
            (Value::Array(e), Value::Array(a)) => self.arrays(e, a, path),
            (Value::Object(e), Value::Object(a)) => self.objects(e, a, path),
            (e, a) => Err(CompareError::SchemaViolation {
                path: path.to_string(),
                detail: format!(
                    "no comparison rule for {} against {}",
                    kind_name(&e),
                    kind_name(&a)
                ),
            }),
        }
    }

    fn arrays(
        &mut self,
        expected: Vec<Value>,
        actual: Vec<Value>,
        path: &str,
    ) -> Result<bool, CompareError> {
        let (expected_total, actual_total) = (expected.len(), actual.len());
        let expected = retain_visible(expected, path)?;
        let actual = retain_visible(actual, path)?;

        if expected.len() != actual.len() {
            self.note(format!(
                "{}: expected {} visible elements ({} total) got {} ({} total)",
                path,
                expected.len(),
                expected_total,
                actual.len(),
                actual_total
            ));
            return Ok(false);
        }
        for (index, (e, a)) in expected.into_iter().zip(actual).enumerate() {
            let element_path = format!("{}[{}]", path, index);
            if !self.values(e, a, &element_path)? {
                self.note(format!("{}: element {} differs", path, index));
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn objects(
        &mut self,
        mut expected: Map<String, Value>,
        mut actual: Map<String, Value>,
        path: &str,
    ) -> Result<bool, CompareError> {
        let expected_visible = take_visibility(&mut expected, path)?;
        let actual_visible = take_visibility(&mut actual, path)?;
        if expected_visible != actual_visible {
            self.note(format!(
                "{}: expected {} node got {} node",
                path,
                visibility_label(expected_visible),
                visibility_label(actual_visible)
            ));
            return Ok(false);
        }
        if !expected_visible {
            expected.remove(CHILDREN_KEY);
            actual.remove(CHILDREN_KEY);
        }

        if expected.len() != actual.len() {
            self.note(format!(
                "{}: expected {} keys [{}] got {} keys [{}]",
                path,
                expected.len(),
                key_list(&expected),
                actual.len(),
                key_list(&actual)
            ));
            return Ok(false);
        }
        for (key, e) in expected {
            let key_path = format!("{}.{}", path, key);
            let Some(a) = actual.remove(&key) else {
                self.note(format!("{}: missing from actual", key_path));
                return Ok(false);
            };
            if !self.values(e, a, &key_path)? {
                self.note(format!("{}: property {} differs", path, key));
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn is_wildcard(value: &Value) -> bool {
    match value {
        Value::String(s) => OTHER_CHARS.replace_all(s, "") == WILDCARD,
        _ => false,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn number(n: &serde_json::Number, path: &str) -> Result<f64, CompareError> {
    n.as_f64().ok_or_else(|| CompareError::SchemaViolation {
        path: path.to_string(),
        detail: format!("number {} has no floating-point representation", n),
    })
}

/// Remove `Visibility`; absent means visible
fn take_visibility(object: &mut Map<String, Value>, path: &str) -> Result<bool, CompareError> {
    match object.remove(VISIBILITY_KEY) {
        None => Ok(true),
        Some(Value::String(visibility)) => Ok(visibility == VISIBLE),
        Some(other) => Err(non_string_visibility(path, &other)),
    }
}

/// Drop elements explicitly marked non-visible
fn retain_visible(values: Vec<Value>, path: &str) -> Result<Vec<Value>, CompareError> {
    let mut kept = Vec::with_capacity(values.len());
    for value in values {
        let collapsed = match value.get(VISIBILITY_KEY) {
            Some(Value::String(visibility)) => visibility != VISIBLE,
            Some(other) => return Err(non_string_visibility(path, other)),
            None => false,
        };
        if !collapsed {
            kept.push(value);
        }
    }
    Ok(kept)
}

fn non_string_visibility(path: &str, value: &Value) -> CompareError {
    CompareError::SchemaViolation {
        path: path.to_string(),
        detail: format!("{} must be a string, found {} {}", VISIBILITY_KEY, kind_name(value), value),
    }
}

fn visibility_label(visible: bool) -> &'static str {
    if visible {
        "visible"
    } else {
        "collapsed"
    }
}

fn key_list(object: &Map<String, Value>) -> String {
    object.keys().cloned().collect::<Vec<_>>().join(", ")
}
