//! Rule parameter values and the merge rules shared by every rule factory.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const KEY_SOURCE_S3_URI: &str = "source_s3_uri";
pub const KEY_RULE_TO_INVOKE: &str = "rule_to_invoke";
const OTHER_TRIAL_PREFIX: &str = "other_trial_";

/// A single rule parameter value.
///
/// Debugger rule requests carry these as-is; profiler rule requests render
/// them as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Rule parameters keyed by parameter name
pub type RuleParameters = BTreeMap<String, ParameterValue>;

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(true) => f.write_str("True"),
            ParameterValue::Bool(false) => f.write_str("False"),
            ParameterValue::Integer(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => f.write_str(&float_text(*value)),
            ParameterValue::Text(value) => f.write_str(value),
        }
    }
}

/// Shortest round-trip text: whole floats keep `.0`, and values below 1e-4
/// or from 1e16 up use a signed two-digit exponent (`2e-05`, `1e+20`).
fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    // Debug switches to exponent form at the same magnitudes
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

/// Build rule parameters from `(key, value)` pairs.
pub fn rule_parameters<K, V, I>(pairs: I) -> RuleParameters
where
    K: Into<String>,
    V: Into<ParameterValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Merge `source` / `rule_to_invoke` with caller parameters.
///
/// Precedence (lowest to highest): `source_s3_uri`, `rule_to_invoke`, then
/// every entry of `rule_parameters`. Supplying only one of `source` and
/// `rule_to_invoke` is rejected.
pub fn merge_rule_parameters(
    source: Option<&str>,
    rule_to_invoke: Option<&str>,
    rule_parameters: Option<&RuleParameters>,
) -> Result<RuleParameters, RuleError> {
    if is_present(source) != is_present(rule_to_invoke) {
        return Err(RuleError::InvalidArgument(
            "If you provide a source, you must also provide a rule to invoke (and vice versa)."
                .to_string(),
        ));
    }

    let mut merged = RuleParameters::new();
    if let Some(source) = source.filter(|s| !s.is_empty()) {
        merged.insert(KEY_SOURCE_S3_URI.to_string(), source.into());
    }
    if let Some(rule_to_invoke) = rule_to_invoke.filter(|r| !r.is_empty()) {
        merged.insert(KEY_RULE_TO_INVOKE.to_string(), rule_to_invoke.into());
    }
    if let Some(rule_parameters) = rule_parameters {
        merged.extend(rule_parameters.clone());
    }
    Ok(merged)
}

/// One `other_trial_<index>` entry per input path, in order.
pub fn other_trial_parameters<S: AsRef<str>>(paths: &[S]) -> RuleParameters {
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            (
                format!("{}{}", OTHER_TRIAL_PREFIX, index),
                ParameterValue::from(path.as_ref()),
            )
        })
        .collect()
}

/// Render every parameter value as text.
pub fn stringify_parameters(parameters: &RuleParameters) -> BTreeMap<String, String> {
    parameters
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}
