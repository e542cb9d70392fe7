//! Cost of Delay and WSJF prioritization scores.
//!
//! The scalar calculators are strict and return `InvalidArgument` on any bad
//! input. `apply_quantifiers` wraps them for batch use over key results and
//! deliverables, where failures only leave the derived field unset.
use crate::error::{EngineError, EngineResult};
use serde_json::{Map, Value};

pub const QUANTIFIERS_KEY: &str = "quantifiers";
pub const USER_BUSINESS_VALUE: &str = "user_business_value";
pub const TIME_CRITICALITY: &str = "time_criticality";
pub const OPPORTUNITY_ENABLEMENT: &str = "opportunity_enablement_or_risk_reduction";
pub const JOBSIZE: &str = "jobsize";
pub const COST_OF_DELAY: &str = "cost_of_delay";
pub const WSJF: &str = "weighted_shortest_job_first";

const INPUT_MAX: i64 = 10;
const COST_OF_DELAY_MAX: i64 = 3 * INPUT_MAX;

/// Sum the three business inputs, each in `0..=10`.
pub fn cost_of_delay(
    user_business_value: i64,
    time_criticality: i64,
    opportunity_enablement_or_risk_reduction: i64,
) -> EngineResult<i64> {
    check_input(USER_BUSINESS_VALUE, user_business_value)?;
    check_input(TIME_CRITICALITY, time_criticality)?;
    check_input(
        OPPORTUNITY_ENABLEMENT,
        opportunity_enablement_or_risk_reduction,
    )?;
    Ok(user_business_value + time_criticality + opportunity_enablement_or_risk_reduction)
}

/// Divide cost of delay by job size, rounded to two decimals.
///
/// Rounding is half away from zero: `1 / 8` yields `0.13`.
pub fn weighted_shortest_job_first(cost_of_delay: i64, jobsize: i64) -> EngineResult<f64> {
    if !(0..=COST_OF_DELAY_MAX).contains(&cost_of_delay) {
        return Err(EngineError::invalid(format!(
            "{COST_OF_DELAY} must be between 0 and {COST_OF_DELAY_MAX} (got {cost_of_delay})"
        )));
    }
    if jobsize < 1 {
        return Err(EngineError::invalid(format!(
            "{JOBSIZE} must be at least 1 (got {jobsize})"
        )));
    }
    Ok(round_to_hundredths(cost_of_delay as f64 / jobsize as f64))
}

/// Read a strict integer input from a document value.
///
/// Booleans, floats (even integral ones like `1.0`), strings and `null` are
/// rejected.
pub fn integer_input(name: &str, value: Option<&Value>) -> EngineResult<i64> {
    let value = value.ok_or_else(|| EngineError::invalid(format!("{name} is missing")))?;
    match value {
        Value::Number(number) => number.as_i64().ok_or_else(|| {
            EngineError::invalid(format!("{name} is {number}, expected an integer"))
        }),
        other => Err(EngineError::invalid(format!(
            "{name} is {}, expected an integer",
            value_kind(other)
        ))),
    }
}

/// Cost of delay computed from a quantifiers mapping.
pub fn cost_of_delay_from(quantifiers: &Map<String, Value>) -> EngineResult<i64> {
    cost_of_delay(
        integer_input(USER_BUSINESS_VALUE, quantifiers.get(USER_BUSINESS_VALUE))?,
        integer_input(TIME_CRITICALITY, quantifiers.get(TIME_CRITICALITY))?,
        integer_input(OPPORTUNITY_ENABLEMENT, quantifiers.get(OPPORTUNITY_ENABLEMENT))?,
    )
}

/// WSJF computed from a quantifiers mapping, reading its current cost of delay.
pub fn weighted_shortest_job_first_from(quantifiers: &Map<String, Value>) -> EngineResult<f64> {
    weighted_shortest_job_first(
        integer_input(COST_OF_DELAY, quantifiers.get(COST_OF_DELAY))?,
        integer_input(JOBSIZE, quantifiers.get(JOBSIZE))?,
    )
}

/// Fill in missing derived quantifiers on each element.
///
/// Only `null` or absent `cost_of_delay` / `weighted_shortest_job_first` are
/// computed; explicit values are kept. WSJF sees a cost of delay computed in
/// the same pass. Never fails.
pub fn apply_quantifiers(elements: &mut [Value]) {
    for element in elements.iter_mut() {
        let Some(item) = element.as_object_mut() else {
            continue;
        };
        let element_id = item
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let Some(quantifiers) = item.get_mut(QUANTIFIERS_KEY).and_then(Value::as_object_mut)
        else {
            continue;
        };

        if is_unset(quantifiers, COST_OF_DELAY) {
            match cost_of_delay_from(quantifiers) {
                Ok(value) => {
                    quantifiers.insert(COST_OF_DELAY.to_string(), Value::from(value));
                }
                Err(err) => {
                    tracing::debug!(
                        element = %element_id,
                        error = %err,
                        "cost_of_delay calculation skipped"
                    );
                }
            }
        }

        if is_unset(quantifiers, WSJF) {
            match weighted_shortest_job_first_from(quantifiers) {
                Ok(value) => {
                    quantifiers.insert(WSJF.to_string(), Value::from(value));
                }
                Err(err) => {
                    tracing::debug!(
                        element = %element_id,
                        error = %err,
                        "weighted_shortest_job_first calculation skipped"
                    );
                }
            }
        }
    }
}

fn is_unset(map: &Map<String, Value>, key: &str) -> bool {
    matches!(map.get(key), None | Some(Value::Null))
}

fn check_input(name: &str, value: i64) -> EngineResult<()> {
    if (0..=INPUT_MAX).contains(&value) {
        return Ok(());
    }
    Err(EngineError::invalid(format!(
        "{name} must be between 0 and {INPUT_MAX} (got {value})"
    )))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
#[path = "quantifiers_tests.rs"]
mod tests;
