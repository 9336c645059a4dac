use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use serde_json::Value;
use strum::Display;

use crate::constants::*;
use crate::{Error, Result};

/// The `ApiResource` of the spark-on-k8s-operator `SparkApplication`.
pub fn api_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk(SKO_GROUP, SKO_VERSION, SKO_KIND);
    ApiResource::from_gvk_with_plural(&gvk, SKO_PLURAL)
}

/// Parses a YAML (or JSON) application descriptor into an object which can be
/// submitted as is.
pub fn parse_application(descriptor: &str) -> Result<DynamicObject> {
    let value: Value = serde_yaml::from_str(descriptor)
        .map_err(|e| Error::FailedDeserializeObjectFromYaml { internal: e })?;
    if !value.is_object() {
        return Err(Error::ApplicationNotAMapping {
            found: value_kind(&value).to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| Error::FailedDeserializeObjectFromJson { internal: e })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Reads `status.applicationState.state`.
///
/// `None` means the operator has not reported a state yet, which is different from
/// an empty state string. Non-string values are rendered as JSON text.
pub fn application_state(application: &DynamicObject) -> Option<String> {
    application.data.pointer(STATE_POINTER).map(|state| match state {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

pub fn application_error_message(application: &DynamicObject) -> Option<&str> {
    application
        .data
        .pointer(ERROR_MESSAGE_POINTER)
        .and_then(Value::as_str)
}

/// The bucket an application state falls into.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum StateClass {
    /// The application is on its way; check again later.
    Intermediate,
    Failure,
    Success,
    /// A state none of the other buckets know about.
    Unrecognized,
}

impl StateClass {
    pub fn of(state: &str) -> Self {
        if FAILURE_STATES.contains(&state) {
            StateClass::Failure
        } else if INTERMEDIATE_STATES.contains(&state) {
            StateClass::Intermediate
        } else if state == SUCCESS_STATE {
            StateClass::Success
        } else {
            StateClass::Unrecognized
        }
    }
}

/// Outcome of a single non-failing status check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollResult {
    NotDone,
    Done,
}

impl From<PollResult> for bool {
    fn from(result: PollResult) -> Self {
        result == PollResult::Done
    }
}
