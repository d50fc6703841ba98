//! Per-resource schema triple and the validation pipeline shared by every handler.
//!
//! A resource declares a row type (what reads return), a payload type (what creates
//! accept, with required fields and constraints) and, implicitly, a patch shape: the
//! same payload validated with `required` enforced only on the keys actually submitted.

use std::{
    collections::HashMap,
    sync::LazyLock,
};

use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::{ApiError, Issue},
    repository::{ListFilter, Table},
};

/// Whether create/patch answer with a short confirmation or with the stored row.
/// Resources that answer with rows also answer deletes with `204 No Content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    Toast,
    Row,
}

/// A resource that carries one uploaded file: the multipart part is written under
/// `folder` and its stored path lands in `column`.
#[derive(Debug, Clone, Copy)]
pub struct Upload {
    pub column: &'static str,
    pub folder: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Toast
///
/// Short confirmation for admin UIs, e.g. `{"type": "create", "message": "Physics created"}`.
#[derive(Debug, Serialize)]
pub struct Toast {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
}

impl Toast {
    pub fn new(operation: Operation, name: &str) -> Self {
        Self {
            kind: operation.as_str(),
            message: format!("{name} {}d", operation.as_str()),
        }
    }
}

/// Resource
///
/// Implemented by every row type the generic CRUD handlers serve. The implementing type
/// itself is the select shape; `Payload` is the insert shape.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Payload: Serialize + DeserializeOwned + Validate + Send;

    /// Used in log lines.
    const NAME: &'static str;
    /// Route under `/v1`, e.g. `/hr/designation`.
    const PATH: &'static str;
    const TABLE: &'static Table;
    const RESPONSE: ResponseStyle = ResponseStyle::Toast;
    const UPLOAD: Option<Upload> = None;

    /// Translates list query parameters into row conditions.
    fn list_filter(_query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default()
    }

    /// Values applied on create when the client omitted the key.
    fn defaults() -> Map<String, Value> {
        Map::new()
    }

    /// Last chance to rewrite validated values before they are written.
    fn prepare(_values: &mut Map<String, Value>) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Resources offered to form dropdowns as `{value, label}` options.
pub trait ValueLabel: Resource {
    /// Extra row columns copied into each option.
    const EXTRA: &'static [&'static str] = &[];
}

/// validate_insert
///
/// Runs the full payload schema. Every violated field is reported at once; on success the
/// returned map holds exactly the submitted keys the payload knows, normalized to their
/// declared types. Unknown keys (including any client-sent `uuid`) are dropped.
pub fn validate_insert<R: Resource>(
    fields: &Map<String, Value>,
) -> Result<Map<String, Value>, ApiError> {
    let payload = validated::<R::Payload>(fields)?;
    submitted_columns(&payload, fields)
}

/// Parses and fully validates a payload that is not written anywhere (e.g. sign-in).
pub fn validated<T: DeserializeOwned + Validate>(
    fields: &Map<String, Value>,
) -> Result<T, ApiError> {
    checked(fields, false)
}

/// validate_patch
///
/// Same schema with every field optional. A key that is absent may stay absent, but a
/// required key submitted as `null` is still rejected. Fails with `NoUpdates` when nothing
/// writable was submitted.
pub fn validate_patch<R: Resource>(
    fields: &Map<String, Value>,
) -> Result<Map<String, Value>, ApiError> {
    if fields.is_empty() {
        return Err(ApiError::NoUpdates);
    }

    let payload = checked::<R::Payload>(fields, true)?;
    let values = submitted_columns(&payload, fields)?;
    if values.is_empty() {
        return Err(ApiError::NoUpdates);
    }
    Ok(values)
}

/// Coercion issues first, then constraint issues on whatever did coerce, reported together
/// and sorted by path.
fn checked<T: DeserializeOwned + Validate>(
    fields: &Map<String, Value>,
    partial: bool,
) -> Result<T, ApiError> {
    let (payload, mut found) = parse::<T>(fields)?;

    if let Err(errors) = payload.validate() {
        let mistyped: Vec<Vec<String>> = found.iter().map(|issue| issue.path.clone()).collect();
        let omitted = |issue: &Issue| {
            issue
                .path
                .first()
                .is_some_and(|field| !fields.contains_key(field))
        };
        found.extend(issues(&errors).into_iter().filter(|issue| {
            issue.code != "required"
                || !(mistyped.contains(&issue.path) || (partial && omitted(issue)))
        }));
    }

    if found.is_empty() {
        return Ok(payload);
    }
    found.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
    Err(ApiError::Validation(found))
}

/// Deserializes the submitted fields. When that fails, each field is tried on its own so
/// every value of the wrong type gets an `invalid_type` issue on its own path; the
/// returned payload holds the fields that did coerce.
fn parse<T: DeserializeOwned>(fields: &Map<String, Value>) -> Result<(T, Vec<Issue>), ApiError> {
    if let Ok(payload) = serde_json::from_value(Value::Object(fields.clone())) {
        return Ok((payload, Vec::new()));
    }

    let mut coerced = Map::new();
    let mut mistyped = Vec::new();
    for (key, value) in fields {
        let single = Map::from_iter([(key.clone(), value.clone())]);
        match serde_json::from_value::<T>(Value::Object(single)) {
            Ok(_) => {
                coerced.insert(key.clone(), value.clone());
            }
            Err(e) => mistyped.push(Issue::new("invalid_type", &[key.as_str()], e.to_string())),
        }
    }

    serde_json::from_value(Value::Object(coerced))
        .map(|payload| (payload, mistyped))
        .map_err(|e| ApiError::invalid("invalid_type", &[], e.to_string()))
}

fn submitted_columns<T: Serialize>(
    payload: &T,
    submitted: &Map<String, Value>,
) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(mut normalized)) => {
            normalized.retain(|key, _| submitted.contains_key(key));
            Ok(normalized)
        }
        Ok(_) => Err(ApiError::Internal("payload is not an object".to_string())),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

fn issues(errors: &ValidationErrors) -> Vec<Issue> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| Issue {
                code: error.code.to_string(),
                path: vec![field.clone()],
                message: describe(&field, error),
            })
        })
        .collect()
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |key: &str| error.params.get(key).map(Value::to_string);
    match error.code.as_ref() {
        "required" => "Required".to_string(),
        "email" => "Invalid email".to_string(),
        "invalid_date_time" => format!("{field} must be in the format \"YYYY-MM-DD HH:MM:SS\""),
        "invalid_date" => format!("{field} must be in the format \"YYYY-MM-DD\""),
        "length" => match (param("equal"), param("min"), param("max")) {
            (Some(n), _, _) => format!("String must contain exactly {n} character(s)"),
            (None, Some(n), _) => format!("String must contain at least {n} character(s)"),
            (None, None, Some(n)) => format!("String must contain at most {n} character(s)"),
            _ => "Invalid length".to_string(),
        },
        "range" => {
            let bound = |key: &str| {
                error
                    .params
                    .get(key)
                    .and_then(Value::as_f64)
                    .map(|n| n.to_string())
            };
            match (bound("exclusive_min"), bound("min"), bound("max")) {
                (Some(min), _, _) => format!("Number must be greater than {min}"),
                (None, Some(min), Some(max)) => format!("Number must be between {min} and {max}"),
                (None, Some(min), None) => format!("Number must be greater than or equal to {min}"),
                (None, None, Some(max)) => format!("Number must be less than or equal to {max}"),
                _ => "Number out of range".to_string(),
            }
        }
        code => format!("Invalid value ({code})"),
    }
}

static DATE_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("date-time pattern compiles")
});

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

/// `YYYY-MM-DD HH:MM:SS`. Shape only; the store rejects impossible calendar values.
pub fn date_time(value: &str) -> Result<(), ValidationError> {
    if DATE_TIME_PATTERN.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_date_time"))
}

/// `YYYY-MM-DD`.
pub fn date(value: &str) -> Result<(), ValidationError> {
    if DATE_PATTERN.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_date"))
}

/// tri_state
///
/// Boolean query filters: `"true"` and `"false"` select, anything else (or absence)
/// means "do not filter".
pub fn tri_state(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Comma-separated allow-list query parameter. An empty result means "do not filter".
pub fn allow_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Display name used in toasts: the table's label column, falling back to the uuid.
pub fn label_of(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => row
            .get("uuid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Deserializers for payload fields that arrive either as JSON scalars or as
/// multipart text.
pub mod form {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar<T> {
        Native(T),
        Text(String),
    }

    fn from_text<T: std::str::FromStr>(
        raw: Option<Scalar<T>>,
        what: &str,
    ) -> Result<Option<T>, String> {
        match raw {
            None => Ok(None),
            Some(Scalar::Native(value)) => Ok(Some(value)),
            Some(Scalar::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse()
                    .map(Some)
                    .map_err(|_| format!("expected {what}, got \"{text}\""))
            }
        }
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        let raw = Option::<Scalar<bool>>::deserialize(deserializer)?;
        from_text(raw, "boolean").map_err(D::Error::custom)
    }

    pub fn opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = Option::<Scalar<i64>>::deserialize(deserializer)?;
        from_text(raw, "integer").map_err(D::Error::custom)
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw = Option::<Scalar<f64>>::deserialize(deserializer)?;
        from_text(raw, "number").map_err(D::Error::custom)
    }
}
