//! Request handlers. `mod.rs` holds the generic CRUD set every resource is served by;
//! the submodules hold the few endpoints that are not plain CRUD.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::{
    AppState,
    error::ApiError,
    repository::UUID_LEN,
    schema::{self, Operation, Resource, ResponseStyle, Toast, label_of},
    storage::UploadedFile,
};

pub mod auth;
pub mod other;
pub mod portfolio;

/// Submission
///
/// A create/patch body, accepted either as a JSON object or as `multipart/form-data`.
/// Multipart text parts become string fields; the first non-empty file part is kept
/// aside for the storage layer.
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

fn malformed(message: String) -> ApiError {
    ApiError::invalid("invalid_body", &[], message)
}

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            return match body {
                Value::Object(fields) => Ok(Self { fields, file: None }),
                _ => Err(ApiError::invalid(
                    "invalid_type",
                    &[],
                    "Expected object",
                )),
            };
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| malformed(e.body_text()))?;

        let mut submission = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| malformed(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| malformed(e.body_text()))?;
                    // Browsers send an empty part when no file was chosen.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    if submission.file.is_none() {
                        submission.file = Some(UploadedFile {
                            field: name,
                            file_name,
                            bytes,
                        });
                    }
                }
                None => {
                    let text = field.text().await.map_err(|e| malformed(e.body_text()))?;
                    submission.fields.insert(name, Value::String(text));
                }
            }
        }

        Ok(submission)
    }
}

/// Path identifiers are validated like payload identifiers.
pub(crate) fn check_uuid(uuid: &str) -> Result<(), ApiError> {
    if uuid.chars().count() == UUID_LEN {
        return Ok(());
    }
    Err(ApiError::invalid(
        "length",
        &["uuid"],
        format!("String must contain exactly {UUID_LEN} character(s)"),
    ))
}

pub(crate) fn decode<R: Resource>(row: Value) -> Result<R, ApiError> {
    serde_json::from_value(row)
        .map_err(|e| ApiError::Internal(format!("{} row does not match its schema: {e}", R::NAME)))
}

fn stored_uuid(row: &Value) -> Result<&str, ApiError> {
    row.get("uuid")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Internal("stored row has no uuid".to_string()))
}

/// The uploaded file, if this resource takes one and it arrived under the right field.
fn upload_for<R: Resource>(file: Option<UploadedFile>) -> Option<UploadedFile> {
    let upload = R::UPLOAD?;
    file.filter(|file| file.field == upload.column)
}

/// Path currently referenced by the row's file column.
fn file_path<R: Resource>(row: &Value) -> Option<String> {
    let upload = R::UPLOAD?;
    row.get(upload.column)
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Best-effort removal: the row is already consistent, so a missing file is only logged.
async fn discard(state: &AppState, path: &str) {
    if let Err(e) = state.storage.delete(path).await {
        tracing::warn!(path, error = %e, "could not remove uploaded file");
    }
}

async fn respond<R: Resource>(
    state: &AppState,
    operation: Operation,
    stored: &Value,
) -> Result<Response, ApiError> {
    match R::RESPONSE {
        ResponseStyle::Toast => {
            let toast = Toast::new(operation, &label_of(stored, R::TABLE.label));
            Ok(Json(toast).into_response())
        }
        ResponseStyle::Row => {
            let row = state
                .repo
                .find(R::TABLE, stored_uuid(stored)?)
                .await?
                .ok_or(ApiError::NotFound)?;
            Ok(Json(decode::<R>(row)?).into_response())
        }
    }
}

/// list
///
/// All rows of `R`, narrowed by the resource's query filters.
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<R>>, ApiError> {
    let filter = R::list_filter(&query);
    let rows = state.repo.list(R::TABLE, &filter).await?;
    let rows = rows
        .into_iter()
        .map(decode::<R>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(rows))
}

/// create
///
/// Validate, store the upload (if any), insert. A file written for an insert that then
/// fails is removed again.
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    submission: Submission,
) -> Result<Response, ApiError> {
    let Submission { mut fields, file } = submission;
    for (key, value) in R::defaults() {
        fields.entry(key).or_insert(value);
    }

    let mut values = schema::validate_insert::<R>(&fields)?;
    R::prepare(&mut values)?;

    let mut stored_file = None;
    if let (Some(upload), Some(file)) = (R::UPLOAD, upload_for::<R>(file)) {
        let path = state.storage.store(&file, upload.folder).await?;
        values.insert(upload.column.to_string(), Value::String(path.clone()));
        stored_file = Some(path);
    }

    let inserted = match state.repo.insert(R::TABLE, values).await {
        Ok(row) => row,
        Err(e) => {
            if let Some(path) = &stored_file {
                discard(&state, path).await;
            }
            return Err(e.into());
        }
    };

    let uuid = stored_uuid(&inserted)?;
    tracing::info!(resource = R::NAME, uuid, "created");
    respond::<R>(&state, Operation::Create, &inserted).await
}

/// get_one
pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<R>, ApiError> {
    check_uuid(&uuid)?;
    let row = state
        .repo
        .find(R::TABLE, &uuid)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(decode::<R>(row)?))
}

/// patch
///
/// Partial update. With a replacement file the order is: read the current row, write the
/// new file, update the row, and only then remove the old file. A failed or missed update
/// removes the new file instead, so the row never points at a deleted file.
pub async fn patch<R: Resource>(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    submission: Submission,
) -> Result<Response, ApiError> {
    check_uuid(&uuid)?;
    let Submission { fields, file } = submission;
    let file = upload_for::<R>(file);

    let mut values = match schema::validate_patch::<R>(&fields) {
        Err(ApiError::NoUpdates) if file.is_some() => Map::new(),
        other => other?,
    };
    R::prepare(&mut values)?;

    let mut replaced: Option<(String, Option<String>)> = None;
    if let (Some(upload), Some(file)) = (R::UPLOAD, file.as_ref()) {
        let current = state
            .repo
            .find(R::TABLE, &uuid)
            .await?
            .ok_or(ApiError::NotFound)?;
        let path = state.storage.store(file, upload.folder).await?;
        values.insert(upload.column.to_string(), Value::String(path.clone()));
        replaced = Some((path, file_path::<R>(&current)));
    }

    let updated = match state.repo.update(R::TABLE, &uuid, values).await {
        Ok(Some(row)) => row,
        outcome => {
            if let Some((new_path, _)) = &replaced {
                discard(&state, new_path).await;
            }
            return Err(match outcome {
                Err(e) => e.into(),
                _ => ApiError::NotFound,
            });
        }
    };

    if let Some((_, Some(old_path))) = &replaced {
        discard(&state, old_path).await;
    }

    tracing::info!(resource = R::NAME, uuid = %uuid, "updated");
    respond::<R>(&state, Operation::Update, &updated).await
}

/// remove
///
/// Hard delete, then release the row's file.
pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Response, ApiError> {
    check_uuid(&uuid)?;
    let removed = state
        .repo
        .delete(R::TABLE, &uuid)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(path) = file_path::<R>(&removed) {
        discard(&state, &path).await;
    }

    tracing::info!(resource = R::NAME, uuid = %uuid, "deleted");
    match R::RESPONSE {
        ResponseStyle::Toast => {
            let toast = Toast::new(Operation::Delete, &label_of(&removed, R::TABLE.label));
            Ok(Json(toast).into_response())
        }
        ResponseStyle::Row => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
