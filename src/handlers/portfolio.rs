use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::HashMap;

use super::{check_uuid, decode};
use crate::{
    error::ApiError,
    models::portfolio::{
        DEPARTMENT_TABLE, DEPARTMENT_TEACHERS_TABLE, Department, DepartmentDetails,
        DepartmentTeacher, OFFICE_ENTRY_TABLE, OFFICE_TABLE, Office, OfficeDetails, OfficeEntry,
        resign_filter,
    },
    repository::{ListFilter, RepositoryState},
};

/// department_details
///
/// One department with its teachers, for the public department page. `is_resign` narrows
/// the teachers the same way it does on the teacher list.
pub async fn department_details(
    State(repo): State<RepositoryState>,
    Path(uuid): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DepartmentDetails>, ApiError> {
    check_uuid(&uuid)?;
    let department = repo
        .find(&DEPARTMENT_TABLE, &uuid)
        .await?
        .ok_or(ApiError::NotFound)?;
    let department = decode::<Department>(department)?;

    let filter = resign_filter(
        ListFilter::default().eq("department_uuid", uuid.as_str()),
        query.get("is_resign").map(String::as_str),
    );
    let department_teachers = repo
        .list(&DEPARTMENT_TEACHERS_TABLE, &filter)
        .await?
        .into_iter()
        .map(decode::<DepartmentTeacher>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DepartmentDetails {
        department,
        department_teachers,
    }))
}

/// office_details
pub async fn office_details(
    State(repo): State<RepositoryState>,
    Path(uuid): Path<String>,
) -> Result<Json<OfficeDetails>, ApiError> {
    check_uuid(&uuid)?;
    let office = repo
        .find(&OFFICE_TABLE, &uuid)
        .await?
        .ok_or(ApiError::NotFound)?;
    let office = decode::<Office>(office)?;

    let filter = ListFilter::default().eq("office_uuid", uuid.as_str());
    let office_entries = repo
        .list(&OFFICE_ENTRY_TABLE, &filter)
        .await?
        .into_iter()
        .map(decode::<OfficeEntry>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(OfficeDetails {
        office,
        office_entries,
    }))
}
