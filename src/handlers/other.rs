use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::{error::ApiError, repository::RepositoryState, schema::ValueLabel};

fn option<R: ValueLabel>(row: &Value) -> Value {
    let column = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);

    let mut option = Map::new();
    option.insert("value".to_string(), column("uuid"));
    option.insert("label".to_string(), column(R::TABLE.label));
    for &extra in R::EXTRA {
        option.insert(extra.to_string(), column(extra));
    }
    Value::Object(option)
}

/// value_labels
///
/// Dropdown options for `R`: `[{value: uuid, label, ...extra columns}]`. Takes the same
/// query filters as the resource's list.
pub async fn value_labels<R: ValueLabel>(
    State(repo): State<RepositoryState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let rows = repo.list(R::TABLE, &R::list_filter(&query)).await?;
    Ok(Json(rows.iter().map(option::<R>).collect()))
}
