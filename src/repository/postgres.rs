use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};

use super::{Column, ColumnKind, Condition, Direction, ListFilter, Repository, Table, generate_uuid};
use crate::models::hr::Credentials;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait backed by a PostgreSQL pool.
/// Every statement is assembled with `QueryBuilder`: identifiers come from the static
/// `Table` descriptors, all values are bound parameters.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn encode_error(column: &Column, value: &Value) -> sqlx::Error {
    sqlx::Error::Encode(format!("column {} cannot hold {value}", column.name).into())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn as_integer(column: &Column, value: &Value) -> Result<Option<i64>, sqlx::Error> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_i64().map(Some).ok_or_else(|| encode_error(column, value)),
        Value::String(text) => text.trim().parse().map(Some).map_err(|_| encode_error(column, value)),
        _ => Err(encode_error(column, value)),
    }
}

fn as_decimal(column: &Column, value: &Value) -> Result<Option<f64>, sqlx::Error> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_f64().map(Some).ok_or_else(|| encode_error(column, value)),
        Value::String(text) => text.trim().parse().map(Some).map_err(|_| encode_error(column, value)),
        _ => Err(encode_error(column, value)),
    }
}

fn as_boolean(column: &Column, value: &Value) -> Result<Option<bool>, sqlx::Error> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(*flag)),
        Value::String(text) => text.trim().parse().map(Some).map_err(|_| encode_error(column, value)),
        _ => Err(encode_error(column, value)),
    }
}

/// Binds one value with the cast its column declares.
fn push_value(
    builder: &mut QueryBuilder<'static, Postgres>,
    column: &Column,
    value: &Value,
) -> Result<(), sqlx::Error> {
    match column.kind {
        ColumnKind::Text => {
            builder.push_bind(as_text(value));
        }
        ColumnKind::Timestamp => {
            builder.push_bind(as_text(value)).push("::timestamp");
        }
        ColumnKind::Date => {
            builder.push_bind(as_text(value)).push("::date");
        }
        ColumnKind::Integer => {
            builder.push_bind(as_integer(column, value)?).push("::integer");
        }
        ColumnKind::Decimal => {
            builder.push_bind(as_decimal(column, value)?).push("::numeric");
        }
        ColumnKind::Boolean => {
            builder.push_bind(as_boolean(column, value)?);
        }
    }
    Ok(())
}

/// Appends `= $n` (or `IS NULL`) comparing an output column with a JSON value.
fn push_comparison(builder: &mut QueryBuilder<'static, Postgres>, value: &Value) {
    match value {
        Value::Null => {
            builder.push(" IS NULL");
        }
        Value::Bool(flag) => {
            builder.push(" = ").push_bind(*flag);
        }
        Value::Number(number) => match number.as_i64() {
            Some(integer) => {
                builder.push(" = ").push_bind(integer);
            }
            None => {
                builder.push(" = ").push_bind(number.as_f64().unwrap_or_default());
            }
        },
        Value::String(text) => {
            builder.push(" = ").push_bind(text.clone());
        }
        other => {
            builder.push(" = ").push_bind(other.to_string());
        }
    }
}

pub(crate) fn select_query(table: &Table, filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT to_jsonb(r) FROM (");
    builder.push(table.select).push(") AS r WHERE TRUE");

    for condition in &filter.conditions {
        match condition {
            Condition::Eq(column, value) => {
                builder.push(format!(" AND r.\"{column}\""));
                push_comparison(&mut builder, value);
            }
            Condition::IsNull(column) => {
                builder.push(format!(" AND r.\"{column}\" IS NULL"));
            }
            Condition::IsNotNull(column) => {
                builder.push(format!(" AND r.\"{column}\" IS NOT NULL"));
            }
            Condition::In(column, values) => {
                builder
                    .push(format!(" AND r.\"{column}\" = ANY("))
                    .push_bind(values.clone())
                    .push(")");
            }
        }
    }

    if let Some(order) = &table.order_by {
        let direction = match order.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        builder.push(format!(" ORDER BY r.\"{}\" {direction}", order.column));
    }

    builder
}

pub(crate) fn insert_query(
    table: &Table,
    uuid: String,
    values: &Map<String, Value>,
) -> Result<QueryBuilder<'static, Postgres>, sqlx::Error> {
    let columns = table.writable(values);

    let mut builder = QueryBuilder::new(format!("INSERT INTO {} AS t (\"uuid\"", table.name));
    for (column, _) in &columns {
        builder.push(format!(", \"{}\"", column.name));
    }
    builder.push(") VALUES (").push_bind(uuid);
    for (column, value) in &columns {
        builder.push(", ");
        push_value(&mut builder, column, value)?;
    }
    builder.push(") RETURNING to_jsonb(t)");

    Ok(builder)
}

pub(crate) fn update_query(
    table: &Table,
    uuid: &str,
    values: &Map<String, Value>,
) -> Result<QueryBuilder<'static, Postgres>, sqlx::Error> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} AS t SET ", table.name));
    for (index, (column, value)) in table.writable(values).iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(format!("\"{}\" = ", column.name));
        push_value(&mut builder, column, value)?;
    }
    builder
        .push(" WHERE t.\"uuid\" = ")
        .push_bind(uuid.to_string())
        .push(" RETURNING to_jsonb(t)");

    Ok(builder)
}

pub(crate) fn delete_query(table: &Table, uuid: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {} AS t WHERE t.\"uuid\" = ", table.name));
    builder.push_bind(uuid.to_string()).push(" RETURNING to_jsonb(t)");
    builder
}

const CREDENTIALS_QUERY: &str = r#"
    SELECT
        users.uuid,
        users.name,
        users.email,
        users.pass,
        COALESCE(users.status, false) AS status,
        users.can_access,
        department.name AS department_name,
        designation.name AS designation_name
    FROM hr.users
    LEFT JOIN hr.department ON users.department_uuid = department.uuid
    LEFT JOIN hr.designation ON users.designation_uuid = designation.uuid
    WHERE users.email = $1
"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn list(
        &self,
        table: &'static Table,
        filter: &ListFilter,
    ) -> Result<Vec<Value>, sqlx::Error> {
        let mut builder = select_query(table, filter);
        builder.build_query_scalar::<Value>().fetch_all(&self.pool).await
    }

    async fn find(&self, table: &'static Table, uuid: &str) -> Result<Option<Value>, sqlx::Error> {
        let filter = ListFilter::default().eq("uuid", uuid);
        let mut builder = select_query(table, &filter);
        builder.build_query_scalar::<Value>().fetch_optional(&self.pool).await
    }

    async fn insert(
        &self,
        table: &'static Table,
        values: Map<String, Value>,
    ) -> Result<Value, sqlx::Error> {
        let mut builder = insert_query(table, generate_uuid(), &values)?;
        builder.build_query_scalar::<Value>().fetch_one(&self.pool).await
    }

    async fn update(
        &self,
        table: &'static Table,
        uuid: &str,
        values: Map<String, Value>,
    ) -> Result<Option<Value>, sqlx::Error> {
        if table.writable(&values).is_empty() {
            return self.find(table, uuid).await;
        }
        let mut builder = update_query(table, uuid, &values)?;
        builder.build_query_scalar::<Value>().fetch_optional(&self.pool).await
    }

    async fn delete(
        &self,
        table: &'static Table,
        uuid: &str,
    ) -> Result<Option<Value>, sqlx::Error> {
        let mut builder = delete_query(table, uuid);
        builder.build_query_scalar::<Value>().fetch_optional(&self.pool).await
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, sqlx::Error> {
        sqlx::query_as::<_, Credentials>(CREDENTIALS_QUERY)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }
}
