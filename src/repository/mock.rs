use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicI64, AtomicUsize, Ordering as AtomicOrdering},
    },
};

use super::{Condition, Direction, ListFilter, Repository, Table, generate_uuid};
use crate::models::hr::{Credentials, USERS_TABLE};

/// MockRepository
///
/// In-memory `Repository` for handler tests. Rows are stored exactly as written (no joins),
/// filters and ordering are evaluated the way the SQL implementation evaluates them, and
/// every write is counted so tests can assert that a rejected request never reached
/// persistence.
#[derive(Default)]
pub struct MockRepository {
    tables: Mutex<HashMap<&'static str, Vec<Map<String, Value>>>>,
    next_id: AtomicI64,
    writes: AtomicUsize,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a row verbatim (joined columns included). Not counted as a write.
    pub fn seed(&self, table: &'static Table, row: Value) {
        if let Value::Object(row) = row {
            self.lock().entry(table.name).or_default().push(row);
        }
    }

    pub fn rows(&self, table: &'static Table) -> Vec<Map<String, Value>> {
        self.lock().get(table.name).cloned().unwrap_or_default()
    }

    /// Inserts, updates and deletes that changed a row. Misses on unknown uuids are not counted.
    pub fn write_count(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, Vec<Map<String, Value>>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_null(row: &Map<String, Value>, column: &str) -> bool {
    row.get(column).is_none_or(Value::is_null)
}

fn matches(row: &Map<String, Value>, condition: &Condition) -> bool {
    match condition {
        Condition::Eq(column, Value::Null) => is_null(row, column),
        Condition::Eq(column, value) => row.get(*column) == Some(value),
        Condition::IsNull(column) => is_null(row, column),
        Condition::IsNotNull(column) => !is_null(row, column),
        Condition::In(column, values) => row
            .get(*column)
            .and_then(Value::as_str)
            .is_some_and(|text| values.iter().any(|v| v == text)),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list(
        &self,
        table: &'static Table,
        filter: &ListFilter,
    ) -> Result<Vec<Value>, sqlx::Error> {
        let mut rows: Vec<_> = self
            .rows(table)
            .into_iter()
            .filter(|row| filter.conditions.iter().all(|c| matches(row, c)))
            .collect();

        if let Some(order) = &table.order_by {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(order.column), b.get(order.column));
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn find(&self, table: &'static Table, uuid: &str) -> Result<Option<Value>, sqlx::Error> {
        Ok(self
            .rows(table)
            .into_iter()
            .find(|row| row.get("uuid").and_then(Value::as_str) == Some(uuid))
            .map(Value::Object))
    }

    async fn insert(
        &self,
        table: &'static Table,
        values: Map<String, Value>,
    ) -> Result<Value, sqlx::Error> {
        let mut row = Map::new();
        row.insert(
            "id".to_string(),
            Value::from(self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1),
        );
        row.insert("uuid".to_string(), Value::String(generate_uuid()));
        for (column, value) in table.writable(&values) {
            row.insert(column.name.to_string(), value.clone());
        }

        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        self.lock().entry(table.name).or_default().push(row.clone());
        Ok(Value::Object(row))
    }

    async fn update(
        &self,
        table: &'static Table,
        uuid: &str,
        values: Map<String, Value>,
    ) -> Result<Option<Value>, sqlx::Error> {
        let mut tables = self.lock();
        let Some(row) = tables
            .get_mut(table.name)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("uuid").and_then(Value::as_str) == Some(uuid))
            })
        else {
            return Ok(None);
        };

        for (column, value) in table.writable(&values) {
            row.insert(column.name.to_string(), value.clone());
        }
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Some(Value::Object(row.clone())))
    }

    async fn delete(
        &self,
        table: &'static Table,
        uuid: &str,
    ) -> Result<Option<Value>, sqlx::Error> {
        let mut tables = self.lock();
        let Some(rows) = tables.get_mut(table.name) else {
            return Ok(None);
        };
        let Some(position) = rows
            .iter()
            .position(|row| row.get("uuid").and_then(Value::as_str) == Some(uuid))
        else {
            return Ok(None);
        };

        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Some(Value::Object(rows.remove(position))))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, sqlx::Error> {
        let row = self
            .rows(&USERS_TABLE)
            .into_iter()
            .find(|row| row.get("email").and_then(Value::as_str) == Some(email));

        match row {
            Some(row) => serde_json::from_value(Value::Object(row))
                .map(Some)
                .map_err(|e| sqlx::Error::Decode(e.into())),
            None => Ok(None),
        }
    }
}
