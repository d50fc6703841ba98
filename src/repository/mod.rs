use async_trait::async_trait;
use rand::{RngCore, rngs::OsRng};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::models::hr::Credentials;

mod mock;
mod postgres;

pub use mock::MockRepository;
pub use postgres::PostgresRepository;

/// Length of every surface identifier (`uuid` column).
pub const UUID_LEN: usize = 21;

const UUID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// generate_uuid
///
/// A 21-character URL-safe identifier drawn from the OS RNG. Always generated on insert;
/// a client-supplied value never reaches the table.
pub fn generate_uuid() -> String {
    let mut bytes = [0u8; UUID_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|byte| UUID_ALPHABET[usize::from(byte & 63)] as char)
        .collect()
}

/// How a column's JSON value is bound into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
    Date,
}

/// A writable column of a table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text }
    }
    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Integer }
    }
    pub const fn decimal(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Decimal }
    }
    pub const fn boolean(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Boolean }
    }
    pub const fn timestamp(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Timestamp }
    }
    pub const fn date(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Date }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

/// Table
///
/// Static description of one persisted resource.
///
/// * `name` is the physical (schema-qualified) table written to.
/// * `select` is the denormalized read: the table joined with whatever it references,
///   timestamps rendered as `YYYY-MM-DD HH24:MI:SS`. List filters and ordering apply to
///   its output columns.
/// * `columns` lists every client-writable column with its bind type. `uuid` and `id` are
///   never client-writable.
/// * `label` names the column used in confirmation messages and value/label lookups.
#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub select: &'static str,
    pub columns: &'static [Column],
    pub label: &'static str,
    pub order_by: Option<OrderBy>,
}

impl Table {
    /// Columns present in `values`, in declaration order.
    pub fn writable<'a>(&self, values: &'a Map<String, Value>) -> Vec<(Column, &'a Value)> {
        self.columns
            .iter()
            .filter_map(|column| values.get(column.name).map(|value| (*column, value)))
            .collect()
    }
}

/// A row condition on an output column of the denormalized select.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Value),
    IsNull(&'static str),
    IsNotNull(&'static str),
    In(&'static str, Vec<String>),
}

/// ListFilter
///
/// Conjunction of conditions built from list query parameters. Builder methods that
/// receive "no filter" inputs (empty allow-lists, `None` flags) add nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub conditions: Vec<Condition>,
}

impl ListFilter {
    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(column, value.into()));
        self
    }

    pub fn eq_opt(self, column: &'static str, value: Option<&String>) -> Self {
        match value {
            Some(value) => self.eq(column, value.clone()),
            None => self,
        }
    }

    pub fn flag(self, column: &'static str, value: Option<bool>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    pub fn is_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::IsNull(column));
        self
    }

    pub fn is_not_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::IsNotNull(column));
        self
    }

    pub fn one_of(mut self, column: &'static str, values: Vec<String>) -> Self {
        if !values.is_empty() {
            self.conditions.push(Condition::In(column, values));
        }
        self
    }
}

/// Repository Trait
///
/// The persistence contract. Rows travel as JSON objects so one generic handler set can
/// serve every resource; each resource deserializes them into its own row type.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across Axum's
/// task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Denormalized rows matching `filter`, in the table's declared order.
    async fn list(&self, table: &'static Table, filter: &ListFilter)
    -> Result<Vec<Value>, sqlx::Error>;

    /// Denormalized row by surface identifier.
    async fn find(&self, table: &'static Table, uuid: &str) -> Result<Option<Value>, sqlx::Error>;

    /// Inserts `values` under a freshly generated `uuid` and returns the stored row.
    async fn insert(
        &self,
        table: &'static Table,
        values: Map<String, Value>,
    ) -> Result<Value, sqlx::Error>;

    /// Writes only the given columns. `None` when no row has that `uuid`.
    async fn update(
        &self,
        table: &'static Table,
        uuid: &str,
        values: Map<String, Value>,
    ) -> Result<Option<Value>, sqlx::Error>;

    /// Hard delete. Returns the removed row so callers can release its file.
    async fn delete(&self, table: &'static Table, uuid: &str)
    -> Result<Option<Value>, sqlx::Error>;

    /// Sign-in lookup, joined with department and designation names.
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, sqlx::Error>;
}

/// RepositoryState
///
/// The shared repository handle carried in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
