//! HR: designations, departments and user accounts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use validator::Validate;

use crate::{
    auth::{TokenClaims, hash_password},
    error::ApiError,
    repository::{Column, Table},
    schema::{Resource, ResponseStyle, Upload, ValueLabel, date_time, form},
};

// --- Designation ---

pub static DESIGNATION_TABLE: Table = Table {
    name: "hr.designation",
    select: r#"
        SELECT
            designation.id,
            designation.uuid,
            designation.name,
            to_char(designation.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(designation.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            designation.remarks
        FROM hr.designation
    "#,
    columns: &[
        Column::text("name"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Designation {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DesignationPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Designation {
    type Payload = DesignationPayload;
    const NAME: &'static str = "designation";
    const PATH: &'static str = "/hr/designation";
    const TABLE: &'static Table = &DESIGNATION_TABLE;
    const RESPONSE: ResponseStyle = ResponseStyle::Row;
}

impl ValueLabel for Designation {}

// --- Department ---

pub static DEPARTMENT_TABLE: Table = Table {
    name: "hr.department",
    select: r#"
        SELECT
            department.id,
            department.uuid,
            department.name,
            to_char(department.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(department.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            department.remarks
        FROM hr.department
    "#,
    columns: &[
        Column::text("name"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Department {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DepartmentPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Department {
    type Payload = DepartmentPayload;
    const NAME: &'static str = "department";
    const PATH: &'static str = "/hr/department";
    const TABLE: &'static Table = &DEPARTMENT_TABLE;
}

// --- Users ---

pub static USERS_TABLE: Table = Table {
    name: "hr.users",
    select: r#"
        SELECT
            users.id,
            users.uuid,
            users.name,
            users.email,
            users.department_uuid,
            department.name AS department_name,
            users.designation_uuid,
            designation.name AS designation_name,
            users.office,
            users.phone,
            users.image,
            users.status,
            users.can_access,
            to_char(users.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(users.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            users.remarks
        FROM hr.users
        LEFT JOIN hr.department ON users.department_uuid = department.uuid
        LEFT JOIN hr.designation ON users.designation_uuid = designation.uuid
    "#,
    columns: &[
        Column::text("name"),
        Column::text("email"),
        Column::text("pass"),
        Column::text("department_uuid"),
        Column::text("designation_uuid"),
        Column::text("office"),
        Column::text("phone"),
        Column::text("image"),
        Column::boolean("status"),
        Column::text("can_access"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

/// User
///
/// Account as seen by the admin panel. The password hash never leaves the repository;
/// only `Credentials` carries it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub department_uuid: Option<String>,
    pub department_name: Option<String>,
    pub designation_uuid: Option<String>,
    pub designation_name: Option<String>,
    pub office: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub status: Option<bool>,
    pub can_access: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 4))]
    pub pass: Option<String>,
    #[validate(required, length(equal = 21))]
    pub department_uuid: Option<String>,
    #[validate(required, length(equal = 21))]
    pub designation_uuid: Option<String>,
    pub office: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub status: Option<bool>,
    pub can_access: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for User {
    type Payload = UserPayload;
    const NAME: &'static str = "users";
    const PATH: &'static str = "/hr/users";
    const TABLE: &'static Table = &USERS_TABLE;
    const UPLOAD: Option<Upload> = Some(Upload {
        column: "image",
        folder: "public/users",
    });

    /// Plain-text passwords are replaced by their argon2 hash on create and on patch.
    fn prepare(values: &mut Map<String, Value>) -> Result<(), ApiError> {
        if let Some(Value::String(plain)) = values.get("pass") {
            let hashed = hash_password(plain)?;
            values.insert("pass".to_string(), Value::String(hashed));
        }
        Ok(())
    }
}

impl ValueLabel for User {}

/// Credentials
///
/// Sign-in lookup result: the stored hash plus what the token and the response need.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct Credentials {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub pass: String,
    #[serde(default)]
    pub status: bool,
    pub can_access: Option<String>,
    pub department_name: Option<String>,
    pub designation_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub pass: Option<String>,
}

/// Identity summary returned next to the token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignedInUser {
    pub uuid: String,
    pub name: String,
    pub department_name: Option<String>,
    pub designation_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub payload: TokenClaims,
    pub token: String,
    pub can_access: Option<String>,
    pub user: SignedInUser,
}
