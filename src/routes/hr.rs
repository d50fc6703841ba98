use axum::Router;

use super::{crud, value_label};
use crate::{
    AppState,
    models::hr::{Department, Designation, User},
};

/// HR Router Module
///
/// `/hr/designation`, `/hr/department`, `/hr/users` and the designation and user
/// dropdown lookups.
pub fn hr_routes() -> Router<AppState> {
    Router::new()
        .merge(crud::<Designation>())
        .merge(crud::<Department>())
        .merge(crud::<User>())
        .merge(value_label::<Designation>())
        .merge(value_label::<User>())
}
