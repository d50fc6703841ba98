/// Router Module Index
///
/// One module per schema (HR, portfolio, procurement), plus the value/label lookups and
/// the routes that live outside the resource tree. Everything here is mounted under `/v1`
/// by `create_router`; access control is applied there, not per module.
use axum::{Router, routing::get};

use crate::{
    AppState,
    handlers::{self, other::value_labels},
    schema::{Resource, ValueLabel},
};

/// Health and sign-in.
pub mod public;

pub mod hr;
pub mod portfolio;
pub mod procure;

/// crud
///
/// The five generic endpoints for one resource:
/// `GET|POST {PATH}` and `GET|PATCH|DELETE {PATH}/{uuid}`.
pub fn crud<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(R::PATH, get(handlers::list::<R>).post(handlers::create::<R>))
        .route(
            &format!("{}/{{uuid}}", R::PATH),
            get(handlers::get_one::<R>)
                .patch(handlers::patch::<R>)
                .delete(handlers::remove::<R>),
        )
}

/// `GET /other{PATH}/value/label` for one resource.
pub fn value_label<R: ValueLabel>() -> Router<AppState> {
    Router::new().route(
        &format!("/other{}/value/label", R::PATH),
        get(value_labels::<R>),
    )
}

/// Every `/v1` route.
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .merge(public::signin_routes())
        .merge(hr::hr_routes())
        .merge(portfolio::portfolio_routes())
        .merge(procure::procure_routes())
}
