use axum::{Router, routing::get};

use super::crud;
use crate::{
    AppState,
    handlers::portfolio::{department_details, office_details},
    models::portfolio::{
        ContactUs, Department, DepartmentTeacher, Faculty, Offer, Office, OfficeEntry,
        OnlineAdmission,
    },
};

/// Portfolio Router Module
///
/// Content for the public website. Reads are public except contact-us and online
/// admission; writes require a token, except online admission submissions.
pub fn portfolio_routes() -> Router<AppState> {
    Router::new()
        .merge(crud::<Faculty>())
        .merge(crud::<Department>())
        .merge(crud::<DepartmentTeacher>())
        .merge(crud::<Office>())
        .merge(crud::<OfficeEntry>())
        .merge(crud::<Offer>())
        .merge(crud::<OnlineAdmission>())
        .merge(crud::<ContactUs>())
        // GET /portfolio/department-and-department-teachers/details/by/department-uuid/{uuid}?is_resign=
        .route(
            "/portfolio/department-and-department-teachers/details/by/department-uuid/{uuid}",
            get(department_details),
        )
        // GET /portfolio/office-and-office-entry/details/by-office-uuid/{uuid}
        .route(
            "/portfolio/office-and-office-entry/details/by-office-uuid/{uuid}",
            get(office_details),
        )
}
