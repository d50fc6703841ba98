use axum::{Json, extract::State};

use super::Submission;
use crate::{
    AppState,
    auth::{TokenClaims, compare_password, issue_token},
    error::ApiError,
    models::hr::{SignInRequest, SignInResponse, SignedInUser},
    schema,
};

/// sign_in
///
/// Exchanges e-mail and password for an access token. An unknown e-mail answers exactly
/// like a wrong password. A disabled account is refused before its password is checked.
pub async fn sign_in(
    State(state): State<AppState>,
    submission: Submission,
) -> Result<Json<SignInResponse>, ApiError> {
    let request = schema::validated::<SignInRequest>(&submission.fields)?;
    let email = request.email.unwrap_or_default();
    let pass = request.pass.unwrap_or_default();

    let Some(credentials) = state.repo.find_credentials(&email).await? else {
        tracing::info!("sign-in rejected: unknown account");
        return Err(ApiError::InvalidCredentials);
    };

    if !credentials.status {
        tracing::info!(uuid = %credentials.uuid, "sign-in rejected: account disabled");
        return Err(ApiError::AccountDisabled);
    }

    if !compare_password(&pass, &credentials.pass)? {
        tracing::info!(uuid = %credentials.uuid, "sign-in rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let claims = TokenClaims::new(
        &credentials.uuid,
        &credentials.name,
        &credentials.email,
        credentials.can_access.clone(),
    );
    let token = issue_token(&claims, &state.config.jwt_secret)?;

    tracing::info!(uuid = %credentials.uuid, "signed in");
    Ok(Json(SignInResponse {
        payload: claims,
        token,
        can_access: credentials.can_access,
        user: SignedInUser {
            uuid: credentials.uuid,
            name: credentials.name,
            department_name: credentials.department_name,
            designation_name: credentials.designation_name,
        },
    }))
}
