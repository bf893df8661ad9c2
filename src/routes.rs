use std::sync::Arc;

use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Json,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    auth::{REFRESH_COOKIE, bearer_payload},
    error::AppError,
    graphql::AppSchema,
    state::AppState,
};

pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(payload) = bearer_payload(&state.auth, &headers) {
        request = request.data(payload);
    }

    schema.execute(request).await.into()
}

pub async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new(
        "/api/graphql",
    )))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    access_token: String,
}

/// Exchanges the refresh cookie for a fresh access token.
///
/// 401 without a cookie; 403 on a bad signature, an unknown user, or a
/// token version older than the stored one (rotated away by a login or
/// an admin revoke).
pub async fn refresh_token_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let cookie = jar.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;

    let claims = state
        .auth
        .verify_refresh_token(cookie.value())
        .map_err(|_| AppError::Forbidden)?;

    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| AppError::Forbidden)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Forbidden)?;

    if user.refresh_token_version != claims.token_version {
        return Err(AppError::Forbidden);
    }

    let access_token = state.auth.sign_access_token(user_id, user.is_admin)?;

    Ok(Json(AccessTokenResponse { access_token }))
}

pub async fn client_id_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "clientId": state.config.paypal_client_id }))
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    amount: f64,
}

pub async fn stripe_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !payload.amount.is_finite() || payload.amount < 1.0 {
        return Err(AppError::MalformedPayload);
    }

    let intent = state
        .payments
        .create_payment_intent(payload.amount.floor() as i64)
        .await?;

    Ok(Json(json!({ "clientSecret": intent.client_secret })))
}
