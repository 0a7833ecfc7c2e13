use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::users::{AddressInput, UpdateProfileRequest, VendorProfileRequest},
    error::AppResult,
    extract::{Json, Path},
    middleware::auth::AuthUser,
    models::User,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/addresses", post(add_address))
        .route("/me/addresses/{address_id}", delete(remove_address))
        .route("/me/vendor-profile", put(upsert_vendor_profile))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(user_service::get_me(&state, &user).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(user_service::update_me(&state, &user, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/me/addresses",
    request_body = AddressInput,
    responses(
        (status = 201, description = "Address added", body = User),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn add_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddressInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let updated = user_service::add_address(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/addresses/{address_id}",
    params(("address_id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address removed", body = User),
        (status = 404, description = "Address not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn remove_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(address_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(
        user_service::remove_address(&state, &user, address_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/me/vendor-profile",
    request_body = VendorProfileRequest,
    responses(
        (status = 200, description = "Vendor profile saved", body = User),
        (status = 403, description = "Caller is not a vendor")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn upsert_vendor_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<VendorProfileRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(
        user_service::upsert_vendor_profile(&state, &user, payload).await?,
    ))
}
