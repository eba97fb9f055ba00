use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{UuidPath, ValidatedJson, ValidatedQuery};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SimilarityResult;
use crate::models::{
    CreateUser, FindSimilarParams, ListParams, SimilarUserResponse, SimilarityQuery, UserProfile,
    UserResponse,
};
use crate::repository::UserStore;
use crate::service::SimilarityService;

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, find_similar, get_user),
    components(schemas(
        CreateUser,
        SimilarityQuery,
        UserProfile,
        UserResponse,
        SimilarUserResponse
    )),
    tags((name = "users", description = "User storage and similarity search"))
)]
pub struct SimilarityApiDoc;

/// Create the users router
///
/// Paths are relative; the binary nests this router at `/users`.
pub fn router<R: UserStore + 'static>(service: Arc<SimilarityService<R>>) -> Router {
    Router::new()
        .route("/", get(list_users::<R>).post(create_user::<R>))
        .route("/find-similar", post(find_similar::<R>))
        .route("/{id}", get(get_user::<R>))
        .with_state(service)
}

/// List stored users
#[utoipa::path(
    get,
    path = "/",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "Stored users", body = Vec<UserResponse>),
        (status = 400, description = "Invalid limit", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Vector index unavailable", body = axum_helpers::ErrorResponse)
    )
)]
async fn list_users<R: UserStore>(
    State(service): State<Arc<SimilarityService<R>>>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> SimilarityResult<Json<Vec<UserResponse>>> {
    let users = service.list_users(params).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Embed and store a new user
#[utoipa::path(
    post,
    path = "/",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid attributes", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Embedding or index failure", body = axum_helpers::ErrorResponse),
        (status = 503, description = "Embedding service unavailable", body = axum_helpers::ErrorResponse)
    )
)]
async fn create_user<R: UserStore>(
    State(service): State<Arc<SimilarityService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> SimilarityResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Find the stored users most similar to the given attributes
#[utoipa::path(
    post,
    path = "/find-similar",
    tag = "users",
    params(FindSimilarParams),
    request_body = SimilarityQuery,
    responses(
        (status = 200, description = "Most similar users first", body = Vec<SimilarUserResponse>),
        (status = 400, description = "Empty query or invalid limit", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Embedding or index failure", body = axum_helpers::ErrorResponse),
        (status = 503, description = "Embedding service unavailable", body = axum_helpers::ErrorResponse)
    )
)]
async fn find_similar<R: UserStore>(
    State(service): State<Arc<SimilarityService<R>>>,
    ValidatedQuery(params): ValidatedQuery<FindSimilarParams>,
    ValidatedJson(query): ValidatedJson<SimilarityQuery>,
) -> SimilarityResult<Json<Vec<SimilarUserResponse>>> {
    let results = service.find_similar(query, params).await?;
    Ok(Json(
        results.into_iter().map(SimilarUserResponse::from).collect(),
    ))
}

/// Get a stored user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed ID", body = axum_helpers::ErrorResponse),
        (status = 404, description = "User not found", body = axum_helpers::ErrorResponse)
    )
)]
async fn get_user<R: UserStore>(
    State(service): State<Arc<SimilarityService<R>>>,
    UuidPath(id): UuidPath,
) -> SimilarityResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}
