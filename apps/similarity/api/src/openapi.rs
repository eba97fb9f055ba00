use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "User Similarity API",
        version = "0.1.0",
        description = "Stores users as text embeddings and finds the most similar users"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/users", api = domain_similarity::SimilarityApiDoc)
    )
)]
pub struct ApiDoc;
