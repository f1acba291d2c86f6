use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct StrategyResponse { pub strategy: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub password: String, pub role: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// Profile and token pair; `accessToken` and `refreshToken` carry the same JWT.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct AuthResultDoc {
    pub _id: Uuid,
    pub email: String,
    pub role: String,
    pub name: String,
    pub accessToken: String,
    pub refreshToken: String,
    pub isActive: bool,
    /// RFC 3339 timestamp
    pub createdAt: String,
    /// RFC 3339 timestamp, null until the first login
    pub lastLoginAt: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::config,
        crate::routes::auth::register,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            StrategyResponse,
            MessageResponse,
            RegisterRequest,
            LoginRequest,
            AuthResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;

/// The document as served: auth paths carry the configured `base_path`.
pub fn api_doc(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if !base_path.is_empty() {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| {
                if path == "/health" {
                    (path, item)
                } else {
                    (format!("{base_path}{path}"), item)
                }
            })
            .collect();
    }
    doc
}
