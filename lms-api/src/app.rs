/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use lms_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use lms_shared::auth::middleware::authenticate_bearer;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /health                                  public
/// /v1/register                             public
/// /v1/courses, /v1/courses/:id             GET public, POST bearer
/// /v1/courses/:id/contents                 GET public, POST bearer
/// /v1/courses/:id/contents/:content_id     public
/// everything else under /v1                bearer
/// ```
///
/// Public and protected routers are merged, so a path can have a public
/// `GET` and a protected `POST`. The JWT layer runs before any extractor,
/// which makes a missing token a 401 before the body is even parsed.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(routes::register::register))
        .route("/courses", get(routes::courses::list_courses))
        .route("/courses/:id", get(routes::courses::detail_course))
        .route("/courses/:id/contents", get(routes::contents::list_contents))
        .route(
            "/courses/:id/contents/:content_id",
            get(routes::contents::detail_content),
        );

    let protected = Router::new()
        // courses
        .route("/courses", post(routes::courses::create_course))
        .route("/courses/:id", post(routes::courses::update_course))
        .route("/courses/:id/enroll", post(routes::courses::enroll_course))
        .route("/mycourses", get(routes::courses::my_courses))
        .route("/create-course", post(routes::courses::create_course_by_ids))
        .route("/update-course/:id", put(routes::courses::update_course_by_ids))
        // contents
        .route("/courses/:id/contents", post(routes::contents::create_content))
        .route("/update-content/:id", put(routes::contents::update_content))
        .route("/publish-content/:id", put(routes::contents::publish_content))
        .route(
            "/course-content/:course_id",
            get(routes::contents::course_contents_for_role),
        )
        // comments
        .route(
            "/contents/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/comments/:id", delete(routes::comments::delete_comment))
        // feedback
        .route("/feedbacks", post(routes::feedback::create_feedback))
        .route("/show-feedback", get(routes::feedback::show_feedback))
        .route("/edit-feedback/:id", put(routes::feedback::edit_feedback))
        .route("/delete-feedback", delete(routes::feedback::delete_feedback))
        // categories
        .route("/add-category", post(routes::categories::add_category))
        .route("/show-categories", get(routes::categories::show_categories))
        .route(
            "/delete-category/:id",
            delete(routes::categories::delete_category),
        )
        // completion
        .route("/add-completion", post(routes::completion::add_completion))
        .route("/show-completion", get(routes::completion::show_completion))
        .route(
            "/delete-completion",
            delete(routes::completion::delete_completion),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", public.merge(protected))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// No origins or a `*` entry allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Validates the bearer token and injects `AuthContext` into the request
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate_bearer(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_variants() {
        // Construction must not panic for any configuration
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://localhost:3000".to_string(), "not a header\n".to_string()]);
    }
}
