//! Axum router construction.
//!
//! Builds the application router with the API route groups, stored media
//! serving, OpenAPI docs, and middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::request_id::{request_id_middleware, request_span};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::frames::list_frames,
        routes::frames::create_frames,
        routes::frames::get_frame,
        routes::frames::update_frame,
        routes::frames::delete_frame,
        routes::frames::batch_delete,
        routes::accounts::list_accounts,
        routes::accounts::create_account,
        routes::accounts::get_account,
        routes::accounts::update_account,
        routes::accounts::delete_account,
    ),
    components(schemas(
        routes::frames::FrameResponse,
        routes::frames::FrameUploadForm,
        routes::frames::UpdateFrameRequest,
        routes::frames::BatchDeleteRequest,
        routes::frames::MessageResponse,
        routes::accounts::AccountResponse,
        routes::accounts::CreateAccountRequest,
        routes::accounts::UpdateAccountRequest,
    ))
)]
struct ApiDoc;

/// Register `path` both with and without a trailing slash.
fn route_with_slash(
    router: Router<AppContext>,
    path: &str,
    method_router: MethodRouter<AppContext>,
) -> Router<AppContext> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new();
    // Frames
    api = route_with_slash(
        api,
        "/core/frames",
        get(routes::frames::list_frames).post(routes::frames::create_frames),
    );
    api = route_with_slash(
        api,
        "/core/frames/batch-delete",
        post(routes::frames::batch_delete),
    );
    api = route_with_slash(
        api,
        "/core/frames/{id}",
        get(routes::frames::get_frame)
            .put(routes::frames::update_frame)
            .patch(routes::frames::update_frame)
            .delete(routes::frames::delete_frame),
    );
    // Accounts
    api = route_with_slash(
        api,
        "/accounts/users",
        get(routes::accounts::list_accounts).post(routes::accounts::create_account),
    );
    api = route_with_slash(
        api,
        "/accounts/users/{id}",
        get(routes::accounts::get_account)
            .put(routes::accounts::update_account)
            .patch(routes::accounts::update_account)
            .delete(routes::accounts::delete_account),
    );

    let media_root = ctx.config.media.root.clone();
    let body_limit = ctx.config.media.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .nest_service("/media", ServeDir::new(media_root))
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(ctx)
}
