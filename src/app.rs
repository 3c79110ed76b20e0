use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_role_middleware, validate_user_middleware, RoleGuard};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state
        .config
        .api
        .max_request_size_bytes
        .max(state.config.uploads.max_bytes);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(public::login))
        .route("/auth/register", post(public::register))
        // Any authenticated role
        .merge(authenticated(session_routes(), None, &state))
        // Role-scoped groups
        .nest("/api/student", authenticated(student_routes(), Some(RoleGuard::STUDENT), &state))
        .nest("/api/faculty", authenticated(faculty_routes(), Some(RoleGuard::FACULTY), &state))
        .nest(
            "/api/principal",
            authenticated(principal_routes(), Some(RoleGuard::PRINCIPAL), &state),
        )
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(build_cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap `router` so every route runs jwt_auth → require_role → validate_user.
/// `route_layer` applies inside-out, so the innermost layer is added first.
fn authenticated(router: Router<AppState>, guard: Option<RoleGuard>, state: &AppState) -> Router<AppState> {
    let router = router.route_layer(middleware::from_fn_with_state(state.clone(), validate_user_middleware));
    let router = match guard {
        Some(guard) => router.route_layer(middleware::from_fn_with_state(guard, require_role_middleware)),
        None => router,
    };
    router.route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn session_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/session/refresh", put(auth::refresh))
}

fn student_routes() -> Router<AppState> {
    use protected::student;

    Router::new()
        .route("/profile", get(student::profile_get).put(student::profile_put))
        .route(
            "/internships",
            get(student::internships_get).post(student::internships_post),
        )
        .route(
            "/internships/:id",
            get(student::internship_get).patch(student::internship_patch),
        )
        .route(
            "/internships/:id/documents",
            get(student::documents_get).post(student::documents_post),
        )
}

fn faculty_routes() -> Router<AppState> {
    use protected::faculty;

    Router::new()
        .route("/profile", get(faculty::profile_get))
        .route("/dashboard", get(faculty::dashboard_get))
        .route("/students", get(faculty::students_get))
        .route("/students/:id", get(faculty::student_get))
        .route("/internships", get(faculty::internships_get))
        .route("/internships/:id", get(faculty::internship_get))
        .route("/internships/:id/review", post(faculty::review_post))
        .route("/internships/:id/phase", patch(faculty::phase_patch))
        .route("/internships/:id/documents", get(faculty::documents_get))
}

fn principal_routes() -> Router<AppState> {
    use elevated::principal;

    Router::new()
        .route("/dashboard", get(principal::dashboard_get))
        .route("/internships", get(principal::internships_get))
        .route("/faculty", get(principal::faculty_get))
        .route("/students", get(principal::students_get))
        .route("/students/:id/mentor", put(principal::mentor_put))
}

fn build_cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}
