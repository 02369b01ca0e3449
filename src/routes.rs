use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tracing::Level;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(public_routes(&state))
        .merge(protected_routes(&state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors_layer(&state)),
        )
        .with_state(state)
}

fn public_routes(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/login", post(public::login))
        .route("/users", get(public::users_list).post(public::user_register));

    if state.config.security.public_movie_list {
        router.route("/movies", get(public::movies_list))
    } else {
        router
    }
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new()
        .route("/movies/:title", get(protected::movie_get))
        .route("/movies/genres/:name", get(protected::genre_get))
        .route("/movies/director/:name", get(protected::director_get))
        .route(
            "/users/:username",
            get(protected::user_get)
                .put(protected::user_put)
                .delete(protected::user_delete),
        )
        .route(
            "/users/:username/movies/:movie_id",
            post(protected::favorite_add).delete(protected::favorite_remove),
        );

    if !state.config.security.public_movie_list {
        router = router.route("/movies", get(public::movies_list));
    }

    router.route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.security.cors_origins;
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
