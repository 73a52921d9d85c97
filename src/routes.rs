// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, comments, follows, likes, tweets, users},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, tweets, comments, likes).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
///
/// Authentication is per handler through the `CurrentUser` extractor, so
/// public and protected methods can share one path.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{username}/admin", post(users::grant_admin))
        .route(
            "/{username}/follow",
            post(follows::follow_user).delete(follows::unfollow_user),
        )
        .route("/{username}/following", get(follows::list_following))
        .route("/{username}/followers", get(follows::list_followers))
        .route("/{username}/likes", get(likes::list_user_likes));

    let tweet_routes = Router::new()
        .route("/", get(tweets::list_tweets).post(tweets::create_tweet))
        .route(
            "/{id}",
            get(tweets::get_tweet)
                .put(tweets::update_tweet)
                .delete(tweets::delete_tweet),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{id}/like",
            post(likes::like_tweet).delete(likes::unlike_tweet),
        )
        .route("/{id}/likes", get(likes::list_tweet_likes));

    let comment_routes = Router::new().route(
        "/{id}",
        get(comments::get_comment)
            .put(comments::update_comment)
            .delete(comments::delete_comment),
    );

    let like_routes = Router::new().route("/{id}", get(likes::get_like));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tweets", tweet_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/likes", like_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
