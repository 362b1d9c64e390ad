//! API layer - HTTP handlers and routing
//!
//! Public GETs and the two public forms (contact, membership) are
//! unauthenticated; everything that mutates content goes through the auth
//! gate. Uploaded files are served statically under `/uploads`.

pub mod auth;
pub mod carousel;
pub mod common;
pub mod contact;
pub mod events;
pub mod files;
pub mod membership;
pub mod middleware;
pub mod news;
pub mod partners;
pub mod projects;
pub mod resources;
pub mod upload;


use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{ApiError, AppState, CurrentAdmin};

/// Build the complete router for the application
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .server
                .cors_origin
                .parse::<HeaderValue>()
                .context("Invalid CORS origin")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/partners", get(partners::list_partners))
        .route("/api/projects", get(projects::list_projects))
        .route("/api/projects/{slug}", get(projects::get_project))
        .route("/api/events", get(events::list_events))
        .route("/api/events/{slug}", get(events::get_event))
        .route("/api/resources", get(resources::list_resources))
        .route("/api/resources/{slug}", get(resources::get_resource))
        .route("/api/news", get(news::list_news))
        .route("/api/news/{id}", get(news::get_news))
        .route("/api/carousel", get(carousel::list_carousel))
        .route("/api/files/{slug}", get(files::download_resource))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/membership", post(membership::submit_application));

    // Everything below requires a valid session
    let admin_routes = Router::new()
        .route("/api/auth/session", get(auth::session))
        .route(
            "/api/partners",
            post(partners::create_partner)
                .put(partners::update_partner)
                .patch(partners::reorder_partners)
                .delete(partners::delete_partner),
        )
        .route(
            "/api/projects",
            post(projects::create_project)
                .put(projects::update_project)
                .patch(projects::reorder_projects)
                .delete(projects::delete_project),
        )
        .route(
            "/api/events",
            post(events::create_event)
                .put(events::update_event)
                .patch(events::reorder_events)
                .delete(events::delete_event),
        )
        .route(
            "/api/resources",
            post(resources::create_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
        .route(
            "/api/news",
            post(news::create_news)
                .put(news::update_news)
                .patch(news::reorder_news)
                .delete(news::delete_news),
        )
        .route(
            "/api/carousel",
            post(carousel::create_carousel_image)
                .put(carousel::update_carousel_image)
                .patch(carousel::reorder_carousel)
                .delete(carousel::delete_carousel_image),
        )
        .route(
            "/api/contact",
            get(contact::list_contact)
                .put(contact::update_contact)
                .delete(contact::delete_contact),
        )
        .route(
            "/api/membership",
            get(membership::list_applications)
                .put(membership::review_application)
                .delete(membership::delete_application),
        )
        .route(
            "/api/upload",
            post(upload::upload_file)
                // Documents go up to the configured cap; leave headroom for
                // the multipart framing
                .layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let router = public_routes
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload.path))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}
