//! # HTTP routes
//!
//! | Group | Guard | Routes |
//! |-------|-------|--------|
//! | public | none | `/signup`, `/login`, `/logout`, `/preferences`, `/darkmode` |
//! | user | [`require_login`] | `/notes…`, `/accounts/notes`, `/search`, `/account…` |
//! | admin | [`require_admin`] | `/admin/users…` |
//!
//! Every response passes through [`preferences::ensure_cookie`], so a client
//! without a preferences cookie gets the default one.

mod account;
mod admin;
mod auth;
mod notes;
mod preferences;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::middleware::{require_admin, require_login};
use crate::state::AppState;

/// Body of responses that carry no resource.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> Json<Message> {
    Json(Message {
        message: text.into(),
    })
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/preferences", get(preferences::show))
        .route("/darkmode", post(preferences::toggle_dark_mode));

    let user = Router::new()
        .route("/notes", get(notes::list_visible).post(notes::create))
        .route("/notes/{id}/edit", post(notes::edit))
        .route("/notes/{id}/delete", post(notes::delete))
        .route("/accounts/notes", get(notes::list_own))
        .route("/search", get(notes::search))
        .route("/account", get(account::show).post(account::update))
        .route("/account/image", post(account::set_image))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let admin = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/role", post(admin::update_role))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public)
        .merge(user)
        .merge(admin)
        .layer(from_fn(preferences::ensure_cookie))
        .with_state(state)
}
