//! One-shot status messages carried across a redirect in a cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

pub const COOKIE: &str = "flash";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Danger,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: msg.into(),
        }
    }

    pub fn danger(msg: impl Into<String>) -> Self {
        Self {
            level: Level::Danger,
            message: msg.into(),
        }
    }
}

pub fn encode(flashes: &[Flash]) -> String {
    // serializing a vec of plain structs cannot fail
    let json = serde_json::to_vec(flashes).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Malformed values are dropped, a stale cookie must not break a page.
pub fn decode(value: &str) -> Vec<Flash> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_else(|| {
            log::warn!("ignoring malformed flash cookie");
            Vec::new()
        })
}

/// Queues `flashes` after any message still waiting in the jar.
pub fn push(jar: CookieJar, flashes: Vec<Flash>) -> CookieJar {
    let mut all = jar.get(COOKIE).map(|c| decode(c.value())).unwrap_or_default();
    all.extend(flashes);

    let cookie = Cookie::build((COOKIE, encode(&all)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Removes the queued messages from the jar and returns them for rendering.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    match jar.get(COOKIE).map(|c| decode(c.value())) {
        Some(flashes) => (jar.remove(Cookie::build(COOKIE).path("/")), flashes),
        None => (jar, Vec::new()),
    }
}

/// `303 See Other` to `to` with `flashes` queued for the next page.
pub fn redirect(jar: CookieJar, to: &str, flashes: Vec<Flash>) -> Response {
    (push(jar, flashes), Redirect::to(to)).into_response()
}
