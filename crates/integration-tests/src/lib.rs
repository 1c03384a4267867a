//! Integration tests for GotoTech.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gototech-integration-tests
//! ```
//!
//! Each test builds the full storefront router on its own in-memory `SQLite`
//! database, so no server or external database is needed.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart, catalog, contact, and health routes over HTTP
//! - `cart_store` - Cart store behavior across storage backends

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use sqlx::SqlitePool;
use tower::ServiceExt;

use gototech_storefront::config::StorefrontConfig;
use gototech_storefront::db::{self, ProductRepository};
use gototech_storefront::state::AppState;

/// A storefront router plus the pool behind it.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront on a fresh in-memory database with the sample catalog.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created, migrated, or seeded.
    pub async fn new() -> Self {
        let config = StorefrontConfig::for_database("sqlite::memory:");
        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to create test database");
        db::migrate(&pool).await.expect("Failed to migrate test database");
        ProductRepository::new(&pool)
            .seed()
            .await
            .expect("Failed to seed test database");

        let router = gototech_storefront::app(AppState::new(config, pool.clone()));

        Self {
            router,
            pool,
            cookie: None,
        }
    }

    /// Same app as a new visitor with no session yet.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            pool: self.pool.clone(),
            cookie: None,
        }
    }

    /// Send `request`, carrying the session cookie like a browser would.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which axum routers never do.
    pub async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            let value = cookie.parse().expect("Cookie is a valid header value");
            request.headers_mut().insert(header::COOKIE, value);
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next());
        if let Some(pair) = session_cookie {
            self.cookie = Some(pair.to_string());
        }

        response
    }

    /// GET `uri`.
    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("Valid request");
        self.send(request).await
    }

    /// POST a url-encoded form to `uri`.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
        self.post(uri, "application/x-www-form-urlencoded", form.to_string())
            .await
    }

    /// POST a JSON body to `uri`.
    pub async fn post_json(&mut self, uri: &str, json: &serde_json::Value) -> Response<Body> {
        self.post(uri, "application/json", json.to_string()).await
    }

    /// POST `body` to `uri` as-is, e.g. to send malformed JSON.
    pub async fn post(&mut self, uri: &str, content_type: &str, body: String) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("Valid request");
        self.send(request).await
    }
}

/// Read a response body as UTF-8 text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is UTF-8")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("Body is JSON")
}

/// Parse the `HX-Trigger` header of a cart response.
///
/// # Panics
///
/// Panics if the header is missing or not JSON.
pub fn hx_trigger(response: &Response<Body>) -> serde_json::Value {
    let raw = response
        .headers()
        .get("hx-trigger")
        .and_then(|v| v.to_str().ok())
        .expect("HX-Trigger header");
    serde_json::from_str(raw).expect("HX-Trigger is JSON")
}
