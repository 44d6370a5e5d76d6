//! Route definitions for the vendor management platform

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth/vendor", auth_routes())
        // Protected routes - vendor management
        .nest("/vendors", vendor_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Vendor management routes (protected)
fn vendor_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_vendors).post(handlers::create_vendor),
        )
        .route(
            "/:id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
        .route("/:id/verify", patch(handlers::verify_vendor))
        .route("/:id/logo", get(handlers::get_vendor_logo))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::{create_app, AppState};

    struct TestApp {
        app: Router,
        _dir: TempDir,
    }

    impl TestApp {
        fn new() -> Self {
            let (state, dir) = AppState::for_tests();
            Self {
                app: create_app(state),
                _dir: dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn json(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.send(request).await
        }

        /// Register `email` and log in as that vendor
        async fn token_for(&self, email: &str) -> (i64, String) {
            let (status, body) = self
                .json(Method::POST, "/api/auth/vendor/register", None, Some(vendor(email)))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            let id = body["vendor"]["id"].as_i64().unwrap();

            let (status, body) = self
                .json(
                    Method::POST,
                    "/api/auth/vendor/login",
                    None,
                    Some(json!({ "email": email, "password": "Radixweb@8" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{}", body);
            (id, body["token"].as_str().unwrap().to_string())
        }
    }

    fn vendor(email: &str) -> Value {
        json!({
            "company_name": "OPS",
            "contact_person_name": "Dixit Patel",
            "email": email,
            "password": "Radixweb@8",
            "phone_number": "1234567890",
            "business_type": "Manufacturer",
            "address": "Ekyarth Ahmedabad",
            "country": "India",
            "gst_number": "07ABCDE1234F2Z5"
        })
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = TestApp::new();
        let (status, body) = app.json(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");

        let response = app
            .app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_and_duplicate() {
        let app = TestApp::new();
        let (status, body) = app
            .json(Method::POST, "/api/auth/vendor/register", None, Some(vendor("d@example.com")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Vendor is registered successfully");
        assert_eq!(body["vendor"]["email"], "d@example.com");
        assert!(body["vendor"].get("password").is_none());

        let (status, body) = app
            .json(Method::POST, "/api/auth/vendor/register", None, Some(vendor("d@example.com")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already in use for another Vendor");

        let (status, body) = app
            .json(
                Method::POST,
                "/api/auth/vendor/login",
                None,
                Some(json!({ "email": "d@example.com", "password": "WrongPassword@123" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let app = TestApp::new();
        let mut india = vendor("new@example.com");
        india["gst_number"] = json!("INVALIDGST12345");
        let (status, body) = app
            .json(Method::POST, "/api/auth/vendor/register", None, Some(india))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"][0]["msg"]
            .as_str()
            .unwrap()
            .starts_with("Invalid GST number format"));

        let mut global = vendor("global@example.com");
        global["country"] = json!("Global");
        global["gst_number"] = json!("12");
        let (status, body) = app
            .json(Method::POST, "/api/auth/vendor/register", None, Some(global))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"][0]["msg"]
            .as_str()
            .unwrap()
            .starts_with("Invalid Tax ID format"));
    }

    #[tokio::test]
    async fn test_vendor_routes_require_token() {
        let app = TestApp::new();
        let (status, body) = app.json(Method::GET, "/api/vendors", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authorization header missing");

        let (status, body) = app
            .json(Method::GET, "/api/vendors/1", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_vendor_crud_flow() {
        let app = TestApp::new();
        let (id, token) = app.token_for("owner@example.com").await;
        let token = Some(token.as_str());

        // Create
        let (status, body) = app
            .json(Method::POST, "/api/vendors", token, Some(vendor("second@example.com")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Vendor is created successfully");
        let second = body["vendor"]["id"].as_i64().unwrap();

        // List
        let (status, body) = app
            .json(Method::GET, "/api/vendors?page=1&limit=10", token, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["meta"]["page"], 1);
        assert_eq!(body["meta"]["lastPage"], 1);
        assert_eq!(body["data"][0]["id"], second);
        assert_eq!(body["data"][1]["id"], id);
        assert!(body["data"][0].get("password").is_none());
        assert!(body["data"][0].get("password_hash").is_none());

        // Get
        let (status, body) = app
            .json(Method::GET, &format!("/api/vendors/{}", id), token, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "owner@example.com");
        assert_eq!(body["is_verified"], false);

        // Update
        let (status, body) = app
            .json(
                Method::PUT,
                &format!("/api/vendors/{}", id),
                token,
                Some(json!({ "address": "X" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Vendor details updated successfully");
        assert_eq!(body["vendor"]["address"], "X");
        assert_eq!(body["vendor"]["company_name"], "OPS");

        // Verify twice
        for _ in 0..2 {
            let (status, body) = app
                .json(Method::PATCH, &format!("/api/vendors/{}/verify", id), token, None)
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Vendor verified successfully");
            assert_eq!(body["vendor"]["is_verified"], true);
        }

        // Delete
        let (status, body) = app
            .json(Method::DELETE, &format!("/api/vendors/{}", second), token, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Vendor deleted successfully");

        let (status, body) = app
            .json(Method::GET, &format!("/api/vendors/{}", second), token, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Requested vendor not found");

        let (status, body) = app
            .json(Method::DELETE, &format!("/api/vendors/{}", second), token, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Vendor is not found for provided id");
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected() {
        let app = TestApp::new();
        let (_, token) = app.token_for("owner@example.com").await;

        let (status, body) = app
            .json(Method::GET, "/api/vendors/abc", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["msg"], "Invalid vendor id");
        assert_eq!(body["errors"][0]["location"], "params");
    }

    #[tokio::test]
    async fn test_logo_upload_and_download() {
        let app = TestApp::new();
        let (id, token) = app.token_for("owner@example.com").await;

        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNGDATA\r\n\
            --XYZ--\r\n";
        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/api/vendors/{}", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();
        let (status, json) = app.send(request).await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        let logo = json["vendor"]["logo"].as_str().unwrap().to_string();
        assert!(logo.ends_with(".png"));

        let request = Request::builder()
            .uri(format!("/api/vendors/{}/logo", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"PNGDATA");

        // Also reachable on the public static path
        let request = Request::builder()
            .uri(format!("/images/{}", logo))
            .body(Body::empty())
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logo_missing() {
        let app = TestApp::new();
        let (id, token) = app.token_for("owner@example.com").await;
        let (status, body) = app
            .json(Method::GET, &format!("/api/vendors/{}/logo", id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Vendor logo not found");
    }
}
