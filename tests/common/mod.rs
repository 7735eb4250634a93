//! Fixtures shared by the router tests.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use jwt_filter::app::{build_router, build_state};
use jwt_filter::config::Config;

#[path = "../../src/services/auth/test_support/signer.rs"]
mod signer;

pub use signer::TestSigner;

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Router wired exactly like the binary, trusting `TestSigner::trusted()`.
pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    pub fn with_vars(extra: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secure-keystore.p12");
        std::fs::write(&path, TestSigner::trusted().keystore("jwt", "changeit")).unwrap();

        let mut vars: HashMap<String, String> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.insert(
            "API_SECURITY_KEYSTORE_FILE".to_string(),
            path.to_str().unwrap().to_string(),
        );

        let config = Config::from_vars(&vars).unwrap();
        let state = build_state(&config).unwrap();

        Self {
            router: build_router(state, &config),
            _dir: dir,
        }
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Response<Body> {
        let mut request = Request::get(uri);
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }

        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
