//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod race;

use activity_signup::{seed::Seed, server::router, service::ActivityService};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A router bound to an ephemeral local port, torn down on drop.
pub struct TestServer {
    pub base_url: String,
    pub service: Arc<ActivityService>,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(Seed::school_default()).await
}

pub async fn spawn_server_with(seed: Seed) -> TestServer {
    init_tracing();

    let service = Arc::new(ActivityService::from_seed(&seed).expect("Seed should be valid"));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Listener has an address");

    let app = router(Arc::clone(&service));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestServer {
        base_url: format!("http://{}", address),
        service,
        client: Client::new(),
        handle,
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn activities(&self, lang: &str) -> Value {
        self.client
            .get(self.url("/activities"))
            .query(&[("lang", lang)])
            .send()
            .await
            .expect("GET /activities failed")
            .json()
            .await
            .expect("Activities should be JSON")
    }

    pub async fn participants(&self, activity: &str, lang: &str) -> Vec<String> {
        let activities = self.activities(lang).await;
        serde_json::from_value(activities[activity]["participants"].clone())
            .unwrap_or_else(|_| panic!("{} should be listed in '{}'", activity, lang))
    }

    pub async fn signup(&self, activity: &str, email: &str, lang: &str) -> Response {
        self.client
            .post(self.url(&format!("/activities/{}/signup", activity)))
            .query(&[("lang", lang)])
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("POST signup failed")
    }

    pub async fn unregister(&self, activity: &str, email: &str, lang: &str) -> Response {
        self.client
            .delete(self.url(&format!("/activities/{}/unregister", activity)))
            .query(&[("lang", lang)])
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("DELETE unregister failed")
    }

    /// Sign up `count` generated students so the activity has a known fill level.
    pub async fn fill(&self, activity: &str, prefix: &str, count: usize) {
        for i in 0..count {
            let response = self
                .signup(activity, &format!("{}{}@mergington.edu", prefix, i), "en")
                .await;
            assert_eq!(response.status(), 200, "filler signup {} failed", i);
        }
    }
}
