//! Mock script endpoint
//!
//! A wiremock server answering the script's two read actions and its write
//! POSTs, so the HTTP client can be exercised end to end.

use super::fixtures::config_for;
use peramore_admin::admin::Config;
use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SCRIPT_PATH: &str = "/macros/s/test/exec";

pub struct ScriptServer {
    pub server: MockServer,
}

impl ScriptServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), SCRIPT_PATH)
    }

    pub fn config(&self) -> Config {
        config_for(&self.url())
    }

    pub async fn serve(&self, action: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(SCRIPT_PATH))
            .and(query_param("action", action))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn serve_products(&self, rows: Value) {
        self.serve("get_products", ResponseTemplate::new(200).set_body_json(rows))
            .await;
    }

    /// Serve `rows` for every later product fetch, ahead of earlier mocks
    pub async fn replace_products(&self, rows: Value) {
        Mock::given(method("GET"))
            .and(path(SCRIPT_PATH))
            .and(query_param("action", "get_products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub async fn serve_messages(&self, rows: Value) {
        self.serve("get_messages", ResponseTemplate::new(200).set_body_json(rows))
            .await;
    }

    /// Answer every text/plain POST with `response`
    pub async fn accept_writes(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(SCRIPT_PATH))
            .and(header("content-type", "text/plain;charset=utf-8"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every POST received so far, in order
    pub async fn posted_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST")
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// `action` query values of every GET received so far, in order
    pub async fn fetched_actions(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "GET")
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "action")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}
