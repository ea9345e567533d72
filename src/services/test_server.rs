use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;

/// Request captured by a test route.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

pub type Inbox = Arc<Mutex<Vec<Captured>>>;

/// Serve `router` on an ephemeral local port; returns the base url.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

pub fn capture(headers: &axum::http::HeaderMap, body: serde_json::Value) -> Captured {
    Captured {
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    }
}
