use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::services::{ServiceError, ServiceResult, check_status};

const PAGE_QUERY: &str = r#"query Page($slug: String!) {
  page(slug: $slug) {
    title
    sections { kind heading body }
  }
}"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Page {
    /// What a page renders as when the CMS is unreachable.
    pub fn empty(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: String::new(),
            sections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.sections.is_empty()
    }
}

/// Client for the headless CMS query endpoint.
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }

    /// Run a query and return its `data` object.
    pub async fn query(&self, query: &str, variables: serde_json::Value) -> ServiceResult<serde_json::Value> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = check_status(request.send().await?).await?;
        let mut body: serde_json::Value = response.json().await?;

        if let Some(errors) = body.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                    .collect();
                return Err(ServiceError::Cms(messages.join("; ")));
            }
        }

        Ok(body
            .get_mut("data")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null))
    }

    /// Fetch a page document. Any failure yields `Page::empty`.
    pub async fn fetch_page(&self, slug: &str) -> Page {
        match self.try_fetch_page(slug).await {
            Ok(page) => page,
            Err(e) => {
                log::error!("cms: page '{slug}' unavailable: {e}");
                Page::empty(slug)
            }
        }
    }

    async fn try_fetch_page(&self, slug: &str) -> ServiceResult<Page> {
        let mut data = self.query(PAGE_QUERY, json!({ "slug": slug })).await?;
        let page = data
            .get_mut("page")
            .map(serde_json::Value::take)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ServiceError::Cms(format!("no page '{slug}'")))?;

        let mut page: Page = serde_json::from_value(page)
            .map_err(|e| ServiceError::Cms(format!("malformed page '{slug}': {e}")))?;
        page.slug = slug.to_string();
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::services::test_server::{self, Inbox};

    async fn cms_server() -> (String, Inbox) {
        let inbox = Inbox::default();
        let router = Router::new()
            .route(
                "/graphql",
                post(
                    |State(inbox): State<Inbox>, headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                        let slug = body["variables"]["slug"].as_str().unwrap_or_default().to_string();
                        inbox.lock().await.push(test_server::capture(&headers, body));
                        let reply = match slug.as_str() {
                            "about" => json!({ "data": { "page": {
                                "title": "About us",
                                "sections": [{ "kind": "hero", "heading": "We build", "body": null }]
                            } } }),
                            "broken" => json!({ "errors": [{ "message": "boom" }] }),
                            _ => json!({ "data": { "page": null } }),
                        };
                        Json(reply)
                    },
                ),
            )
            .route("/down", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .with_state(inbox.clone());
        (test_server::serve(router).await, inbox)
    }

    #[tokio::test]
    async fn fetches_page_with_bearer_token() {
        let (base, inbox) = cms_server().await;
        let cms = CmsClient::new(
            reqwest::Client::new(),
            format!("{base}/graphql"),
            Some("cms-token".to_string()),
        );

        let page = cms.fetch_page("about").await;
        assert_eq!(page.slug, "about");
        assert_eq!(page.title, "About us");
        assert_eq!(page.sections.len(), 1);
        assert_eq!(page.sections[0].heading.as_deref(), Some("We build"));

        let seen = inbox.lock().await;
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer cms-token"));
        assert!(seen[0].body["query"].as_str().unwrap().contains("page(slug"));
    }

    #[tokio::test]
    async fn failures_render_an_empty_page() {
        let (base, _) = cms_server().await;
        let cms = CmsClient::new(reqwest::Client::new(), format!("{base}/graphql"), None);

        assert!(cms.fetch_page("missing").await.is_empty());
        assert!(cms.fetch_page("broken").await.is_empty());

        let down = CmsClient::new(reqwest::Client::new(), format!("{base}/down"), None);
        assert!(down.fetch_page("about").await.is_empty());
    }

    #[tokio::test]
    async fn query_surfaces_cms_errors() {
        let (base, _) = cms_server().await;
        let cms = CmsClient::new(reqwest::Client::new(), format!("{base}/graphql"), None);

        let err = cms
            .query("query { page }", json!({ "slug": "broken" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Cms(ref m) if m == "boom"));
    }
}
