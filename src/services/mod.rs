//! Thin clients for the hosted services behind the content layer.
//!
//! Failures here never take down the scene: callers get an empty page or a
//! `false`, and the details go to the log.

pub mod cms;
pub mod contact;
pub mod newsletter;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_server;

use std::time::Duration;

pub use cms::{CmsClient, Page};
pub use contact::{ContactClient, ContactForm};
pub use newsletter::NewsletterClient;
pub use telemetry::Telemetry;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cms error: {0}")]
    Cms(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shared HTTP client with the configured timeout.
pub fn http_client(timeout: Duration) -> ServiceResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("studio-scene/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Turn a non-2xx response into `ServiceError::Status`.
async fn check_status(response: reqwest::Response) -> ServiceResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}
