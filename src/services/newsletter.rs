use serde_json::json;

use crate::services::{ServiceError, ServiceResult, check_status};

/// Mailing-list subscription. The API takes the key as basic-auth password.
#[derive(Debug, Clone)]
pub struct NewsletterClient {
    client: reqwest::Client,
    url: String,
    key: Option<String>,
}

impl NewsletterClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            key,
        }
    }

    pub async fn try_subscribe(&self, email: &str) -> ServiceResult<()> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(ServiceError::Invalid(format!("'{email}' is not an email address")));
        }
        let key = self
            .key
            .as_deref()
            .ok_or(ServiceError::MissingCredential("newsletter api key"))?;

        let response = self
            .client
            .post(&self.url)
            .basic_auth("anystring", Some(key))
            .json(&json!({ "email_address": email, "status": "subscribed" }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Subscribe `email`. Errors are logged and collapsed into `false`.
    pub async fn subscribe(&self, email: &str) -> bool {
        match self.try_subscribe(email).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("newsletter subscription failed: {e}");
                false
            }
        }
    }
}
