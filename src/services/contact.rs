use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::services::{ServiceError, ServiceResult, check_status};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::Invalid("name is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(ServiceError::Invalid("message is required".to_string()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ServiceError::Invalid(format!("'{email}' is not an email address"))),
        }
    }

    fn text(&self) -> String {
        let mut out = format!("Name: {}\nEmail: {}\n", self.name.trim(), self.email.trim());
        if let Some(company) = self.company.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(&format!("Company: {}\n", company.trim()));
        }
        if let Some(budget) = self.budget.as_deref().filter(|b| !b.trim().is_empty()) {
            out.push_str(&format!("Budget: {}\n", budget.trim()));
        }
        out.push('\n');
        out.push_str(self.message.trim());
        out
    }
}

/// Sends contact-form submissions through the transactional email API.
#[derive(Debug, Clone)]
pub struct ContactClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    recipient: String,
}

impl ContactClient {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        token: Option<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            token,
            recipient: recipient.into(),
        }
    }

    /// Deliver the form. No retry.
    pub async fn send(&self, form: &ContactForm) -> ServiceResult<()> {
        form.validate()?;
        let token = self
            .token
            .as_deref()
            .ok_or(ServiceError::MissingCredential("email api token"))?;

        let payload = json!({
            "from": format!("Website <no-reply@{}>", self.sender_domain()),
            "to": [self.recipient],
            "reply_to": form.email.trim(),
            "subject": format!("New inquiry from {}", form.name.trim()),
            "text": form.text(),
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `send` as a success flag for the form UI.
    pub async fn submit(&self, form: &ContactForm) -> bool {
        match self.send(form).await {
            Ok(()) => {
                log::info!("contact form from {} delivered", form.email.trim());
                true
            }
            Err(e) => {
                log::error!("contact form not delivered: {e}");
                false
            }
        }
    }

    fn sender_domain(&self) -> &str {
        self.recipient
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("localhost")
    }
}
