use serde_json::json;
use url::Url;

use crate::domain::repository::MailerPort;
use crate::error::AuthServiceError;

/// Mailer collaborator reached over HTTP. The endpoint receives
/// `{"to": ..., "code": ...}` and answers with a success status; anything else
/// is a delivery failure. Delivery guarantees past that response are the
/// mailer's concern.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

impl MailerPort for HttpMailer {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "to": to, "code": code }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "mailer request failed");
                AuthServiceError::DeliveryUnavailable
            })?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "mailer rejected delivery");
            return Err(AuthServiceError::DeliveryUnavailable);
        }
        Ok(())
    }
}
