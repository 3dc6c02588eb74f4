use crate::config::{EmailConfig, RecipientEmail};
use async_trait::async_trait;
use availability::contracts::NotificationTransport;

/// Sends the availability text as a plain email through the email API configured in
/// `email.host`.
pub struct EmailNotifier {
    config: EmailConfig,
    recipient: RecipientEmail,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, recipient: RecipientEmail) -> Self {
        Self { config, recipient }
    }
}

#[async_trait]
impl NotificationTransport for EmailNotifier {
    #[tracing::instrument(err, skip(self, text), level = "info")]
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        let request_id =
            email_notification_sender::send(&self.config, &self.recipient, text).await?;
        tracing::info!(%request_id, recipient = %self.recipient, "Message sent");
        Ok(())
    }
}

mod email_notification_sender {
    use crate::config::{EmailConfig, RecipientEmail};
    use anyhow::Context;
    use secrecy::ExposeSecret;
    use serde::{Deserialize, Serialize};
    use shared_kernel::http_client::HttpClient;
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize)]
    struct To {
        pub email: String,
    }

    #[derive(Serialize, Deserialize)]
    struct Content {
        pub title: String,
        pub body: String,
    }

    #[derive(Serialize, Deserialize)]
    struct Message {
        pub to: To,
        pub content: Content,
    }

    #[derive(Serialize, Deserialize)]
    struct Data {
        pub message: Message,
    }

    #[derive(Deserialize, Debug)]
    struct Response {
        #[serde(rename = "requestId")]
        request_id: String,
    }

    fn generate_email_body(config: &EmailConfig, recipient: &RecipientEmail, text: &str) -> Data {
        Data {
            message: Message {
                to: To {
                    email: recipient.to_string(),
                },
                content: Content {
                    title: config.subject.clone(),
                    body: text.to_string(),
                },
            },
        }
    }

    /// Returns the id the email API assigned to the request.
    pub(super) async fn send(
        config: &EmailConfig,
        recipient: &RecipientEmail,
        text: &str,
    ) -> anyhow::Result<String> {
        let body = serde_json::to_value(generate_email_body(config, recipient, text))
            .context("Failed to convert the body to a valid json")?;

        let auth_token = config.auth_token.expose_secret();
        let bearer_token = format!("Bearer {auth_token}");
        let headers = HashMap::from([("authorization", bearer_token)]);

        let response = HttpClient::post_json::<Response>(config.host.clone(), headers, body)
            .await
            .context("Failed to send the availability email")?;
        Ok(response.request_id)
    }
}
