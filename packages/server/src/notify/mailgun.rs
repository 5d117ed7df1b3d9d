use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::templates::{self, RenderedEmail};
use super::{Notice, Notifier, NotifyError};
use crate::config::MailConfig;

struct Credentials {
    api_key: String,
    domain: String,
}

/// Sends mail through the Mailgun messages API.
///
/// Without an API key and domain every call fails with
/// [`NotifyError::NotConfigured`]. Calls are never retried here.
pub struct MailgunNotifier {
    client: Client,
    credentials: Option<Credentials>,
    base_url: String,
    from: String,
    recipient: String,
}

impl MailgunNotifier {
    pub fn new(config: &MailConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let credentials = match (non_blank(&config.api_key), non_blank(&config.domain)) {
            (Some(api_key), Some(domain)) => Some(Credentials { api_key, domain }),
            _ => None,
        };

        Ok(Self {
            client,
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            from: config.from.clone(),
            recipient: config.recipient.clone(),
        })
    }

    async fn send(
        &self,
        to: &str,
        reply_to: Option<&str>,
        email: RenderedEmail,
    ) -> Result<(), NotifyError> {
        let credentials = self.credentials.as_ref().ok_or(NotifyError::NotConfigured)?;
        let url = format!("{}/v3/{}/messages", self.base_url, credentials.domain);

        let mut form = vec![
            ("from", self.from.clone()),
            ("to", to.to_string()),
            ("subject", email.subject),
            ("text", email.text),
            ("html", email.html),
        ];
        if let Some(reply_to) = reply_to {
            form.push(("h:Reply-To", reply_to.to_string()));
        }

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&credentials.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else {
                    NotifyError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Mailgun accepted message");
        Ok(())
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    #[instrument(skip_all, fields(contact_id = ?notice.contact_id))]
    async fn notify_staff(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        let email = templates::staff_notification(notice);
        self.send(&self.recipient, Some(&notice.draft.email), email)
            .await
    }

    #[instrument(skip_all, fields(contact_id = ?notice.contact_id))]
    async fn notify_user(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        let email = templates::user_confirmation(notice, &self.recipient);
        self.send(&notice.draft.email, None, email).await
    }
}
