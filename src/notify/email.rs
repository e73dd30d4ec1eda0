use tracing::{error, info, warn};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Clone)]
struct MailerConfig {
    api_key: String,
    from_email: String,
}

/// SendGrid mail sender. May be unconfigured, in which case every send is a
/// logged no-op returning `false`.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: Option<MailerConfig>,
}

impl Mailer {
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("SENDGRID_API_KEY"),
            std::env::var("SENDGRID_FROM_EMAIL"),
        ) {
            (Ok(api_key), Ok(from_email)) => Some(MailerConfig {
                api_key,
                from_email,
            }),
            _ => {
                warn!("SendGrid not configured; email notifications disabled");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send an email. Returns whether the provider accepted it; failures are
    /// logged and never propagated.
    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let Some(config) = &self.config else {
            warn!("SendGrid not configured, skipping email");
            return false;
        };
        if to.is_empty() {
            warn!("No recipient email, skipping");
            return false;
        }

        let payload = serde_json::json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": config.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        let result = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Email sent to {to}, status: {}", response.status());
                true
            }
            Ok(response) => {
                error!("SendGrid rejected email to {to}: HTTP {}", response.status());
                false
            }
            Err(e) => {
                error!("Failed to send email to {to}: {e}");
                false
            }
        }
    }
}
