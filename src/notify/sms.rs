use tracing::{error, info, warn};

#[derive(Clone)]
struct TexterConfig {
    account_sid: String,
    auth_token: String,
    from_number: String,
}

/// Twilio SMS sender. May be unconfigured, in which case every send is a
/// logged no-op returning `false`.
#[derive(Clone)]
pub struct Texter {
    client: reqwest::Client,
    config: Option<TexterConfig>,
}

impl Texter {
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("TWILIO_ACCOUNT_SID"),
            std::env::var("TWILIO_AUTH_TOKEN"),
            std::env::var("TWILIO_FROM_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number)) => Some(TexterConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => {
                warn!("Twilio not configured; SMS notifications disabled");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send an SMS. Returns whether the provider accepted it; failures are
    /// logged and never propagated.
    pub async fn send(&self, to_phone: &str, body: &str) -> bool {
        let Some(config) = &self.config else {
            warn!("Twilio not configured, skipping SMS");
            return false;
        };
        if to_phone.is_empty() {
            warn!("No recipient phone, skipping SMS");
            return false;
        }

        let to = normalize_phone(to_phone);
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            config.account_sid
        );
        let params = [
            ("To", to.as_str()),
            ("From", config.from_number.as_str()),
            ("Body", body),
        ];

        let result = self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&params)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("SMS sent to {to_phone}");
                true
            }
            Ok(response) => {
                error!("Twilio rejected SMS to {to_phone}: HTTP {}", response.status());
                false
            }
            Err(e) => {
                error!("Failed to send SMS to {to_phone}: {e}");
                false
            }
        }
    }
}

/// Normalise a phone number to E.164. Bare US numbers get a `+1` prefix;
/// anything already prefixed with `+` passes through trimmed.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    if trimmed.starts_with('+') {
        return trimmed.to_string();
    }
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("+1{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ten_digit_number_gets_us_prefix() {
        assert_eq!(normalize_phone("6515551234"), "+16515551234");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalize_phone("(651) 555-1234"), "+16515551234");
    }

    #[test]
    fn already_e164_passes_through() {
        assert_eq!(normalize_phone(" +447911123456 "), "+447911123456");
    }
}
