use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use url::Url;

use crate::config::{Config, NtfyConfig};
use crate::domain::Notification;
use crate::errors::{WatchError, WatchResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Deliver one notification. Single attempt, no retry.
    fn send(&self, notification: &Notification) -> WatchResult<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&self, notification: &Notification) -> WatchResult<()> {
        (**self).send(notification)
    }
}

/// Used by `--dry-run` and `--skip-notify`, which never send.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn send(&self, _notification: &Notification) -> WatchResult<()> {
        Err(WatchError::Notification("notifications are disabled".to_string()))
    }
}

/// Posts notifications to an ntfy topic.
pub struct NotificationService {
    client: Client,
    topic_url: Url,
    username: String,
    password: String,
}

impl NotificationService {
    pub fn new(ntfy: &NtfyConfig) -> WatchResult<Self> {
        let topic_url = Url::parse(&ntfy.topic_url)
            .map_err(|e| WatchError::InvalidUrl(format!("{}: {}", ntfy.topic_url, e)))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            topic_url,
            username: ntfy.username.clone(),
            password: ntfy.password.clone(),
        })
    }

    pub fn from_config(config: &Config) -> WatchResult<Self> {
        config.validate_notifier()?;
        Self::new(&config.ntfy)
    }
}

impl Notifier for NotificationService {
    fn send(&self, notification: &Notification) -> WatchResult<()> {
        let mut request = self
            .client
            .post(self.topic_url.clone())
            .header("Title", header_text(&notification.title)?)
            .body(notification.body.clone());

        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        if let Some(link) = &notification.link {
            let click = HeaderValue::from_str(link)
                .map_err(|_| WatchError::Notification(format!("invalid click URL: {}", link)))?;
            request = request.header("Click", click);
        }

        let response = request.send()?;

        if response.status() != StatusCode::OK {
            return Err(WatchError::Notification(format!(
                "failed to send notification: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Header value for free text. Anything outside printable ASCII is sent as an
/// RFC 2047 encoded word, which ntfy decodes.
fn header_text(text: &str) -> WatchResult<HeaderValue> {
    let printable = text.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));

    let value = if printable {
        HeaderValue::from_str(text)
    } else {
        HeaderValue::from_str(&format!("=?UTF-8?B?{}?=", STANDARD.encode(text)))
    };

    value.map_err(|e| WatchError::Notification(format!("invalid header text: {}", e)))
}
