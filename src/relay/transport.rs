use crate::errors::DeliveryError;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
}

/// One outbound JSON POST. Implementations must not retry.
pub trait WebhookTransport: Send + Sync {
    fn post_json(&self, url: &str, body: String) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Blocking reqwest client with a bounded timeout and redirect limit.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(max_redirects))
            .build()
            .map_err(|e| DeliveryError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl WebhookTransport for HttpTransport {
    fn post_json(&self, url: &str, body: String) -> Result<DeliveryReceipt, DeliveryError> {
        let resp = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout(e.to_string())
                } else {
                    DeliveryError::Network(e.to_string())
                }
            })?;

        // The body is not inspected; the script's own error field is its business.
        let status = resp.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }

        Ok(DeliveryReceipt {
            status: status.as_u16(),
        })
    }
}
