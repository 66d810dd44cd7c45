//! Best-effort delivery of finished batches to a caller-supplied URL.

use std::time::Duration;

use reqwest::Client;
use roast_core::BatchResponse;

#[derive(Debug, Clone)]
pub struct CallbackClient {
    client: Client,
}

impl CallbackClient {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be built.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// POSTs the batch once. Failures are logged and otherwise ignored.
    pub async fn deliver(&self, url: &str, response: &BatchResponse) {
        match self.client.post(url).json(response).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(
                    callback_url = %url,
                    status = resp.status().as_u16(),
                    "batch callback delivered"
                );
            }
            Ok(resp) => {
                tracing::warn!(
                    callback_url = %url,
                    status = resp.status().as_u16(),
                    "batch callback rejected"
                );
            }
            Err(e) => {
                tracing::warn!(callback_url = %url, error = %e, "batch callback failed");
            }
        }
    }
}
