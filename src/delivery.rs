//! Email delivery capability
//!
//! The engine treats the delivery provider as "send(from, to, subject, body)
//! -> success | failure". A per-recipient failure is recoverable (the
//! recipient stays pending for the next run), so the trait surfaces it as an
//! `Err` the runner logs and skips rather than aborts on.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Timeout for a single delivery attempt
const SEND_TIMEOUT_SECS: u64 = 30;

/// Outbound email delivery provider
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a rendered HTML message
    async fn send(&self, from: &str, to: &str, subject: &str, html_body: &str) -> Result<()>;

    /// Deliver using a provider-side template and structured substitution data
    ///
    /// Providers without template support can reject this with
    /// [`Error::Delivery`]; the campaign runner only uses rendered sends.
    async fn send_template(
        &self,
        from: &str,
        to: &str,
        template_name: &str,
        data: serde_json::Value,
    ) -> Result<()>;
}

/// JSON body for rendered sends (`POST <endpoint>/send`)
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

/// JSON body for templated sends (`POST <endpoint>/send-template`)
#[derive(Debug, Serialize)]
struct SendTemplateRequest<'a> {
    from: &'a str,
    to: &'a str,
    template: &'a str,
    data: serde_json::Value,
}

/// [`EmailSender`] adapter for HTTP JSON delivery APIs
///
/// Posts to `<endpoint>/send` and `<endpoint>/send-template` with an optional
/// bearer-style `Authorization` header. Any non-2xx response is a delivery
/// failure for that recipient.
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: url::Url,
    auth_header: Option<String>,
}

impl HttpEmailSender {
    /// Create a new HTTP delivery adapter
    pub fn new(endpoint: &str, auth_header: Option<String>) -> Result<Self> {
        let endpoint = url::Url::parse(endpoint).map_err(|e| {
            Error::Delivery(format!("invalid delivery endpoint '{endpoint}': {e}"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Delivery(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            auth_header,
        })
    }

    async fn post_json<T: Serialize>(&self, route: &str, body: &T, to: &str) -> Result<()> {
        let url = self
            .endpoint
            .join(route)
            .map_err(|e| Error::Delivery(format!("invalid delivery route '{route}': {e}")))?;

        let mut request = self.client.post(url).json(body);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("failed to send to {to}: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Delivery(format!(
                "provider returned {status} for {to}: {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, from: &str, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let body = SendRequest {
            from,
            to,
            subject,
            html_body,
        };
        self.post_json("send", &body, to).await
    }

    async fn send_template(
        &self,
        from: &str,
        to: &str,
        template_name: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        let body = SendTemplateRequest {
            from,
            to,
            template: template_name,
            data,
        };
        self.post_json("send-template", &body, to).await
    }
}
