//! `Transport` backed by `reqwest`.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportError};

/// Redirects followed before the request is abandoned as a transport error.
pub const MAX_REDIRECTS: usize = 10;

/// Async transport using a shared `reqwest::Client`.
///
/// Redirects are followed by reqwest; the response counts as redirected when
/// its final URL differs from the one requested.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client. Its redirect policy decides what
    /// `redirected` can ever report.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let requested = Url::parse(&request.url)?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(requested.clone()),
            HttpMethod::Post => self.client.post(requested.clone()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let redirected = response.url() != &requested;
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            redirected,
            url,
            headers,
            body,
        })
    }
}
