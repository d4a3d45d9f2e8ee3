//! The endpoint facade for the site admin API.
//!
//! # Design
//! `AdminClient` holds its configuration and an injected `Transport`, nothing
//! else, so clones can be used from concurrent tasks freely. Every endpoint
//! is the same short pipeline:
//!
//! 1. build an `EndpointRequest` (resource path, optional JSON body),
//! 2. execute it through the transport exactly once,
//! 3. `check_status`, then `parse_json_response`,
//! 4. for a few endpoints, a post-step (`decode_data_field`,
//!    `repair_stats_response`).
//!
//! Transport failures of body-bearing calls become `ApiError::Network`;
//! those of body-less reads are surfaced as `ApiError::Transport` with the
//! cause attached.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::endpoint::{add_cache_buster, endpoint_url, EndpointRequest};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{check_status, decode_data_field, parse_json_response, repair_stats_response};
use crate::transport::{normalize_network_error, Transport};
use crate::types::{
    AkismetKeyCheck, ConnectionUpdate, JumpStartAction, JumpStartUpdate, ModuleActivation,
    NoticeDismissal, OptionsReset, SiteRegistration, StatsRange, UserLink,
};

/// Client for the site admin REST API.
#[derive(Clone)]
pub struct AdminClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    pub fn new<T: Transport + 'static>(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    pub fn with_shared_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Client over a default `ReqwestTransport`.
    #[cfg(feature = "reqwest")]
    pub fn with_reqwest(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = crate::reqwest_transport::ReqwestTransport::new()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Self::new(config, transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn an endpoint spec into the concrete request the transport will
    /// see.
    pub fn build_request(&self, endpoint: &EndpointRequest) -> HttpRequest {
        let method = endpoint.method();
        let mut url = endpoint_url(&self.config.api_root, &self.config.namespace, endpoint.resource());
        let mut headers = Vec::new();

        match method {
            HttpMethod::Get if self.config.cache_busting => {
                url = add_cache_buster(&url, now_millis());
            }
            HttpMethod::Get => {}
            HttpMethod::Post => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
            }
        }

        HttpRequest {
            method,
            url,
            headers,
            body: endpoint.body.clone(),
        }
    }

    async fn send(&self, endpoint: EndpointRequest) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(&endpoint);
        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let has_body = request.has_body();
        match self.transport.execute(request).await {
            Ok(response) => Ok(response),
            Err(e) if has_body => Err(normalize_network_error(e)),
            Err(e) => {
                tracing::warn!("Transport failed on {}: {}", endpoint.resource(), e);
                Err(ApiError::Transport(e))
            }
        }
    }

    async fn request(&self, endpoint: EndpointRequest) -> Result<Value, ApiError> {
        let response = self.send(endpoint).await?;
        let response = check_status(response)?;
        parse_json_response(response)
    }

    async fn get(&self, path: impl Into<String>) -> Result<Value, ApiError> {
        self.request(EndpointRequest::get(path)).await
    }

    async fn post<B>(&self, path: impl Into<String>, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let endpoint = EndpointRequest::post(path, body)?;
        self.request(endpoint).await
    }

    // --- connection ---

    pub async fn fetch_site_connection_status(&self) -> Result<Value, ApiError> {
        self.get("connection").await
    }

    pub async fn fetch_site_connection_test(&self) -> Result<Value, ApiError> {
        self.get("connection/test").await
    }

    pub async fn fetch_user_connection_data(&self) -> Result<Value, ApiError> {
        self.get("connection/data").await
    }

    pub async fn fetch_connect_url(&self) -> Result<Value, ApiError> {
        self.get("connection/url").await
    }

    pub async fn disconnect_site(&self) -> Result<Value, ApiError> {
        self.post("connection", &ConnectionUpdate { is_active: false }).await
    }

    pub async fn unlink_user(&self) -> Result<Value, ApiError> {
        self.post("connection/user", &UserLink { linked: false }).await
    }

    pub async fn register_site(
        &self,
        registration_nonce: &str,
        redirect_uri: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = SiteRegistration {
            registration_nonce: registration_nonce.to_string(),
            redirect_uri: redirect_uri.map(str::to_string),
        };
        self.post("connection/register", &body).await
    }

    // --- tracking ---

    pub async fn fetch_user_tracking_settings(&self) -> Result<Value, ApiError> {
        self.get("tracking/settings").await
    }

    pub async fn update_user_tracking_settings<T>(&self, settings: &T) -> Result<Value, ApiError>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.post("tracking/settings", settings).await
    }

    pub async fn jump_start(&self, action: JumpStartAction) -> Result<Value, ApiError> {
        self.post("jumpstart", &JumpStartUpdate::from(action)).await
    }

    // --- modules ---

    pub async fn fetch_modules(&self) -> Result<Value, ApiError> {
        self.get("module/all").await
    }

    pub async fn fetch_module(&self, slug: &str) -> Result<Value, ApiError> {
        self.get(format!("module/{slug}")).await
    }

    pub async fn activate_module(&self, slug: &str) -> Result<Value, ApiError> {
        self.post(format!("module/{slug}/active"), &ModuleActivation { active: true })
            .await
    }

    /// Deactivate a module.
    ///
    /// Older clients of this API handed back the raw response here, without
    /// checking the status or parsing the body. This one runs the same
    /// pipeline as every sibling endpoint, so a failed deactivation is an
    /// `ApiError`.
    pub async fn deactivate_module(&self, slug: &str) -> Result<Value, ApiError> {
        self.post(format!("module/{slug}/active"), &ModuleActivation { active: false })
            .await
    }

    pub async fn update_module_options<T>(&self, slug: &str, options: &T) -> Result<Value, ApiError>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.post(format!("module/{slug}"), options).await
    }

    // --- settings ---

    pub async fn fetch_settings(&self) -> Result<Value, ApiError> {
        self.get("settings").await
    }

    pub async fn update_settings<T>(&self, settings: &T) -> Result<Value, ApiError>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.post("settings", settings).await
    }

    /// Reset a group of options, e.g. `"options"` or `"modules"`.
    pub async fn reset_options(&self, options: &str) -> Result<Value, ApiError> {
        self.post(format!("options/{options}"), &OptionsReset { reset: true })
            .await
    }

    // --- module data ---

    pub async fn get_protect_count(&self) -> Result<Value, ApiError> {
        self.get("module/protect/data").await
    }

    pub async fn get_last_down_time(&self) -> Result<Value, ApiError> {
        self.get("module/monitor/data").await
    }

    /// VaultPress status. The server nests the payload as a JSON string in
    /// `data`.
    pub async fn get_vault_press_data(&self) -> Result<Value, ApiError> {
        let payload = self.get("module/vaultpress/data").await?;
        decode_data_field(payload)
    }

    pub async fn get_akismet_data(&self) -> Result<Value, ApiError> {
        self.get("module/akismet/data").await
    }

    pub async fn check_akismet_key(&self) -> Result<Value, ApiError> {
        self.get("module/akismet/key/check").await
    }

    pub async fn check_akismet_key_typed(&self, api_key: &str) -> Result<Value, ApiError> {
        let body = AkismetKeyCheck {
            api_key: api_key.to_string(),
        };
        self.post("module/akismet/key/check", &body).await
    }

    /// Site stats for `range`. When the upstream analytics service answered
    /// with an error for every section, this resolves to an empty object
    /// instead of failing.
    pub async fn fetch_stats_data(&self, range: StatsRange) -> Result<Value, ApiError> {
        let payload = self.get(format!("module/stats/data?range={range}")).await?;
        Ok(repair_stats_response(payload))
    }

    // --- site ---

    pub async fn get_plugin_updates(&self) -> Result<Value, ApiError> {
        self.get("updates/plugins").await
    }

    /// Site and plan data. The server nests the payload as a JSON string in
    /// `data`.
    pub async fn fetch_site_data(&self) -> Result<Value, ApiError> {
        let payload = self.get("site").await?;
        decode_data_field(payload)
    }

    pub async fn fetch_plugins_data(&self) -> Result<Value, ApiError> {
        self.get("plugins").await
    }

    pub async fn dismiss_notice(&self, notice: &str) -> Result<Value, ApiError> {
        self.post(format!("notice/{notice}"), &NoticeDismissal { dismissed: true })
            .await
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
