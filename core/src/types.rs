//! Request payloads sent by the fixed-body endpoints.
//!
//! Responses stay untyped `serde_json::Value`s: the server's shapes vary by
//! site and plugin version, and callers pick out what they need.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST connection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// Body of `POST connection/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLink {
    pub linked: bool,
}

/// Body of `POST connection/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRegistration {
    pub registration_nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

/// Body of `POST module/<slug>/active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleActivation {
    pub active: bool,
}

/// Body of `POST jumpstart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpStartUpdate {
    pub active: bool,
}

/// Body of `POST notice/<notice>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeDismissal {
    pub dismissed: bool,
}

/// Body of `POST options/<options>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsReset {
    pub reset: bool,
}

/// Body of `POST module/akismet/key/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AkismetKeyCheck {
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStartAction {
    Activate,
    Deactivate,
}

impl From<JumpStartAction> for JumpStartUpdate {
    fn from(action: JumpStartAction) -> Self {
        Self {
            active: action == JumpStartAction::Activate,
        }
    }
}

/// Period requested from the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Day,
    Week,
    Month,
}

impl StatsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Day => "day",
            StatsRange::Week => "week",
            StatsRange::Month => "month",
        }
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
