//! User profile lookups
//!
//! Profiles are owned by another service. Lookups never fail the caller:
//! they return [`ProfileLookupResult::Unavailable`] and the caller decides
//! whether to substitute a placeholder with
//! [`ProfileLookupResult::or_placeholder`].

use crate::config::ProfileSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public profile fields shown next to content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// User id
    pub user_id: i64,
    /// Display name
    pub display_name: String,
    /// Avatar URL, if the user has one
    pub avatar_url: Option<String>,
}

impl ProfileSummary {
    /// Stand-in for a profile that could not be loaded
    #[must_use]
    pub fn placeholder(user_id: i64) -> Self {
        Self {
            user_id,
            display_name: format!("user-{user_id}"),
            avatar_url: None,
        }
    }
}

/// Outcome of a profile lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookupResult {
    /// The profile service answered
    Found(ProfileSummary),
    /// The profile could not be loaded, with the reason
    Unavailable(String),
}

impl ProfileLookupResult {
    /// The found profile, or a placeholder for `user_id`
    #[must_use]
    pub fn or_placeholder(self, user_id: i64) -> ProfileSummary {
        match self {
            Self::Found(profile) => profile,
            Self::Unavailable(reason) => {
                tracing::debug!(user_id, %reason, "using placeholder profile");
                ProfileSummary::placeholder(user_id)
            }
        }
    }
}

/// Capability to resolve a user id to a profile
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Looks up one user
    async fn lookup(&self, user_id: i64) -> ProfileLookupResult;
}

/// Lookup used when no profile service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfileLookup;

#[async_trait]
impl ProfileLookup for NoProfileLookup {
    async fn lookup(&self, _user_id: i64) -> ProfileLookupResult {
        ProfileLookupResult::Unavailable("profile service not configured".to_string())
    }
}

/// Lookup against the profile service's HTTP API
///
/// Requests `GET {base_url}/users/{id}/profile`.
#[derive(Debug, Clone)]
pub struct HttpProfileLookup {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpProfileLookup {
    /// Creates a lookup with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Creates a lookup from the `[profiles]` section
    ///
    /// Returns `Ok(None)` when no profile service is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &ProfileSettings) -> Result<Option<Self>, reqwest::Error> {
        settings
            .base_url
            .as_ref()
            .map(|url| Self::new(url.clone(), Duration::from_millis(settings.timeout_ms)))
            .transpose()
    }

    /// Profile service origin
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, user_id: i64) -> Result<ProfileSummary, String> {
        let response = self
            .http_client
            .get(format!("{}/users/{user_id}/profile", self.base_url))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse profile JSON: {e}"))
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    async fn lookup(&self, user_id: i64) -> ProfileLookupResult {
        match self.fetch(user_id).await {
            Ok(profile) => ProfileLookupResult::Found(profile),
            Err(reason) => {
                tracing::warn!(user_id, %reason, "profile lookup failed");
                ProfileLookupResult::Unavailable(reason)
            }
        }
    }
}
