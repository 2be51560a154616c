// ABOUTME: OAuth application configuration loaded once from the environment
// ABOUTME: Client credentials, redirect URI, provider domain, and scope set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Application Configuration
//!
//! Credentials and deployment-fixed values are read from the process
//! environment exactly once at startup and passed to both flow components by
//! construction. Nothing re-reads the environment per request.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;
use tracing::{info, warn};

use crate::constants::{env_vars, DEFAULT_API_DOMAIN, DEFAULT_SCOPES};
use crate::errors::OAuthFlowError;

/// Process-wide OAuth application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthAppConfig {
    /// OAuth client ID from the provider developer center
    pub client_id: String,
    /// OAuth client secret from the provider developer center
    pub client_secret: String,
    /// Redirect URI registered with the provider; must match exactly
    pub redirect_uri: String,
    /// Provider API domain; each mall is a subdomain of this host
    pub api_domain: String,
    /// Scopes requested during authorization, in fixed deployment order
    pub scopes: Vec<String>,
}

impl OAuthAppConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::Configuration`] when a required variable is
    /// missing or empty.
    pub fn from_env() -> Result<Self, OAuthFlowError> {
        let config = Self {
            client_id: require_env(env_vars::CLIENT_ID)?,
            client_secret: require_env(env_vars::CLIENT_SECRET)?,
            redirect_uri: require_env(env_vars::REDIRECT_URI)?,
            api_domain: env::var(env_vars::API_DOMAIN)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_DOMAIN.to_owned()),
            scopes: scopes_from_env(),
        };
        config.validate_and_log();
        Ok(config)
    }

    /// Scopes as the space-separated string sent to the provider
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Compute SHA256 fingerprint of the client secret (first 8 hex chars)
    ///
    /// Lets deployments compare secrets across environments without ever
    /// logging the actual value.
    #[must_use]
    pub fn secret_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.client_secret.as_bytes());
        let digest = hasher.finalize();
        format!("{digest:x}").chars().take(8).collect()
    }

    /// Log configuration diagnostics without exposing secrets
    fn validate_and_log(&self) {
        info!(
            client_id = %self.client_id,
            secret_fingerprint = %self.secret_fingerprint(),
            api_domain = %self.api_domain,
            scope_count = self.scopes.len(),
            "loaded OAuth application configuration"
        );
        if !self.redirect_uri.starts_with("https://") {
            warn!(
                redirect_uri = %self.redirect_uri,
                "redirect URI is not https; the provider will reject it outside local development"
            );
        }
        if self.scopes.is_empty() {
            warn!("no OAuth scopes configured; the provider will grant nothing");
        }
    }
}

fn require_env(name: &'static str) -> Result<String, OAuthFlowError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OAuthFlowError::Configuration(format!("{name} is not set")))
}

fn scopes_from_env() -> Vec<String> {
    env::var(env_vars::SCOPES)
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(
            || DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthAppConfig {
        OAuthAppConfig {
            client_id: "client-id-1".into(),
            client_secret: "topsecret".into(),
            redirect_uri: "https://app.example.com/api/callback".into(),
            api_domain: DEFAULT_API_DOMAIN.into(),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_scope_string_preserves_deployment_order() {
        let config = test_config();
        let joined = config.scope_string();
        assert!(joined.starts_with("mall.read_application mall.write_application"));
        assert!(joined.ends_with("mall.read_shipping mall.write_shipping"));
    }

    #[test]
    fn test_secret_fingerprint_is_stable_and_short() {
        let config = test_config();
        assert_eq!(config.secret_fingerprint().len(), 8);
        assert_eq!(config.secret_fingerprint(), config.secret_fingerprint());
        assert!(!config.secret_fingerprint().contains("topsecret"));
    }
}
