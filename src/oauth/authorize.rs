// ABOUTME: Authorization URL construction for tenant-scoped OAuth requests
// ABOUTME: Builds the provider redirect embedding a verifiable state token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Authorization Request Builder
//!
//! Given a mall id, produces the provider authorization URL the merchant is
//! redirected to. The URL targets the mall's own subdomain and carries a
//! [`StateToken`] pairing the mall id with a single-use nonce, so the
//! callback can recover tenant identity without any in-process session.

use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::config::OAuthAppConfig;
use crate::constants::AUTHORIZE_PATH;
use crate::errors::OAuthFlowError;
use crate::models::MallId;
use crate::oauth::state::StateToken;
use crate::oauth::store::NonceStore;

/// Ephemeral authorization request produced by the builder
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Mall this request authorizes
    pub mall_id: MallId,
    /// Fully composed provider authorization URL to redirect to
    pub url: Url,
    /// State token embedded in the URL; decodes back to the mall id
    pub state: StateToken,
}

/// Builds tenant-scoped provider authorization URLs
pub struct AuthorizationRequestBuilder {
    config: Arc<OAuthAppConfig>,
    nonces: Arc<dyn NonceStore>,
}

impl AuthorizationRequestBuilder {
    /// Create a builder from process configuration and a nonce store
    #[must_use]
    pub fn new(config: Arc<OAuthAppConfig>, nonces: Arc<dyn NonceStore>) -> Self {
        Self { config, nonces }
    }

    /// Start an authorization attempt for a mall
    ///
    /// Issues a nonce through the nonce store, then builds the redirect URL.
    /// This is the only side effect in the builder; everything downstream of
    /// the nonce is a pure function of the inputs.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::InvalidTenant`] for an unusable mall id and
    /// [`OAuthFlowError::Storage`] when the nonce store is unavailable.
    pub async fn begin(&self, mall_id: &str) -> Result<AuthorizationRequest, OAuthFlowError> {
        let mall_id = MallId::new(mall_id)?;
        let nonce = self.nonces.issue(&mall_id).await?;
        let request = self.authorization_url(&mall_id, &nonce)?;
        info!(
            mall_id = %request.mall_id,
            "built authorization redirect for mall"
        );
        Ok(request)
    }

    /// Build the authorization URL for a mall with an already-issued nonce
    ///
    /// Pure function of the configuration, mall id, and nonce; no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::InvalidState`] when the nonce does not
    /// satisfy the state-token contract, or [`OAuthFlowError::Configuration`]
    /// when the configured API domain cannot form a valid URL.
    pub fn authorization_url(
        &self,
        mall_id: &MallId,
        nonce: &str,
    ) -> Result<AuthorizationRequest, OAuthFlowError> {
        let state = StateToken::encode(nonce, mall_id)?;

        let base = format!(
            "https://{}{AUTHORIZE_PATH}",
            mall_id.api_host(&self.config.api_domain)
        );
        let mut url = Url::parse(&base).map_err(|e| {
            OAuthFlowError::Configuration(format!("invalid authorization endpoint {base}: {e}"))
        })?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state.as_str())
            .append_pair("scope", &self.config.scope_string());

        Ok(AuthorizationRequest {
            mall_id: mall_id.clone(),
            url,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_API_DOMAIN, DEFAULT_SCOPES};
    use crate::oauth::store::MemoryNonceStore;
    use std::collections::HashMap;

    fn test_config() -> Arc<OAuthAppConfig> {
        Arc::new(OAuthAppConfig {
            client_id: "client-id-1".into(),
            client_secret: "topsecret".into(),
            redirect_uri: "https://app.example.com/api/callback".into(),
            api_domain: DEFAULT_API_DOMAIN.into(),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        })
    }

    fn builder() -> AuthorizationRequestBuilder {
        AuthorizationRequestBuilder::new(test_config(), Arc::new(MemoryNonceStore::new()))
    }

    #[test]
    fn test_url_targets_the_mall_subdomain() {
        let mall = MallId::new("acmeshop").unwrap();
        let nonce = StateToken::fresh_nonce();
        let request = builder().authorization_url(&mall, &nonce).unwrap();

        assert_eq!(request.url.scheme(), "https");
        assert_eq!(request.url.host_str(), Some("acmeshop.cafe24api.com"));
        assert_eq!(request.url.path(), "/api/v2/oauth/authorize");
    }

    #[test]
    fn test_url_carries_all_required_query_parameters() {
        let mall = MallId::new("acmeshop").unwrap();
        let nonce = StateToken::fresh_nonce();
        let request = builder().authorization_url(&mall, &nonce).unwrap();

        let params: HashMap<String, String> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-id-1");
        assert_eq!(params["redirect_uri"], "https://app.example.com/api/callback");
        assert_eq!(params["state"], request.state.as_str());
        assert!(params["scope"].starts_with("mall.read_application "));
    }

    #[test]
    fn test_state_in_url_decodes_back_to_the_mall() {
        let mall = MallId::new("acmeshop").unwrap();
        let nonce = StateToken::fresh_nonce();
        let request = builder().authorization_url(&mall, &nonce).unwrap();

        let (decoded_nonce, decoded_mall) = StateToken::decode(request.state.as_str()).unwrap();
        assert_eq!(decoded_nonce, nonce);
        assert_eq!(decoded_mall, mall);
    }

    #[tokio::test]
    async fn test_begin_rejects_invalid_mall_ids() {
        let builder = builder();
        assert!(matches!(
            builder.begin("").await,
            Err(OAuthFlowError::InvalidTenant(_))
        ));
        assert!(matches!(
            builder.begin("acme.shop").await,
            Err(OAuthFlowError::InvalidTenant(_))
        ));
    }

    #[tokio::test]
    async fn test_begin_issues_a_consumable_nonce() {
        let nonces = Arc::new(MemoryNonceStore::new());
        let builder = AuthorizationRequestBuilder::new(test_config(), nonces.clone());

        let request = builder.begin("acmeshop").await.unwrap();
        let (nonce, mall) = StateToken::decode(request.state.as_str()).unwrap();
        assert!(nonces.consume(&nonce, &mall).await.unwrap());
    }
}
