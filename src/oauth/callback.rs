// ABOUTME: Callback validation and authorization-code-for-token exchange
// ABOUTME: Classifies the provider's full error surface into typed failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Callback Exchange Coordinator
//!
//! Handles the provider redirect: validates `code` and `state`, recovers the
//! mall id from the state token, verifies the CSRF nonce against the nonce
//! store, exchanges the code at the mall's token endpoint, and persists the
//! issued tokens before returning.
//!
//! The provider reports OAuth errors (`invalid_grant`, `invalid_client`, ...)
//! in the response body, sometimes under HTTP 200, so classification inspects
//! the payload before trusting the status code. Authorization codes are
//! single-use; only a connect-phase transport failure, where the request
//! provably never left the process, is retried.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::OAuthAppConfig;
use crate::constants::{MAX_CONNECT_RETRIES, TOKEN_PATH};
use crate::errors::OAuthFlowError;
use crate::models::{MallId, TokenData};
use crate::oauth::state::StateToken;
use crate::oauth::store::{NonceStore, TokenStore};
use crate::utils::http_client::oauth_client;

/// Successful outcome of a callback exchange
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    /// Mall recovered from the state token
    pub mall_id: MallId,
    /// Normalized token material (already persisted via the token store)
    pub token: TokenData,
    /// Raw provider payload for fields this crate does not model
    pub raw: Value,
}

/// Coordinates callback validation and the code-for-token exchange
pub struct CallbackExchangeCoordinator {
    config: Arc<OAuthAppConfig>,
    nonces: Arc<dyn NonceStore>,
    tokens: Arc<dyn TokenStore>,
    http: reqwest::Client,
    endpoint_base: Option<String>,
}

impl CallbackExchangeCoordinator {
    /// Create a coordinator with the shared OAuth-tuned HTTP client
    #[must_use]
    pub fn new(
        config: Arc<OAuthAppConfig>,
        nonces: Arc<dyn NonceStore>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self::with_http_client(config, nonces, tokens, oauth_client().clone())
    }

    /// Create a coordinator with a custom HTTP client
    #[must_use]
    pub fn with_http_client(
        config: Arc<OAuthAppConfig>,
        nonces: Arc<dyn NonceStore>,
        tokens: Arc<dyn TokenStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            nonces,
            tokens,
            http,
            endpoint_base: None,
        }
    }

    /// Route all token requests to a fixed endpoint instead of the per-mall
    /// subdomain
    ///
    /// For local development against a stub provider; production deployments
    /// address each mall's own token endpoint.
    #[must_use]
    pub fn with_token_endpoint_base(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_base = Some(endpoint.into());
        self
    }

    /// Handle a provider callback
    ///
    /// Validation short-circuits before any network access. On success the
    /// token material has already been handed to the token store. The
    /// exchange itself runs in a spawned task, so a caller that drops this
    /// future (client disconnect) does not lose a completed exchange — the
    /// code is single-use and could not be replayed.
    ///
    /// # Errors
    ///
    /// Every failure mode maps to one [`OAuthFlowError`] kind:
    /// [`MissingParameters`](OAuthFlowError::MissingParameters),
    /// [`InvalidState`](OAuthFlowError::InvalidState),
    /// [`CsrfMismatch`](OAuthFlowError::CsrfMismatch),
    /// [`Transport`](OAuthFlowError::Transport),
    /// [`ProviderRejected`](OAuthFlowError::ProviderRejected),
    /// [`MalformedResponse`](OAuthFlowError::MalformedResponse), or
    /// [`Storage`](OAuthFlowError::Storage).
    pub async fn handle_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<CallbackOutcome, OAuthFlowError> {
        if code.is_empty() {
            return Err(OAuthFlowError::MissingParameters("code"));
        }
        if state.is_empty() {
            return Err(OAuthFlowError::MissingParameters("state"));
        }

        let (nonce, mall_id) = StateToken::decode(state)?;

        if !self.nonces.consume(&nonce, &mall_id).await? {
            warn!(mall_id = %mall_id, "rejecting callback with unverifiable nonce");
            return Err(OAuthFlowError::CsrfMismatch);
        }

        let endpoint = self.endpoint_for(&mall_id);
        let exchange = Self::exchange_and_store(
            self.config.clone(),
            self.http.clone(),
            self.tokens.clone(),
            endpoint,
            mall_id,
            code.to_owned(),
        );
        // Detached from this future: an abandoned-but-completed exchange
        // still reaches the token store.
        match tokio::spawn(exchange).await {
            Ok(result) => result,
            Err(err) => Err(OAuthFlowError::Transport(format!(
                "token exchange task did not complete: {err}"
            ))),
        }
    }

    /// Exchange a refresh token for fresh token material
    ///
    /// Renewal scheduling is the caller's policy; this is the single grant
    /// call. The result is persisted through the token store like a callback
    /// exchange.
    ///
    /// # Errors
    ///
    /// Classified the same way as the callback exchange.
    pub async fn refresh_token(
        &self,
        mall_id: &MallId,
        refresh_token: &str,
    ) -> Result<CallbackOutcome, OAuthFlowError> {
        if refresh_token.is_empty() {
            return Err(OAuthFlowError::MissingParameters("refresh_token"));
        }
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let endpoint = self.endpoint_for(mall_id);
        let (token, raw) =
            Self::post_token_request(&self.config, &self.http, &endpoint, mall_id, &params).await?;
        self.tokens.store(mall_id, &token).await?;
        info!(mall_id = %mall_id, "refreshed token material");
        Ok(CallbackOutcome {
            mall_id: mall_id.clone(),
            token,
            raw,
        })
    }

    /// Token endpoint for a mall under the configured provider domain
    #[must_use]
    pub fn token_endpoint(config: &OAuthAppConfig, mall_id: &MallId) -> String {
        format!(
            "https://{}{TOKEN_PATH}",
            mall_id.api_host(&config.api_domain)
        )
    }

    fn endpoint_for(&self, mall_id: &MallId) -> String {
        self.endpoint_base
            .clone()
            .unwrap_or_else(|| Self::token_endpoint(&self.config, mall_id))
    }

    async fn exchange_and_store(
        config: Arc<OAuthAppConfig>,
        http: reqwest::Client,
        tokens: Arc<dyn TokenStore>,
        endpoint: String,
        mall_id: MallId,
        code: String,
    ) -> Result<CallbackOutcome, OAuthFlowError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];
        let (token, raw) =
            Self::post_token_request(&config, &http, &endpoint, &mall_id, &params).await?;

        tokens.store(&mall_id, &token).await?;
        info!(mall_id = %mall_id, "authorization code exchange completed");

        Ok(CallbackOutcome {
            mall_id,
            token,
            raw,
        })
    }

    async fn post_token_request(
        config: &OAuthAppConfig,
        http: &reqwest::Client,
        endpoint: &str,
        mall_id: &MallId,
        params: &[(&str, &str)],
    ) -> Result<(TokenData, Value), OAuthFlowError> {
        let authorization = basic_authorization(&config.client_id, &config.client_secret);

        let mut attempt = 0;
        let response = loop {
            let sent = http
                .post(endpoint)
                .header(reqwest::header::AUTHORIZATION, authorization.as_str())
                .form(params)
                .send()
                .await;
            match sent {
                Ok(response) => break response,
                // A connect failure happens before anything reached the
                // provider, so one more attempt cannot double-spend the code.
                Err(err) if err.is_connect() && attempt < MAX_CONNECT_RETRIES => {
                    attempt += 1;
                    warn!(
                        mall_id = %mall_id,
                        attempt,
                        "connect failure before request was sent; retrying"
                    );
                }
                Err(err) => {
                    warn!(mall_id = %mall_id, error = %err, "token request failed in transport");
                    return Err(OAuthFlowError::Transport(err.to_string()));
                }
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| OAuthFlowError::Transport(err.to_string()))?;

        classify_token_response(status, &body).map_err(|err| {
            warn!(
                mall_id = %mall_id,
                kind = err.kind(),
                detail = %err,
                "token exchange did not produce a token"
            );
            err
        })
    }
}

/// Provider token payload, per the token endpoint contract
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: Option<String>,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

/// Classify a token endpoint response into token material or a typed failure
///
/// The payload is inspected before the status code: the provider reports
/// OAuth errors in the body even under HTTP 200.
fn classify_token_response(
    status: StatusCode,
    body: &str,
) -> Result<(TokenData, Value), OAuthFlowError> {
    let Ok(raw) = serde_json::from_str::<Value>(body) else {
        if status.is_success() {
            return Err(OAuthFlowError::MalformedResponse(
                "token endpoint returned non-JSON body".into(),
            ));
        }
        return Err(OAuthFlowError::ProviderRejected(format!(
            "token endpoint returned HTTP {status}"
        )));
    };

    if let Some(error) = raw.get("error").and_then(Value::as_str) {
        let message = raw
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or(error);
        return Err(OAuthFlowError::ProviderRejected(message.to_owned()));
    }

    if !status.is_success() {
        return Err(OAuthFlowError::ProviderRejected(format!(
            "token endpoint returned HTTP {status}"
        )));
    }

    match serde_json::from_value::<TokenResponse>(raw.clone()) {
        Ok(payload) if !payload.access_token.is_empty() => {
            let token = TokenData {
                access_token: payload.access_token,
                refresh_token: payload.refresh_token,
                token_type: payload.token_type,
                expires_at: TokenData::expiry_from_lifetime(payload.expires_in),
                scope: payload.scope,
            };
            Ok((token, raw))
        }
        Ok(_) => Err(OAuthFlowError::MalformedResponse(
            "access_token is empty".into(),
        )),
        Err(err) => Err(OAuthFlowError::MalformedResponse(format!(
            "token payload missing required field: {err}"
        ))),
    }
}

/// Compose the `Authorization: Basic ...` header value for the token endpoint
fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}
