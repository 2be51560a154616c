// ABOUTME: Classified error taxonomy for the multi-tenant OAuth flow
// ABOUTME: Maps every failure kind to a distinct user message and HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # OAuth Flow Errors
//!
//! Every failure in the authorization and callback pipeline is surfaced as a
//! classified [`OAuthFlowError`] — never silently swallowed. Only
//! [`OAuthFlowError::Transport`] is a retry candidate, and only when the
//! request provably never reached the provider; every other kind is terminal
//! for that callback attempt because authorization codes are single-use.

use thiserror::Error;

/// Classified errors for the OAuth authorization and callback pipeline
#[derive(Debug, Error)]
pub enum OAuthFlowError {
    /// Mall id is empty or not a valid URL host label
    #[error("invalid mall id: {0:?}")]
    InvalidTenant(String),

    /// Callback arrived without a required query parameter
    #[error("missing callback parameter: {0}")]
    MissingParameters(&'static str),

    /// State parameter does not conform to the state-token encoding
    #[error("state parameter is malformed")]
    InvalidState,

    /// State nonce was never issued by this deployment or was already consumed
    #[error("state nonce failed verification")]
    CsrfMismatch,

    /// The token endpoint could not be reached or timed out
    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    /// The provider answered but refused the exchange (e.g. invalid_grant)
    #[error("provider rejected token exchange: {0}")]
    ProviderRejected(String),

    /// The provider answered success but the payload is missing token material
    #[error("provider returned malformed token payload: {0}")]
    MalformedResponse(String),

    /// Process configuration is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The token store collaborator failed to persist an issued token
    #[error("token store error: {0}")]
    Storage(String),
}

impl OAuthFlowError {
    /// Stable identifier for logs and structured responses
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTenant(_) => "invalid_tenant",
            Self::MissingParameters(_) => "missing_parameters",
            Self::InvalidState => "invalid_state",
            Self::CsrfMismatch => "csrf_mismatch",
            Self::Transport(_) => "transport_error",
            Self::ProviderRejected(_) => "provider_rejected",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Configuration(_) => "configuration_error",
            Self::Storage(_) => "storage_error",
        }
    }

    /// Human-readable message safe to show to end users
    ///
    /// Provider-internal error text stays in the logs; this is what a
    /// merchant sees on the failure page.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidTenant(_) => "The shop identifier is missing or invalid",
            Self::MissingParameters(_) => {
                "The authorization callback is missing required parameters"
            }
            Self::InvalidState => "The authorization state could not be verified",
            Self::CsrfMismatch => "This authorization attempt is no longer valid",
            Self::Transport(_) => "The shop platform could not be reached. Please try again",
            Self::ProviderRejected(_) => "The shop platform declined the authorization",
            Self::MalformedResponse(_) => "The shop platform returned an unexpected response",
            Self::Configuration(_) => "The application is not configured correctly",
            Self::Storage(_) => "The issued credentials could not be saved",
        }
    }

    /// HTTP status code a rendering layer should use for this failure
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidTenant(_) | Self::MissingParameters(_) | Self::InvalidState => 400,
            Self::CsrfMismatch => 403,
            Self::Transport(_) => 502,
            Self::ProviderRejected(_) => 422,
            Self::MalformedResponse(_) => 502,
            Self::Configuration(_) | Self::Storage(_) => 500,
        }
    }

    /// Whether a bounded retry of the same attempt can ever be sound
    ///
    /// True only for transport failures; the caller must additionally know
    /// the request never left the process (the coordinator already retries
    /// connect-phase failures internally).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for the OAuth flow
pub type OAuthFlowResult<T> = Result<T, OAuthFlowError>;
