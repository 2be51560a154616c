// ABOUTME: Main library entry point for the Cafe24 multi-tenant OAuth flow crate
// ABOUTME: Coordinates authorization-code grants across subdomain-addressed storefronts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Cafe24 OAuth Flow
//!
//! Multi-tenant OAuth2 Authorization Code grant coordination for Cafe24
//! storefronts ("malls"). Every mall lives behind its own subdomain of the
//! provider API host, so both the authorization redirect and the token
//! exchange are addressed per tenant:
//! `https://{mall_id}.cafe24api.com/api/v2/oauth/...`.
//!
//! ## Components
//!
//! - [`oauth::AuthorizationRequestBuilder`] builds the tenant-scoped
//!   authorization URL, embedding a state token that carries a CSRF nonce
//!   together with the mall id.
//! - [`oauth::CallbackExchangeCoordinator`] validates the provider callback,
//!   recovers the mall id from the state token, exchanges the authorization
//!   code for tokens, and classifies every failure mode.
//!
//! Both components are stateless between invocations. Nonce bookkeeping and
//! token persistence live behind the [`oauth::NonceStore`] and
//! [`oauth::TokenStore`] traits so the service can run any number of
//! instances without coordination.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cafe24_oauth_flow::config::OAuthAppConfig;
//! use cafe24_oauth_flow::oauth::{
//!     AuthorizationRequestBuilder, CallbackExchangeCoordinator, MemoryNonceStore,
//!     MemoryTokenStore,
//! };
//!
//! # async fn run() -> Result<(), cafe24_oauth_flow::errors::OAuthFlowError> {
//! let config = Arc::new(OAuthAppConfig::from_env()?);
//! let nonces = Arc::new(MemoryNonceStore::new());
//! let tokens = Arc::new(MemoryTokenStore::new());
//!
//! let builder = AuthorizationRequestBuilder::new(config.clone(), nonces.clone());
//! let request = builder.begin("acmeshop").await?;
//! // redirect the merchant to request.url, then on callback:
//!
//! let coordinator = CallbackExchangeCoordinator::new(config, nonces, tokens);
//! let outcome = coordinator.handle_callback("code-from-provider", request.state.as_str()).await?;
//! println!("connected mall {}", outcome.mall_id);
//! # Ok(())
//! # }
//! ```

/// Process-wide OAuth application configuration loaded from the environment
pub mod config;

/// Provider endpoints, scope defaults, and tuning constants
pub mod constants;

/// Classified error taxonomy for the OAuth flow
pub mod errors;

/// Core value types shared across the flow
pub mod models;

/// Authorization URL building, callback handling, and collaborator contracts
pub mod oauth;

/// Shared HTTP client utilities
pub mod utils;
