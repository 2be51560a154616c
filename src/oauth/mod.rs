// ABOUTME: OAuth module organizing the multi-tenant authorization-code flow
// ABOUTME: State tokens, authorization URLs, callback exchange, collaborator traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # OAuth Flow Module
//!
//! The flow is two components composed in a strict request/response pipeline:
//!
//! 1. [`AuthorizationRequestBuilder`] turns a mall id into a provider
//!    authorization URL carrying a verifiable [`StateToken`].
//! 2. The provider redirects the merchant back with `code` and `state`;
//!    [`CallbackExchangeCoordinator`] validates both, recovers the mall id,
//!    exchanges the code at the mall's token endpoint, and persists the
//!    result through [`TokenStore`].
//!
//! Nonce issuance and verification live behind [`NonceStore`] so multiple
//! service instances can share one store without in-process session state.

pub mod authorize;
pub mod callback;
pub mod state;
pub mod store;

pub use authorize::{AuthorizationRequest, AuthorizationRequestBuilder};
pub use callback::{CallbackExchangeCoordinator, CallbackOutcome};
pub use state::StateToken;
pub use store::{MemoryNonceStore, MemoryTokenStore, NonceStore, TokenStore};

pub use crate::models::{MallId, TokenData};
