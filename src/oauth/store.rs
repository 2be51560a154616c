// ABOUTME: Collaborator contracts for nonce verification and token persistence
// ABOUTME: In-memory reference implementations with TTL-based nonce expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Nonce and Token Stores
//!
//! The flow itself is stateless; everything that must outlive a single
//! request lives behind these traits. Production deployments back them with
//! a shared store (database, Redis) so any instance can verify a nonce
//! issued by any other. [`MemoryNonceStore`] and [`MemoryTokenStore`] are
//! single-process reference implementations used in tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::constants::STATE_TTL_MINUTES;
use crate::errors::OAuthFlowError;
use crate::models::{MallId, TokenData};
use crate::oauth::state::StateToken;

/// Issues and verifies single-use CSRF nonces
#[async_trait]
pub trait NonceStore: Send + Sync {
    /// Issue a fresh nonce bound to a mall id
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::Storage`] when the backing store is
    /// unavailable.
    async fn issue(&self, mall_id: &MallId) -> Result<String, OAuthFlowError>;

    /// Consume a nonce, returning whether it was valid for this mall
    ///
    /// A nonce is valid at most once; a second consume of the same value
    /// must return `false`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::Storage`] when the backing store is
    /// unavailable.
    async fn consume(&self, nonce: &str, mall_id: &MallId) -> Result<bool, OAuthFlowError>;
}

/// Persists issued token material per mall
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store the token material for a mall, replacing any previous entry
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::Storage`] when persistence fails.
    async fn store(&self, mall_id: &MallId, token: &TokenData) -> Result<(), OAuthFlowError>;
}

/// Pending nonce entry with expiry bookkeeping
#[derive(Debug, Clone)]
struct NonceEntry {
    mall_id: MallId,
    expires_at: DateTime<Utc>,
}

/// In-memory nonce store with TTL expiry
///
/// Suitable for a single-instance deployment or tests. Entries expire after
/// [`STATE_TTL_MINUTES`]; expired entries are swept opportunistically on
/// every issue.
#[derive(Debug, Default)]
pub struct MemoryNonceStore {
    pending: RwLock<HashMap<String, NonceEntry>>,
}

impl MemoryNonceStore {
    /// Create an empty nonce store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nonces currently pending (test observability)
    pub async fn pending_len(&self) -> usize {
        self.pending.read().await.len()
    }
}

#[async_trait]
impl NonceStore for MemoryNonceStore {
    async fn issue(&self, mall_id: &MallId) -> Result<String, OAuthFlowError> {
        let nonce = StateToken::fresh_nonce();
        let now = Utc::now();
        let mut pending = self.pending.write().await;
        pending.retain(|_, entry| entry.expires_at > now);
        pending.insert(
            nonce.clone(),
            NonceEntry {
                mall_id: mall_id.clone(),
                expires_at: now + Duration::minutes(STATE_TTL_MINUTES),
            },
        );
        debug!(mall_id = %mall_id, "issued authorization nonce");
        Ok(nonce)
    }

    async fn consume(&self, nonce: &str, mall_id: &MallId) -> Result<bool, OAuthFlowError> {
        let mut pending = self.pending.write().await;
        let Some(entry) = pending.remove(nonce) else {
            warn!(mall_id = %mall_id, "nonce not found or already consumed");
            return Ok(false);
        };
        if entry.expires_at <= Utc::now() {
            warn!(mall_id = %mall_id, "nonce expired before callback arrived");
            return Ok(false);
        }
        if entry.mall_id != *mall_id {
            warn!(
                expected = %entry.mall_id,
                got = %mall_id,
                "nonce was issued for a different mall"
            );
            return Ok(false);
        }
        Ok(true)
    }
}

/// In-memory token store keyed by mall id
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<MallId, TokenData>>,
}

impl MemoryTokenStore {
    /// Create an empty token store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the stored token for a mall, if any
    pub async fn get(&self, mall_id: &MallId) -> Option<TokenData> {
        self.tokens.read().await.get(mall_id).cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, mall_id: &MallId, token: &TokenData) -> Result<(), OAuthFlowError> {
        self.tokens
            .write()
            .await
            .insert(mall_id.clone(), token.clone());
        debug!(mall_id = %mall_id, "stored token material");
        Ok(())
    }
}
