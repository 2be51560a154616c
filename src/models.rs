// ABOUTME: Core value types for the multi-tenant OAuth flow
// ABOUTME: Mall identifiers and issued token material shared across components
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Flow Value Types
//!
//! [`MallId`] identifies one storefront and composes the tenant API host.
//! [`TokenData`] is the normalized token material handed to the token store.
//! Both are plain value types with no lifetime beyond a single authorization
//! attempt.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::OAuthFlowError;

/// Identifier of one storefront in the multi-tenant platform
///
/// The mall id becomes the leftmost DNS label of the provider API host
/// (`https://{mall_id}.cafe24api.com`), so construction enforces host-label
/// safety: non-empty ASCII alphanumerics with interior hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MallId(String);

impl MallId {
    /// Validate and wrap a mall id
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::InvalidTenant`] when the id is empty,
    /// contains characters outside `[A-Za-z0-9-]`, or starts or ends with
    /// a hyphen.
    pub fn new(raw: impl Into<String>) -> Result<Self, OAuthFlowError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(OAuthFlowError::InvalidTenant(raw));
        }
        let host_safe = raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
        if !host_safe || raw.starts_with('-') || raw.ends_with('-') {
            return Err(OAuthFlowError::InvalidTenant(raw));
        }
        Ok(Self(raw))
    }

    /// The mall id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hostname of this mall's API endpoint under the given provider domain
    #[must_use]
    pub fn api_host(&self, api_domain: &str) -> String {
        format!("{}.{}", self.0, api_domain)
    }
}

impl fmt::Display for MallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized token material issued by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    /// The access token string
    pub access_token: String,
    /// Refresh token, when the provider issued one
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: Option<String>,
    /// Expiration timestamp computed from `expires_in` at receipt time
    pub expires_at: Option<DateTime<Utc>>,
    /// Space-separated granted scopes as reported by the provider
    pub scope: Option<String>,
}

impl TokenData {
    /// Compute the expiry timestamp from a provider-reported lifetime
    ///
    /// A lifetime outside the representable range yields `None` instead of
    /// a bogus timestamp; the raw payload still carries the original value.
    #[must_use]
    pub fn expiry_from_lifetime(expires_in: Option<i64>) -> Option<DateTime<Utc>> {
        let lifetime = Duration::try_seconds(expires_in?)?;
        Utc::now().checked_add_signed(lifetime)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mall_id_accepts_host_safe_labels() {
        assert!(MallId::new("acmeshop").is_ok());
        assert!(MallId::new("acme-shop-2").is_ok());
        assert!(MallId::new("A1").is_ok());
    }

    #[test]
    fn test_mall_id_rejects_unsafe_input() {
        assert!(MallId::new("").is_err());
        assert!(MallId::new("acme.shop").is_err());
        assert!(MallId::new("acme shop").is_err());
        assert!(MallId::new("-acme").is_err());
        assert!(MallId::new("acme-").is_err());
        assert!(MallId::new("acme/../evil").is_err());
    }

    #[test]
    fn test_api_host_composition() {
        let mall = MallId::new("acmeshop").unwrap();
        assert_eq!(mall.api_host("cafe24api.com"), "acmeshop.cafe24api.com");
    }

    #[test]
    fn test_token_expiry_from_lifetime() {
        let expires_at = TokenData::expiry_from_lifetime(Some(7200)).unwrap();
        let delta = expires_at - Utc::now();
        assert!(delta > Duration::seconds(7100) && delta <= Duration::seconds(7200));
        assert!(TokenData::expiry_from_lifetime(None).is_none());
    }

    #[test]
    fn test_expiry_from_out_of_range_lifetime_is_none() {
        // Provider payloads are attacker-influenced; an absurd lifetime must
        // not panic the exchange.
        assert!(TokenData::expiry_from_lifetime(Some(i64::MAX)).is_none());
        assert!(TokenData::expiry_from_lifetime(Some(i64::MIN)).is_none());
    }
}
