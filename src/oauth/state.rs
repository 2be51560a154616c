// ABOUTME: State token encoding pairing a CSRF nonce with a mall id
// ABOUTME: Fixed-width nonce makes the split point positional, never a delimiter search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # State Token
//!
//! The `state` round-trip value sent to the provider carries two fields: a
//! random nonce and the mall id, as `{nonce}.{mall_id}`. The nonce is always
//! exactly [`STATE_NONCE_LEN`] lowercase hex characters (a UUIDv4 in simple
//! form), so decoding splits at a fixed position. Splitting on the separator
//! and taking the last segment would misparse whenever the mall id itself is
//! ever allowed to contain the separator; positional splitting holds for any
//! mall id content.

use std::fmt;
use uuid::Uuid;

use crate::constants::{STATE_NONCE_LEN, STATE_SEPARATOR};
use crate::errors::OAuthFlowError;
use crate::models::MallId;

/// Opaque round-trip value carrying the CSRF nonce and the mall id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateToken(String);

impl StateToken {
    /// Encode a nonce and mall id into a state token
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::InvalidState`] when the nonce is not
    /// exactly [`STATE_NONCE_LEN`] lowercase hex characters. Nonces from
    /// [`Self::fresh_nonce`] and the nonce store always satisfy this.
    pub fn encode(nonce: &str, mall_id: &MallId) -> Result<Self, OAuthFlowError> {
        if !is_well_formed_nonce(nonce) {
            return Err(OAuthFlowError::InvalidState);
        }
        Ok(Self(format!(
            "{nonce}{STATE_SEPARATOR}{}",
            mall_id.as_str()
        )))
    }

    /// Decode a raw state parameter back into its nonce and mall id
    ///
    /// # Errors
    ///
    /// Returns [`OAuthFlowError::InvalidState`] when the value does not
    /// conform to the encoding: wrong length, malformed nonce, missing
    /// separator, or a mall id that fails host-label validation.
    pub fn decode(raw: &str) -> Result<(String, MallId), OAuthFlowError> {
        // Nonce, separator, and at least one mall id character. The ASCII
        // check also keeps the positional split on a char boundary.
        if !raw.is_ascii() || raw.len() < STATE_NONCE_LEN + 2 {
            return Err(OAuthFlowError::InvalidState);
        }
        let (nonce, rest) = raw.split_at(STATE_NONCE_LEN);
        if !is_well_formed_nonce(nonce) {
            return Err(OAuthFlowError::InvalidState);
        }
        let mut rest_chars = rest.chars();
        if rest_chars.next() != Some(STATE_SEPARATOR) {
            return Err(OAuthFlowError::InvalidState);
        }
        let mall_id =
            MallId::new(rest_chars.as_str()).map_err(|_| OAuthFlowError::InvalidState)?;
        Ok((nonce.to_owned(), mall_id))
    }

    /// Generate a fresh fixed-width nonce
    #[must_use]
    pub fn fresh_nonce() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// The encoded token as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_well_formed_nonce(nonce: &str) -> bool {
    nonce.len() == STATE_NONCE_LEN
        && nonce
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_nonce_is_fixed_width_hex() {
        for _ in 0..32 {
            let nonce = StateToken::fresh_nonce();
            assert!(is_well_formed_nonce(&nonce), "bad nonce: {nonce}");
        }
    }

    #[test]
    fn test_round_trip_recovers_exact_fields() {
        let mall = MallId::new("acmeshop").unwrap();
        let nonce = StateToken::fresh_nonce();
        let token = StateToken::encode(&nonce, &mall).unwrap();
        let (decoded_nonce, decoded_mall) = StateToken::decode(token.as_str()).unwrap();
        assert_eq!(decoded_nonce, nonce);
        assert_eq!(decoded_mall, mall);
    }

    #[test]
    fn test_round_trip_survives_separator_like_mall_content() {
        // Hyphens are the only separator-adjacent character a host label
        // allows; a nonce made purely of hex digits can still end in one of
        // the mall's own leading characters, which breaks greedy splitting.
        let mall = MallId::new("abc-def-0").unwrap();
        let nonce = "0123456789abcdef0123456789abcdef".to_owned();
        let token = StateToken::encode(&nonce, &mall).unwrap();
        let (decoded_nonce, decoded_mall) = StateToken::decode(token.as_str()).unwrap();
        assert_eq!(decoded_nonce, nonce);
        assert_eq!(decoded_mall.as_str(), "abc-def-0");
    }

    #[test]
    fn test_decode_rejects_malformed_values() {
        assert!(StateToken::decode("").is_err());
        assert!(StateToken::decode("short.acmeshop").is_err());
        // Nonce with uppercase hex is not part of the contract.
        assert!(
            StateToken::decode("0123456789ABCDEF0123456789ABCDEF.acmeshop").is_err()
        );
        // Missing separator at the expected position.
        assert!(
            StateToken::decode("0123456789abcdef0123456789abcdefXacmeshop").is_err()
        );
        // Empty mall id after the separator.
        assert!(StateToken::decode("0123456789abcdef0123456789abcdef.").is_err());
        // Mall id with host-unsafe characters.
        assert!(
            StateToken::decode("0123456789abcdef0123456789abcdef.acme.shop/x").is_err()
        );
    }

    #[test]
    fn test_encode_rejects_foreign_nonce() {
        let mall = MallId::new("acmeshop").unwrap();
        assert!(StateToken::encode("tooshort", &mall).is_err());
        assert!(StateToken::encode(
            "ZZZZ456789abcdef0123456789abcdef",
            &mall
        )
        .is_err());
    }
}
