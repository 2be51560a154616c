// ABOUTME: Provider endpoint paths, scope defaults, and flow tuning constants
// ABOUTME: Centralizes Cafe24 OAuth values to eliminate hardcoded strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Cafe24 OAuth constants
//!
//! Endpoint paths are fixed by the provider API. Scope order is fixed per
//! deployment so authorization URLs are reproducible across instances.

/// Default provider API domain; each mall is a subdomain of this host
pub const DEFAULT_API_DOMAIN: &str = "cafe24api.com";

/// Authorization endpoint path under the mall subdomain
pub const AUTHORIZE_PATH: &str = "/api/v2/oauth/authorize";

/// Token endpoint path under the mall subdomain
pub const TOKEN_PATH: &str = "/api/v2/oauth/token";

/// Default scopes requested during authorization, in fixed deployment order
pub const DEFAULT_SCOPES: &[&str] = &[
    "mall.read_application",
    "mall.write_application",
    "mall.read_category",
    "mall.write_category",
    "mall.read_product",
    "mall.write_product",
    "mall.read_collection",
    "mall.write_collection",
    "mall.read_order",
    "mall.write_order",
    "mall.read_customer",
    "mall.write_customer",
    "mall.read_store",
    "mall.write_store",
    "mall.read_shipping",
    "mall.write_shipping",
];

/// Length of the state nonce in characters (UUIDv4 simple form, lowercase hex)
pub const STATE_NONCE_LEN: usize = 32;

/// Separator between the fixed-width nonce and the mall id in a state token
pub const STATE_SEPARATOR: char = '.';

/// How long an issued nonce stays valid before the callback must arrive
pub const STATE_TTL_MINUTES: i64 = 10;

/// Request timeout for token exchange calls, in seconds
pub const OAUTH_REQUEST_TIMEOUT_SECS: u64 = 8;

/// Connect timeout for token exchange calls, in seconds
pub const OAUTH_CONNECT_TIMEOUT_SECS: u64 = 4;

/// Extra attempts allowed when the token request fails before reaching
/// the provider. Codes are single-use, so anything past the connect phase
/// is never retried.
pub const MAX_CONNECT_RETRIES: u32 = 1;

/// Environment variable names for process configuration
pub mod env_vars {
    /// OAuth client ID issued by the Cafe24 developer center
    pub const CLIENT_ID: &str = "CAFE24_CLIENT_ID";
    /// OAuth client secret issued by the Cafe24 developer center
    pub const CLIENT_SECRET: &str = "CAFE24_CLIENT_SECRET";
    /// Redirect URI registered with the provider; must match exactly
    pub const REDIRECT_URI: &str = "CAFE24_REDIRECT_URI";
    /// Override for the provider API domain
    pub const API_DOMAIN: &str = "CAFE24_API_DOMAIN";
    /// Comma-separated scope override
    pub const SCOPES: &str = "CAFE24_SCOPES";
}
