// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides a singleton OAuth client to eliminate redundant client creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use crate::constants::{OAUTH_CONNECT_TIMEOUT_SECS, OAUTH_REQUEST_TIMEOUT_SECS};

/// Global shared HTTP client for OAuth token exchanges
static OAUTH_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client tuned for OAuth flows
///
/// Token exchanges are fast operations; timeouts are bounded in the
/// single-digit-second range so a stalled provider resolves as a transport
/// failure instead of hanging the callback.
pub fn oauth_client() -> &'static Client {
    OAUTH_CLIENT.get_or_init(|| {
        create_client_with_timeout(OAUTH_REQUEST_TIMEOUT_SECS, OAUTH_CONNECT_TIMEOUT_SECS)
    })
}

/// Create a new HTTP client with custom timeout settings
///
/// Use this when a deployment needs timeouts that differ from the shared
/// OAuth client defaults.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
