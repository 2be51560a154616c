// ABOUTME: Integration tests for environment-backed configuration loading
// ABOUTME: Validates required variables, defaults, and scope overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use cafe24_oauth_flow::config::OAuthAppConfig;
use cafe24_oauth_flow::constants::{env_vars, DEFAULT_API_DOMAIN, DEFAULT_SCOPES};
use cafe24_oauth_flow::errors::OAuthFlowError;
use serial_test::serial;
use std::env;

fn set_required_vars() {
    env::set_var(env_vars::CLIENT_ID, "test-client-id");
    env::set_var(env_vars::CLIENT_SECRET, "test-client-secret");
    env::set_var(env_vars::REDIRECT_URI, "https://auth.example.com/api/callback");
}

fn clear_all_vars() {
    for name in [
        env_vars::CLIENT_ID,
        env_vars::CLIENT_SECRET,
        env_vars::REDIRECT_URI,
        env_vars::API_DOMAIN,
        env_vars::SCOPES,
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_all_vars();
    set_required_vars();

    let config = OAuthAppConfig::from_env().unwrap();
    assert_eq!(config.client_id, "test-client-id");
    assert_eq!(config.api_domain, DEFAULT_API_DOMAIN);
    assert_eq!(config.scopes.len(), DEFAULT_SCOPES.len());

    clear_all_vars();
}

#[test]
#[serial]
fn test_from_env_fails_without_client_secret() {
    clear_all_vars();
    env::set_var(env_vars::CLIENT_ID, "test-client-id");
    env::set_var(env_vars::REDIRECT_URI, "https://auth.example.com/api/callback");

    let err = OAuthAppConfig::from_env().unwrap_err();
    match err {
        OAuthFlowError::Configuration(message) => {
            assert!(message.contains(env_vars::CLIENT_SECRET));
        }
        other => panic!("expected Configuration error, got {other:?}"),
    }

    clear_all_vars();
}

#[test]
#[serial]
fn test_from_env_honors_overrides() {
    clear_all_vars();
    set_required_vars();
    env::set_var(env_vars::API_DOMAIN, "cafe24api.example.net");
    env::set_var(env_vars::SCOPES, "mall.read_product, mall.read_order");

    let config = OAuthAppConfig::from_env().unwrap();
    assert_eq!(config.api_domain, "cafe24api.example.net");
    assert_eq!(
        config.scopes,
        vec!["mall.read_product".to_owned(), "mall.read_order".to_owned()]
    );
    assert_eq!(config.scope_string(), "mall.read_product mall.read_order");

    clear_all_vars();
}
