// ABOUTME: Shared utility modules for the OAuth flow crate
// ABOUTME: HTTP client construction with OAuth-tuned timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Shared HTTP client utilities
pub mod http_client;
