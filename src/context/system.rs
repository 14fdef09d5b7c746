/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Trait implementations using the real network.

use super::*;
use isahc::ReadResponseExt as _;
use isahc::RequestExt as _;
use isahc::config::Configurable as _;
use std::time::Duration;

/// Network implementation, backed by a real HTTP library.
pub struct StdNetwork {
    user_agent: String,
    timeout: Duration,
}

impl StdNetwork {
    /// Creates a new StdNetwork.
    pub fn new(user_agent: &str, timeout: u64) -> Self {
        StdNetwork {
            user_agent: user_agent.into(),
            timeout: Duration::from_secs(timeout),
        }
    }
}

// Real network is intentionally mocked.
impl Network for StdNetwork {
    fn urlopen(&self, url: &str) -> anyhow::Result<Response> {
        let mut buf = isahc::Request::get(url)
            .header("User-Agent", self.user_agent.as_str())
            .redirect_policy(isahc::config::RedirectPolicy::Limit(1))
            .timeout(self.timeout)
            .body(())?
            .send()
            .with_context(|| format!("failed to send GET {url}"))?;
        let status = buf.status().as_u16();
        let body = buf
            .text()
            .with_context(|| format!("failed to read the body of GET {url}"))?;
        Ok(Response { status, body })
    }
}
