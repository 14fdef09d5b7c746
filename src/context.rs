/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Abstractions to help writing unit tests: network, configuration.

use crate::request;
use anyhow::Context as _;
use std::sync::Arc;

/// The public server, used when the configuration doesn't name one.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// The outcome of one HTTP GET.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
}

/// Network interface.
pub trait Network: Send + Sync {
    /// Opens an URL using HTTP GET.
    fn urlopen(&self, url: &str) -> anyhow::Result<Response>;
}

/// The response format the server is asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    /// format=json
    #[default]
    Json,
    /// format=jsonv2, uses "category" instead of "class".
    JsonV2,
}

impl ApiFormat {
    /// Gets the value of the format= parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::Json => "json",
            ApiFormat::JsonV2 => "jsonv2",
        }
    }
}

/// Default search options as they appear in the configuration file.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IniDefaults {
    accept_language: Option<String>,
    bounded: Option<bool>,
    polygon_format: Option<request::PolygonFormat>,
    /// west, north, east, south
    viewbox: Option<[f64; 4]>,
}

/// Configuration of a client.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ini {
    #[serde(default = "default_base_url")]
    base_url: String,
    email: String,
    #[serde(default)]
    format: ApiFormat,
    #[serde(default = "default_user_agent")]
    user_agent: String,
    #[serde(default = "default_timeout")]
    timeout: u64,
    #[serde(default)]
    defaults: IniDefaults,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_user_agent() -> String {
    format!("nominatim-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    60
}

impl Ini {
    /// Creates a configuration for the public server.
    pub fn new(email: &str) -> anyhow::Result<Self> {
        Ini::with_base_url(DEFAULT_BASE_URL, email)
    }

    /// Creates a configuration for a custom server.
    pub fn with_base_url(base_url: &str, email: &str) -> anyhow::Result<Self> {
        let ini = Ini {
            base_url: base_url.into(),
            email: email.into(),
            format: ApiFormat::default(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            defaults: IniDefaults::default(),
        };
        ini.validate()?;
        Ok(ini)
    }

    /// Parses a TOML configuration.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let ini: Ini = toml::from_str(content).context("failed to parse the configuration")?;
        ini.validate()?;
        Ok(ini)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.email.trim().is_empty() {
            return Err(anyhow::anyhow!("email must not be empty"));
        }
        url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: '{}'", self.base_url))?;
        Ok(())
    }

    /// Gets the server URL, without a trailing slash.
    pub fn get_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Gets the contact email sent with each request.
    pub fn get_email(&self) -> &str {
        &self.email
    }

    /// Gets the format used for searches.
    pub fn get_format(&self) -> ApiFormat {
        self.format
    }

    /// Sets the format used for searches.
    pub fn set_format(&mut self, format: ApiFormat) {
        self.format = format;
    }

    /// Gets the User-Agent header value.
    pub fn get_user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Gets the HTTP timeout in seconds.
    pub fn get_timeout(&self) -> u64 {
        self.timeout
    }

    /// Builds the search defaults from the [defaults] table.
    pub fn get_search_options(&self) -> request::SearchOptions {
        let mut options = request::SearchOptions::new();
        if let Some(ref language) = self.defaults.accept_language {
            options.set_accept_language(language);
        }
        if let Some(bounded) = self.defaults.bounded {
            options.set_bounded(bounded);
        }
        if let Some(polygon_format) = self.defaults.polygon_format {
            options.set_polygon_format(polygon_format);
        }
        if let Some([west, north, east, south]) = self.defaults.viewbox {
            options.set_view_box(crate::model::BoundingBox::new(north, south, east, west));
        }
        options
    }
}

/// Configuration and I/O seams shared by all calls of a client.
#[derive(Clone)]
pub struct Context {
    ini: Ini,
    network: Arc<dyn Network>,
}

impl Context {
    /// Creates a new Context, backed by the real network.
    pub fn new(ini: Ini) -> Self {
        let network: Arc<dyn Network> = Arc::new(system::StdNetwork::new(
            ini.get_user_agent(),
            ini.get_timeout(),
        ));
        Context { ini, network }
    }

    /// Gets the configuration.
    pub fn get_ini(&self) -> &Ini {
        &self.ini
    }

    /// Gets the network implementation.
    pub fn get_network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    /// Sets the network implementation.
    pub fn set_network(&mut self, network: Arc<dyn Network>) {
        self.network = network;
    }
}

pub mod system;

#[cfg(test)]
pub mod tests;
