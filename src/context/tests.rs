/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the context module.

use super::*;
use crate::query_string::QueryString as _;
use std::sync::Mutex;

/// Creates a Context instance for test purposes, with no network routes.
pub fn make_test_context() -> anyhow::Result<Context> {
    let ini = Ini::new("test@example.com")?;
    let mut ctx = Context::new(ini);
    let network = TestNetwork::new(&[]);
    let network_arc: Arc<dyn Network> = Arc::new(network);
    ctx.set_network(network_arc);
    Ok(ctx)
}

/// Contains info about how to patch out one URL.
#[derive(Clone)]
pub struct URLRoute {
    /// The request URL
    url: String,
    /// Path of expected result data
    result_path: String,
    /// HTTP status of the result
    status: u16,
}

impl URLRoute {
    /// Creates a new URLRoute, answering with 200 OK.
    pub fn new(url: &str, result_path: &str) -> Self {
        URLRoute {
            url: url.into(),
            result_path: result_path.into(),
            status: 200,
        }
    }

    /// Sets a custom HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Network implementation, for test purposes.
pub struct TestNetwork {
    routes: Mutex<Vec<URLRoute>>,
}

impl TestNetwork {
    /// Creates a new TestNetwork.
    pub fn new(routes: &[URLRoute]) -> Self {
        let routes = Mutex::new(routes.to_vec());
        TestNetwork { routes }
    }

    /// Shorthand for new() + cast to trait.
    pub fn from_routes(routes: &[URLRoute]) -> Arc<dyn Network> {
        let network_arc: Arc<dyn Network> = Arc::new(TestNetwork::new(routes));
        network_arc
    }
}

impl Network for TestNetwork {
    fn urlopen(&self, url: &str) -> anyhow::Result<Response> {
        let mut locked_routes = self.routes.lock().unwrap();
        let index = match locked_routes.iter().position(|route| route.url == url) {
            Some(value) => value,
            None => {
                return Err(anyhow::anyhow!("url missing from route list: '{}'", url));
            }
        };
        // Allow specifying multiple results for the same URL.
        let route = locked_routes.remove(index);
        if route.result_path.is_empty() {
            return Err(anyhow::anyhow!("empty result_path for url '{}'", url));
        }
        let body = std::fs::read_to_string(&route.result_path)?;
        Ok(Response {
            status: route.status,
            body,
        })
    }
}

/// Tests Ini::new().
#[test]
fn test_ini_new() {
    let ini = Ini::new("test@example.com").unwrap();

    assert_eq!(ini.get_base_url(), "https://nominatim.openstreetmap.org");
    assert_eq!(ini.get_email(), "test@example.com");
    assert_eq!(ini.get_format(), ApiFormat::Json);
    assert_eq!(ini.get_timeout(), 60);
    assert_eq!(ini.get_user_agent().starts_with("nominatim-client/"), true);
}

/// Tests Ini::new(): the email is mandatory.
#[test]
fn test_ini_new_empty_email() {
    let ret = Ini::new(" ");

    assert_eq!(ret.is_err(), true);
}

/// Tests Ini::with_base_url(): trailing slash is dropped, invalid URLs are rejected.
#[test]
fn test_ini_with_base_url() {
    let ini = Ini::with_base_url("http://localhost:8080/", "me@example.com").unwrap();
    assert_eq!(ini.get_base_url(), "http://localhost:8080");

    let ret = Ini::with_base_url("not a url", "me@example.com");
    assert_eq!(ret.is_err(), true);
}

/// Tests Ini::from_toml().
#[test]
fn test_ini_from_toml() {
    let content = r#"
base_url = "https://nominatim.example.com/"
email = "me@example.com"
format = "jsonv2"
user_agent = "myapp/1.0"
timeout = 10

[defaults]
accept_language = "fr"
bounded = true
polygon_format = "geojson"
viewbox = [-1.5, 48.2, -1.1, 48.0]
"#;

    let ini = Ini::from_toml(content).unwrap();

    assert_eq!(ini.get_base_url(), "https://nominatim.example.com");
    assert_eq!(ini.get_format(), ApiFormat::JsonV2);
    assert_eq!(ini.get_user_agent(), "myapp/1.0");
    assert_eq!(ini.get_timeout(), 10);
    let mut search = request::SearchRequest::new();
    search.set_query("rennes");
    ini.get_search_options().merge_to(&mut search);
    assert_eq!(
        search.to_query_string().unwrap(),
        "q=rennes&accept-language=fr&viewbox=-1.50000000000000,48.20000000000000,-1.10000000000000,48.00000000000000&bounded=1&polygon_geojson=1"
    );
}

/// Tests Ini::from_toml(): unknown keys and missing email are errors.
#[test]
fn test_ini_from_toml_invalid() {
    assert_eq!(Ini::from_toml("email = 'a@b.c'\nfoo = 1").is_err(), true);
    assert_eq!(Ini::from_toml("format = 'json'").is_err(), true);
    assert_eq!(Ini::from_toml("email = 'a@b.c'\nformat = 'xml'").is_err(), true);
}

/// Tests TestNetwork::urlopen(): unknown URL and repeated routes.
#[test]
fn test_network_urlopen() {
    let network = TestNetwork::new(&[
        URLRoute::new("http://a/", "src/fixtures/network/search-empty.json"),
        URLRoute::new("http://a/", "src/fixtures/network/not-json.txt").with_status(404),
    ]);

    assert_eq!(network.urlopen("http://b/").is_err(), true);
    assert_eq!(network.urlopen("http://a/").unwrap().status, 200);
    assert_eq!(network.urlopen("http://a/").unwrap().status, 404);
    assert_eq!(network.urlopen("http://a/").is_err(), true);
}
