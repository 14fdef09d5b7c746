/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The client module talks to a Nominatim server: search, reverse geocoding and lookup.

use crate::context;
use crate::model::Address;
use crate::query_string::QueryString as _;
use crate::request;
use anyhow::Context as _;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Characters kept as-is in the email parameter, like a HTML form would do it.
const EMAIL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

/// Appends a rendered query string to an URL which already has parameters.
fn join_url(base: &str, query_string: &str) -> String {
    if query_string.is_empty() {
        return base.into();
    }

    format!("{}&{}", base, query_string)
}

/// A client for one Nominatim server.
///
/// The client holds no per-call state, a single instance can serve calls from multiple threads.
#[derive(Clone)]
pub struct NominatimClient {
    ctx: context::Context,
    search_url: String,
    reverse_url: String,
    lookup_url: String,
    options: request::SearchOptions,
}

impl NominatimClient {
    /// Creates a new client, using the server, contact email and default options of `ctx`.
    pub fn new(ctx: context::Context) -> Self {
        let ini = ctx.get_ini();
        let base_url = ini.get_base_url();
        let email = percent_encoding::utf8_percent_encode(ini.get_email(), EMAIL).to_string();
        let search_url = format!(
            "{}/search?format={}&email={}",
            base_url,
            ini.get_format().as_str(),
            email
        );
        let reverse_url = format!("{}/reverse?format=json&email={}", base_url, email);
        let lookup_url = format!("{}/lookup?format=json&email={}", base_url, email);
        log::debug!("NominatimClient::new: search URL: {}", search_url);
        log::debug!("NominatimClient::new: reverse URL: {}", reverse_url);
        log::debug!("NominatimClient::new: lookup URL: {}", lookup_url);
        let options = ini.get_search_options();
        NominatimClient {
            ctx,
            search_url,
            reverse_url,
            lookup_url,
            options,
        }
    }

    /// Gets the default search options.
    pub fn get_options(&self) -> &request::SearchOptions {
        &self.options
    }

    /// Sets the default search options.
    pub fn set_options(&mut self, options: request::SearchOptions) {
        self.options = options;
    }

    /// Searches for places by text or structured fields. No match is an empty list.
    pub fn search(&self, search: &request::SearchRequest) -> anyhow::Result<Vec<Address>> {
        let mut search = search.clone();
        self.options.merge_to(&mut search);
        let url = join_url(&self.search_url, &search.to_query_string()?);
        log::debug!("search: url is '{}'", url);
        self.get_json(&url)
    }

    /// Resolves a position or OSM object to a place. No match is None.
    pub fn reverse(&self, reverse: &request::ReverseRequest) -> anyhow::Result<Option<Address>> {
        let url = join_url(&self.reverse_url, &reverse.to_query_string()?);
        log::debug!("reverse: url is '{}'", url);
        let value: serde_json::Value = self.get_json(&url)?;
        // The server answers with 200 and an error object when nothing is found.
        if let Some(error) = value.get("error") {
            log::info!("reverse: no result for '{}': {}", url, error);
            return Ok(None);
        }

        let address = serde_json::from_value(value)
            .with_context(|| format!("failed to parse the reverse result of '{}'", url))?;
        Ok(Some(address))
    }

    /// Resolves a batch of OSM objects to places. Unknown objects are left out.
    pub fn lookup(&self, lookup: &request::LookupRequest) -> anyhow::Result<Vec<Address>> {
        let url = join_url(&self.lookup_url, &lookup.to_query_string()?);
        log::debug!("lookup: url is '{}'", url);
        self.get_json(&url)
    }

    /// Searches for places by free-form text.
    pub fn search_text(&self, query: &str) -> anyhow::Result<Vec<Address>> {
        let mut search = request::SearchRequest::new();
        search.set_query(query);
        self.search(&search)
    }

    /// Resolves a position to a place.
    pub fn get_address(&self, longitude: f64, latitude: f64) -> anyhow::Result<Option<Address>> {
        let mut reverse = request::ReverseRequest::new();
        reverse.set_coordinates(longitude, latitude);
        self.reverse(&reverse)
    }

    /// Resolves a position to a place, at a given level of detail.
    pub fn get_address_with_zoom(
        &self,
        longitude: f64,
        latitude: f64,
        zoom: u8,
    ) -> anyhow::Result<Option<Address>> {
        let mut reverse = request::ReverseRequest::new();
        reverse.set_coordinates(longitude, latitude);
        reverse.set_zoom(zoom);
        self.reverse(&reverse)
    }

    /// Resolves a position given in microdegrees to a place.
    pub fn get_address_e6(
        &self,
        longitude_e6: i32,
        latitude_e6: i32,
    ) -> anyhow::Result<Option<Address>> {
        let mut reverse = request::ReverseRequest::new();
        reverse.set_query(request::ReverseQuery::from_e6(longitude_e6, latitude_e6));
        self.reverse(&reverse)
    }

    /// Resolves an OSM object to a place, `osm_type` is e.g. "W" or "way".
    pub fn get_address_by_osm_id(
        &self,
        osm_type: &str,
        id: u64,
    ) -> anyhow::Result<Option<Address>> {
        let mut reverse = request::ReverseRequest::new();
        reverse.set_osm_type_and_id(osm_type.parse()?, id);
        self.reverse(&reverse)
    }

    /// Performs a GET and parses the body as JSON.
    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        let response = self
            .ctx
            .get_network()
            .urlopen(url)
            .with_context(|| format!("failed to GET '{}'", url))?;
        if response.status >= 400 {
            return Err(anyhow::anyhow!(
                "GET '{}' failed with HTTP status {}",
                url,
                response.status
            ));
        }

        serde_json::from_str(&response.body)
            .with_context(|| format!("failed to parse the json response of '{}'", url))
    }
}

#[cfg(test)]
mod tests;
