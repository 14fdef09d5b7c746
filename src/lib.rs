/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! A client for the Nominatim geocoding service of OpenStreetMap.
//!
//! Typed requests are rendered to query strings, sent with a GET to the search, reverse or
//! lookup endpoint of the configured server and the JSON answer is parsed into addresses.

pub mod client;
pub mod context;
pub mod model;
pub mod query_string;
pub mod request;

pub use client::NominatimClient;
pub use context::Context;
pub use context::Ini;
