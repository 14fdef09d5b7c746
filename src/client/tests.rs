/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the client module.

use super::*;
use crate::context::tests::TestNetwork;
use crate::context::tests::URLRoute;

/// Creates a client for the public server, answering from the given routes.
fn make_test_client(routes: &[URLRoute]) -> NominatimClient {
    let mut ctx = context::tests::make_test_context().unwrap();
    ctx.set_network(TestNetwork::from_routes(routes));
    NominatimClient::new(ctx)
}

/// Tests NominatimClient::search(): the happy path.
#[test]
fn test_search() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/search?format=json&email=test%40example.com&q=rennes,%20france&addressdetails=1",
        /*result_path=*/ "src/fixtures/network/search-rennes.json",
    )]);
    let mut search = request::SearchRequest::new();
    search.set_query("rennes, france");
    search.set_address_details(true);

    let addresses = client.search(&search).unwrap();

    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0].get_address_element("country"), Some("France"));
}

/// Tests NominatimClient::search(): no match is an empty list, not an error.
#[test]
fn test_search_empty() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/search?format=json&email=test%40example.com&q=aaaaaaaaaabbbbbbbbbb",
        /*result_path=*/ "src/fixtures/network/search-empty.json",
    )]);

    let addresses = client.search_text("aaaaaaaaaabbbbbbbbbb").unwrap();

    assert_eq!(addresses.is_empty(), true);
}

/// Tests NominatimClient::search(): the default options are merged, the request wins.
#[test]
fn test_search_options() {
    let mut client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/search?format=json&email=test%40example.com&q=vitr%C3%A9&accept-language=fr&bounded=0&polygon_geojson=1",
        /*result_path=*/ "src/fixtures/network/search-empty.json",
    )]);
    let mut options = request::SearchOptions::new();
    options.set_accept_language("de");
    options.set_bounded(true);
    options.set_polygon_format(request::PolygonFormat::GeoJson);
    client.set_options(options);
    let mut search = request::SearchRequest::new();
    search.set_query("vitré");
    search.set_accept_language("fr");
    search.set_bounded(false);

    let addresses = client.search(&search).unwrap();

    assert_eq!(addresses.is_empty(), true);
    // The caller's request is not modified.
    assert_eq!(search.get_polygon_format(), None);
    assert_eq!(
        client.get_options().clone(),
        {
            let mut expected = request::SearchOptions::new();
            expected.set_accept_language("de");
            expected.set_bounded(true);
            expected.set_polygon_format(request::PolygonFormat::GeoJson);
            expected
        }
    );
}

/// Tests NominatimClient::search(): jsonv2 format and a custom server from the configuration.
#[test]
fn test_search_jsonv2() {
    let ini = context::Ini::from_toml(
        r#"
base_url = "http://localhost:8080/"
email = "John Doe <john@example.com>"
format = "jsonv2"
"#,
    )
    .unwrap();
    let mut ctx = context::Context::new(ini);
    ctx.set_network(TestNetwork::from_routes(&[URLRoute::new(
        /*url=*/
        "http://localhost:8080/search?format=jsonv2&email=John%20Doe%20%3Cjohn%40example.com%3E&q=rennes&namedetails=1",
        /*result_path=*/ "src/fixtures/network/search-jsonv2.json",
    )]));
    let client = NominatimClient::new(ctx);
    let mut search = request::SearchRequest::new();
    search.set_query("rennes");
    search.set_name_details(true);

    let addresses = client.search(&search).unwrap();

    assert_eq!(addresses[0].element_class.as_deref(), Some("boundary"));
}

/// Tests NominatimClient::search(): HTTP errors are errors.
#[test]
fn test_search_http_error() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/search?format=json&email=test%40example.com&q=rennes",
        /*result_path=*/ "src/fixtures/network/search-empty.json",
    )
    .with_status(404)]);

    let ret = client.search_text("rennes");

    assert_eq!(ret.is_err(), true);
    let err = ret.err().unwrap().to_string();
    assert_eq!(err.contains("HTTP status 404"), true);
}

/// Tests NominatimClient::search(): a non-json body is an error.
#[test]
fn test_search_not_json() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/search?format=json&email=test%40example.com&q=rennes",
        /*result_path=*/ "src/fixtures/network/not-json.txt",
    )]);

    let ret = client.search_text("rennes");

    assert_eq!(ret.is_err(), true);
}

/// Tests NominatimClient::search(): a transport error is an error.
#[test]
fn test_search_network_error() {
    let client = make_test_client(&[]);

    let ret = client.search_text("rennes");

    assert_eq!(ret.is_err(), true);
}

/// Tests NominatimClient::search(): a query which can't be rendered fails before any network
/// access.
#[test]
fn test_search_render_error() {
    let client = make_test_client(&[]);
    let mut search = request::SearchRequest::new();
    search.set_query("rennes");
    search.set_view_box_edges(f64::NAN, 48.2, -1.1, 48.0);

    let ret = client.search(&search);

    let err = format!("{:?}", ret.err().unwrap());
    assert_eq!(err.contains("failed to serialize 'viewbox'"), true);
}

/// Tests NominatimClient::get_address().
#[test]
fn test_get_address() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&lat=48.11665616434640&lon=1.64891269513038",
        /*result_path=*/ "src/fixtures/network/reverse-vitre.json",
    )]);

    let address = client
        .get_address(1.64891269513038, 48.1166561643464)
        .unwrap()
        .unwrap();

    assert_eq!(address.place_id, Some(84418186));
    assert_eq!(address.polygon_points, None);
    assert_eq!(address.geojson, None);
    assert_eq!(address.get_address_element("town"), Some("Vitré"));
}

/// Tests NominatimClient::get_address_with_zoom() and get_address_e6().
#[test]
fn test_get_address_zoom_e6() {
    let client = make_test_client(&[
        URLRoute::new(
            /*url=*/
            "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&lat=51.44000000000000&lon=-0.32000000000000&zoom=10",
            /*result_path=*/ "src/fixtures/network/reverse-vitre.json",
        ),
        URLRoute::new(
            /*url=*/
            "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&lat=51.44000000000000&lon=-0.32000000000000",
            /*result_path=*/ "src/fixtures/network/reverse-vitre.json",
        ),
    ]);

    let zoomed = client.get_address_with_zoom(-0.32, 51.44, 10).unwrap();
    let e6 = client.get_address_e6(-320000, 51440000).unwrap();

    assert_eq!(zoomed.is_some(), true);
    assert_eq!(zoomed, e6);
}

/// Tests NominatimClient::get_address_by_osm_id().
#[test]
fn test_get_address_by_osm_id() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&osm_type=W&osm_id=26932726",
        /*result_path=*/ "src/fixtures/network/reverse-vitre.json",
    )]);

    let address = client
        .get_address_by_osm_id("way", 26932726)
        .unwrap()
        .unwrap();

    assert_eq!(address.osm_type.as_deref(), Some("way"));
    assert_eq!(address.osm_id, Some(26932726));
    assert_eq!(client.get_address_by_osm_id("X", 1).is_err(), true);
}

/// Tests NominatimClient::reverse(): the server's error object means no result.
#[test]
fn test_reverse_no_result() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&lat=0.00000000000000&lon=0.00000000000000&addressdetails=1",
        /*result_path=*/ "src/fixtures/network/reverse-error.json",
    )]);
    let mut reverse = request::ReverseRequest::new();
    reverse.set_coordinates(0.0, 0.0);
    reverse.set_address_details(true);

    let address = client.reverse(&reverse).unwrap();

    assert_eq!(address, None);
}

/// Tests NominatimClient::reverse(): HTTP errors are errors, not a missing result.
#[test]
fn test_reverse_http_error() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/reverse?format=json&email=test%40example.com&osm_type=N&osm_id=1",
        /*result_path=*/ "src/fixtures/network/not-json.txt",
    )
    .with_status(502)]);
    let mut reverse = request::ReverseRequest::new();
    reverse.set_osm_type_and_id(request::OsmType::Node, 1);

    let ret = client.reverse(&reverse);

    assert_eq!(ret.is_err(), true);
}

/// Tests NominatimClient::lookup().
#[test]
fn test_lookup() {
    let client = make_test_client(&[URLRoute::new(
        /*url=*/
        "https://nominatim.openstreetmap.org/lookup?format=json&email=test%40example.com&osm_ids=R146656,W104393803&addressdetails=0",
        /*result_path=*/ "src/fixtures/network/lookup-happy.json",
    )]);
    let mut lookup = request::LookupRequest::new();
    lookup.set_type_ids(vec!["R146656".into(), "W104393803".into()]);
    lookup.set_address_details(false);

    let addresses = client.lookup(&lookup).unwrap();

    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0].osm_id, Some(146656));
    assert_eq!(addresses[1].address_elements, None);
}

/// Tests that a client can be shared between threads.
#[test]
fn test_client_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<NominatimClient>();
}

/// Tests join_url().
#[test]
fn test_join_url() {
    assert_eq!(join_url("http://a/search?format=json", ""), "http://a/search?format=json");
    assert_eq!(
        join_url("http://a/search?format=json", "q=b"),
        "http://a/search?format=json&q=b"
    );
}
