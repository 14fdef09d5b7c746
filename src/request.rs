/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The request module contains the typed parameters of search, reverse and lookup calls.

use crate::model;
use crate::model::BoundingBox;
use crate::query_string::Param;
use crate::query_string::Request;
use crate::query_string::Serializer;
use crate::query_string::Value;
use std::fmt;
use std::str::FromStr;

/// The type of an OSM object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsmType {
    /// A node.
    Node,
    /// A way.
    Way,
    /// A relation.
    Relation,
}

impl OsmType {
    /// Gets the single-letter form the server expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            OsmType::Node => "N",
            OsmType::Way => "W",
            OsmType::Relation => "R",
        }
    }
}

impl fmt::Display for OsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsmType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "node" => Ok(OsmType::Node),
            "w" | "way" => Ok(OsmType::Way),
            "r" | "relation" => Ok(OsmType::Relation),
            _ => Err(anyhow::anyhow!("unknown OSM type: '{}'", s)),
        }
    }
}

/// Output geometry format of search results. At most one can be requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonFormat {
    /// No geometry.
    #[default]
    None,
    /// GeoJSON geometry.
    GeoJson,
    /// KML geometry.
    Kml,
    /// SVG geometry.
    Svg,
    /// WKT geometry.
    Text,
}

impl PolygonFormat {
    /// Gets the complete query fragment, including the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolygonFormat::None => "",
            PolygonFormat::GeoJson => "polygon_geojson=1",
            PolygonFormat::Kml => "polygon_kml=1",
            PolygonFormat::Svg => "polygon_svg=1",
            PolygonFormat::Text => "polygon_text=1",
        }
    }
}

/// Structured search fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtendedSearchQuery {
    street: Option<String>,
    city: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
}

impl ExtendedSearchQuery {
    /// Creates an empty structured query.
    pub fn new() -> Self {
        ExtendedSearchQuery::default()
    }

    /// Sets the house number and street name.
    pub fn set_street(&mut self, street: &str) {
        self.street = Some(street.into());
    }

    /// Sets the city.
    pub fn set_city(&mut self, city: &str) {
        self.city = Some(city.into());
    }

    /// Sets the county.
    pub fn set_county(&mut self, county: &str) {
        self.county = Some(county.into());
    }

    /// Sets the state.
    pub fn set_state(&mut self, state: &str) {
        self.state = Some(state.into());
    }

    /// Sets the country.
    pub fn set_country(&mut self, country: &str) {
        self.country = Some(country.into());
    }

    /// Sets the postal code.
    pub fn set_postal_code(&mut self, postal_code: &str) {
        self.postal_code = Some(postal_code.into());
    }
}

/// The query slot of a search: free text or structured fields.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchQuery {
    /// Free-form text, q=.
    Simple(String),
    /// Structured fields.
    Extended(ExtendedSearchQuery),
}

impl SearchQuery {
    fn extended(&self) -> Option<&ExtendedSearchQuery> {
        match self {
            SearchQuery::Extended(extended) => Some(extended),
            SearchQuery::Simple(_) => None,
        }
    }
}

impl Request for SearchQuery {
    fn params() -> Vec<Param<Self>> {
        vec![
            Param::new("q", |it: &SearchQuery| match it {
                SearchQuery::Simple(query) => Some(Value::Text(query)),
                SearchQuery::Extended(_) => None,
            }),
            Param::new("street", |it: &SearchQuery| {
                it.extended()?.street.as_deref().map(Value::Text)
            }),
            Param::new("city", |it: &SearchQuery| {
                it.extended()?.city.as_deref().map(Value::Text)
            }),
            Param::new("county", |it: &SearchQuery| {
                it.extended()?.county.as_deref().map(Value::Text)
            }),
            Param::new("state", |it: &SearchQuery| {
                it.extended()?.state.as_deref().map(Value::Text)
            }),
            Param::new("country", |it: &SearchQuery| {
                it.extended()?.country.as_deref().map(Value::Text)
            }),
            Param::new("postal_code", |it: &SearchQuery| {
                it.extended()?.postal_code.as_deref().map(Value::Text)
            }),
        ]
    }
}

/// The query slot of a reverse call: a position or an OSM object.
#[derive(Clone, Debug, PartialEq)]
pub enum ReverseQuery {
    /// A position in degrees.
    Coordinates {
        /// Longitude.
        longitude: f64,
        /// Latitude.
        latitude: f64,
    },
    /// An OSM object.
    OsmTypeAndId {
        /// Type of the object.
        osm_type: OsmType,
        /// Id of the object.
        id: u64,
    },
}

impl ReverseQuery {
    /// Creates a position query from microdegrees. The conversion is only exact up to double
    /// precision.
    pub fn from_e6(longitude_e6: i32, latitude_e6: i32) -> Self {
        ReverseQuery::Coordinates {
            longitude: model::from_e6(longitude_e6),
            latitude: model::from_e6(latitude_e6),
        }
    }
}

impl Request for ReverseQuery {
    fn params() -> Vec<Param<Self>> {
        vec![
            Param::new("lat", |it: &ReverseQuery| match it {
                ReverseQuery::Coordinates { latitude, .. } => Some(Value::Double(*latitude)),
                ReverseQuery::OsmTypeAndId { .. } => None,
            })
            .serializer(Serializer::Double),
            Param::new("lon", |it: &ReverseQuery| match it {
                ReverseQuery::Coordinates { longitude, .. } => Some(Value::Double(*longitude)),
                ReverseQuery::OsmTypeAndId { .. } => None,
            })
            .serializer(Serializer::Double),
            Param::new("osm_type", |it: &ReverseQuery| match it {
                ReverseQuery::OsmTypeAndId { osm_type, .. } => Some(Value::Text(osm_type.as_str())),
                ReverseQuery::Coordinates { .. } => None,
            }),
            Param::new("osm_id", |it: &ReverseQuery| match it {
                ReverseQuery::OsmTypeAndId { id, .. } => Some(Value::Integer(*id)),
                ReverseQuery::Coordinates { .. } => None,
            }),
        ]
    }
}

/// The query slot of a lookup call.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupQuery {
    /// A list of "{type}{id}" tokens, e.g. "R146656".
    OsmTypeAndId(Vec<String>),
}

impl LookupQuery {
    /// Creates a lookup query from typed OSM objects.
    pub fn from_objects(objects: &[(OsmType, u64)]) -> Self {
        LookupQuery::OsmTypeAndId(
            objects
                .iter()
                .map(|(osm_type, id)| format!("{}{}", osm_type, id))
                .collect(),
        )
    }
}

impl Request for LookupQuery {
    fn params() -> Vec<Param<Self>> {
        vec![
            Param::new("osm_ids", |it: &LookupQuery| match it {
                LookupQuery::OsmTypeAndId(type_ids) => Some(Value::List(type_ids)),
            })
            .serializer(Serializer::List),
        ]
    }
}

/// Parameters of a search call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchRequest {
    query: Option<SearchQuery>,
    accept_language: Option<String>,
    country_codes: Option<Vec<String>>,
    view_box: Option<BoundingBox>,
    bounded: Option<bool>,
    address_details: Option<bool>,
    name_details: Option<bool>,
    exclude_place_ids: Option<Vec<String>>,
    limit: Option<u32>,
    polygon_format: Option<PolygonFormat>,
}

impl SearchRequest {
    /// Creates an empty search request.
    pub fn new() -> Self {
        SearchRequest::default()
    }

    /// Gets the query.
    pub fn get_query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// Sets a free-form query, replacing any previous query.
    pub fn set_query(&mut self, query: &str) {
        self.query = Some(SearchQuery::Simple(query.into()));
    }

    /// Sets a free-form or structured query, replacing any previous query.
    pub fn set_search_query(&mut self, query: SearchQuery) {
        self.query = Some(query);
    }

    /// Gets the preferred languages.
    pub fn get_accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }

    /// Sets the preferred languages, e.g. "fr_FR" or "en,de".
    pub fn set_accept_language(&mut self, accept_language: &str) {
        self.accept_language = Some(accept_language.into());
    }

    /// Sets the countries to limit the search to.
    pub fn set_country_codes(&mut self, country_codes: Vec<String>) {
        self.country_codes = Some(country_codes);
    }

    /// Appends a country to limit the search to.
    pub fn add_country_code(&mut self, country_code: &str) {
        self.country_codes
            .get_or_insert_with(Vec::new)
            .push(country_code.into());
    }

    /// Gets the preferred area.
    pub fn get_view_box(&self) -> Option<&BoundingBox> {
        self.view_box.as_ref()
    }

    /// Sets the preferred area.
    pub fn set_view_box(&mut self, view_box: BoundingBox) {
        self.view_box = Some(view_box);
    }

    /// Sets the preferred area from its edges in degrees.
    pub fn set_view_box_edges(&mut self, west: f64, north: f64, east: f64, south: f64) {
        self.view_box = Some(BoundingBox::new(north, south, east, west));
    }

    /// Sets the preferred area from its edges in microdegrees.
    pub fn set_view_box_e6(&mut self, west: i32, north: i32, east: i32, south: i32) {
        self.view_box = Some(BoundingBox::from_e6(north, south, east, west));
    }

    /// Gets if results are restricted to the view box.
    pub fn get_bounded(&self) -> Option<bool> {
        self.bounded
    }

    /// Sets if results are restricted to the view box.
    pub fn set_bounded(&mut self, bounded: bool) {
        self.bounded = Some(bounded);
    }

    /// Sets if address components are requested.
    pub fn set_address_details(&mut self, address_details: bool) {
        self.address_details = Some(address_details);
    }

    /// Sets if name variants are requested.
    pub fn set_name_details(&mut self, name_details: bool) {
        self.name_details = Some(name_details);
    }

    /// Sets the places to leave out of the results.
    pub fn set_exclude_place_ids(&mut self, exclude_place_ids: Vec<String>) {
        self.exclude_place_ids = Some(exclude_place_ids);
    }

    /// Appends a place to leave out of the results.
    pub fn add_exclude_place_id(&mut self, place_id: &str) {
        self.exclude_place_ids
            .get_or_insert_with(Vec::new)
            .push(place_id.into());
    }

    /// Sets the maximum number of results.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = Some(limit);
    }

    /// Gets the geometry format.
    pub fn get_polygon_format(&self) -> Option<PolygonFormat> {
        self.polygon_format
    }

    /// Sets the geometry format.
    pub fn set_polygon_format(&mut self, polygon_format: PolygonFormat) {
        self.polygon_format = Some(polygon_format);
    }
}

impl Request for SearchRequest {
    fn params() -> Vec<Param<Self>> {
        vec![
            // Already a valid query fragment, made of encoded pieces.
            Param::bare("query", |it: &SearchRequest| {
                it.query.as_ref().map(|query| Value::Nested(query))
            })
            .encode(false),
            Param::new("accept-language", |it: &SearchRequest| {
                it.accept_language.as_deref().map(Value::Text)
            }),
            Param::new("countrycodes", |it: &SearchRequest| {
                it.country_codes.as_deref().map(Value::List)
            })
            .serializer(Serializer::List),
            Param::new("viewbox", |it: &SearchRequest| {
                it.view_box.as_ref().map(Value::BoundingBox)
            })
            .serializer(Serializer::BoundingBox),
            Param::new("bounded", |it: &SearchRequest| it.bounded.map(Value::Bool))
                .serializer(Serializer::Boolean),
            Param::new("addressdetails", |it: &SearchRequest| {
                it.address_details.map(Value::Bool)
            })
            .serializer(Serializer::Boolean),
            Param::new("namedetails", |it: &SearchRequest| {
                it.name_details.map(Value::Bool)
            })
            .serializer(Serializer::Boolean),
            Param::new("exclude_place_ids", |it: &SearchRequest| {
                it.exclude_place_ids.as_deref().map(Value::List)
            })
            .serializer(Serializer::List),
            Param::new("limit", |it: &SearchRequest| {
                it.limit.map(|limit| Value::Integer(u64::from(limit)))
            }),
            // The format renders the key and the value together.
            Param::bare("polygon", |it: &SearchRequest| {
                it.polygon_format.map(|format| Value::Text(format.as_str()))
            })
            .encode(false),
        ]
    }
}

/// Parameters of a reverse geocoding call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReverseRequest {
    accept_language: Option<String>,
    query: Option<ReverseQuery>,
    zoom: Option<u8>,
    address_details: Option<bool>,
}

impl ReverseRequest {
    /// Creates an empty reverse request.
    pub fn new() -> Self {
        ReverseRequest::default()
    }

    /// Sets the preferred languages.
    pub fn set_accept_language(&mut self, accept_language: &str) {
        self.accept_language = Some(accept_language.into());
    }

    /// Gets the query.
    pub fn get_query(&self) -> Option<&ReverseQuery> {
        self.query.as_ref()
    }

    /// Sets the query, replacing any previous query.
    pub fn set_query(&mut self, query: ReverseQuery) {
        self.query = Some(query);
    }

    /// Sets a position query, replacing any previous query.
    pub fn set_coordinates(&mut self, longitude: f64, latitude: f64) {
        self.query = Some(ReverseQuery::Coordinates {
            longitude,
            latitude,
        });
    }

    /// Sets an OSM object query, replacing any previous query.
    pub fn set_osm_type_and_id(&mut self, osm_type: OsmType, id: u64) {
        self.query = Some(ReverseQuery::OsmTypeAndId { osm_type, id });
    }

    /// Sets the level of detail, 3 is a country, 18 is a building.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = Some(zoom);
    }

    /// Sets if address components are requested.
    pub fn set_address_details(&mut self, address_details: bool) {
        self.address_details = Some(address_details);
    }
}

impl Request for ReverseRequest {
    fn params() -> Vec<Param<Self>> {
        vec![
            Param::new("accept-language", |it: &ReverseRequest| {
                it.accept_language.as_deref().map(Value::Text)
            }),
            Param::bare("query", |it: &ReverseRequest| {
                it.query.as_ref().map(|query| Value::Nested(query))
            })
            .encode(false),
            Param::new("zoom", |it: &ReverseRequest| {
                it.zoom.map(|zoom| Value::Integer(u64::from(zoom)))
            }),
            Param::new("addressdetails", |it: &ReverseRequest| {
                it.address_details.map(Value::Bool)
            })
            .serializer(Serializer::Boolean),
        ]
    }
}

/// Parameters of a lookup call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupRequest {
    accept_language: Option<String>,
    query: Option<LookupQuery>,
    address_details: Option<bool>,
}

impl LookupRequest {
    /// Creates an empty lookup request.
    pub fn new() -> Self {
        LookupRequest::default()
    }

    /// Sets the preferred languages.
    pub fn set_accept_language(&mut self, accept_language: &str) {
        self.accept_language = Some(accept_language.into());
    }

    /// Sets the query, replacing any previous query.
    pub fn set_query(&mut self, query: LookupQuery) {
        self.query = Some(query);
    }

    /// Sets the objects to look up as "{type}{id}" tokens, replacing any previous query.
    pub fn set_type_ids(&mut self, type_ids: Vec<String>) {
        self.query = Some(LookupQuery::OsmTypeAndId(type_ids));
    }

    /// Sets if address components are requested.
    pub fn set_address_details(&mut self, address_details: bool) {
        self.address_details = Some(address_details);
    }
}

impl Request for LookupRequest {
    fn params() -> Vec<Param<Self>> {
        vec![
            Param::new("accept-language", |it: &LookupRequest| {
                it.accept_language.as_deref().map(Value::Text)
            }),
            Param::bare("query", |it: &LookupRequest| {
                it.query.as_ref().map(|query| Value::Nested(query))
            })
            .encode(false),
            Param::new("addressdetails", |it: &LookupRequest| {
                it.address_details.map(Value::Bool)
            })
            .serializer(Serializer::Boolean),
        ]
    }
}

/// Default search options of a client, applied to the options a request leaves unset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOptions {
    view_box: Option<BoundingBox>,
    bounded: Option<bool>,
    polygon_format: Option<PolygonFormat>,
    accept_language: Option<String>,
}

impl SearchOptions {
    /// Creates options which change nothing.
    pub fn new() -> Self {
        SearchOptions::default()
    }

    /// Sets the default preferred area.
    pub fn set_view_box(&mut self, view_box: BoundingBox) {
        self.view_box = Some(view_box);
    }

    /// Sets the default of restricting results to the view box.
    pub fn set_bounded(&mut self, bounded: bool) {
        self.bounded = Some(bounded);
    }

    /// Sets the default geometry format.
    pub fn set_polygon_format(&mut self, polygon_format: PolygonFormat) {
        self.polygon_format = Some(polygon_format);
    }

    /// Sets the default preferred languages.
    pub fn set_accept_language(&mut self, accept_language: &str) {
        self.accept_language = Some(accept_language.into());
    }

    /// Fills the fields `request` left unset; values set on the request win.
    pub fn merge_to(&self, request: &mut SearchRequest) {
        if request.get_bounded().is_none()
            && let Some(bounded) = self.bounded
        {
            request.set_bounded(bounded);
        }
        if request.get_view_box().is_none()
            && let Some(view_box) = self.view_box
        {
            request.set_view_box(view_box);
        }
        if request.get_polygon_format().is_none()
            && let Some(polygon_format) = self.polygon_format
        {
            request.set_polygon_format(polygon_format);
        }
        if request.get_accept_language().is_none()
            && let Some(ref accept_language) = self.accept_language
        {
            request.set_accept_language(accept_language);
        }
    }
}
