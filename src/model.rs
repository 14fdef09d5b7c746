/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The model module contains the structs a server response is parsed into.

use serde::Deserialize as _;
use serde::de;
use std::fmt;

/// Converts a coordinate to microdegrees, truncating toward zero.
pub fn to_e6(value: f64) -> i32 {
    (value * 1e6) as i32
}

/// Converts microdegrees to a coordinate.
pub fn from_e6(value: i32) -> f64 {
    value as f64 / 1e6
}

/// Parses a JSON number, or a string containing a number.
fn number_from_json(value: &serde_json::Value) -> Result<f64, String> {
    match value {
        serde_json::Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| format!("'{}' is not a valid number", number)),
        serde_json::Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a valid number", text)),
        other => Err(format!("expected a number, got '{}'", other)),
    }
}

/// Deserializes a number sent as a JSON number or string.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    number_from_json(&value).map_err(de::Error::custom)
}

/// Deserializes an optional number sent as a JSON number or string.
fn de_lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    number_from_json(&value).map(Some).map_err(de::Error::custom)
}

/// Deserializes an optional id sent as a JSON number or string.
fn de_lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(ref number) => match number.as_u64() {
            Some(id) => Ok(Some(id)),
            None => Err(de::Error::custom(format!("'{}' is not a valid id", number))),
        },
        serde_json::Value::String(ref text) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{}' is not a valid id", text))),
        other => Err(de::Error::custom(format!("expected an id, got '{}'", other))),
    }
}

/// Deserializes an optional small number sent as a JSON number or string, e.g. a rank.
fn de_lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: de::Deserializer<'de>,
{
    match de_lenient_opt_u64(deserializer)? {
        Some(number) => u32::try_from(number)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{}' is out of range", number))),
        None => Ok(None),
    }
}

/// Deserializes a JSON object into key-value pairs, keeping the order of the keys.
fn de_elements<'de, D>(deserializer: D) -> Result<Option<Vec<Element>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    struct ElementsVisitor;

    impl<'de> de::Visitor<'de> for ElementsVisitor {
        type Value = Option<Vec<Element>>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("null or an object")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: de::Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: de::MapAccess<'de>,
        {
            let mut elements = Vec::new();
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                let value = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                elements.push(Element { key, value });
            }
            Ok(Some(elements))
        }
    }

    deserializer.deserialize_option(ElementsVisitor)
}

/// A key-value pair, e.g. one component of an address.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// The key, e.g. "city".
    pub key: String,
    /// The value, e.g. "Rennes".
    pub value: String,
}

/// A rectangle, described by its edges in degrees.
///
/// The microdegree accessors are a lossy view of the same four doubles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        BoundingBox {
            north,
            south,
            east,
            west,
        }
    }

    /// Creates a new bounding box from microdegrees.
    pub fn from_e6(north: i32, south: i32, east: i32, west: i32) -> Self {
        BoundingBox::new(from_e6(north), from_e6(south), from_e6(east), from_e6(west))
    }

    /// Gets the north edge.
    pub fn get_north(&self) -> f64 {
        self.north
    }

    /// Gets the north edge in microdegrees.
    pub fn get_north_e6(&self) -> i32 {
        to_e6(self.north)
    }

    /// Sets the north edge.
    pub fn set_north(&mut self, north: f64) {
        self.north = north;
    }

    /// Sets the north edge in microdegrees.
    pub fn set_north_e6(&mut self, north: i32) {
        self.north = from_e6(north);
    }

    /// Gets the south edge.
    pub fn get_south(&self) -> f64 {
        self.south
    }

    /// Gets the south edge in microdegrees.
    pub fn get_south_e6(&self) -> i32 {
        to_e6(self.south)
    }

    /// Sets the south edge.
    pub fn set_south(&mut self, south: f64) {
        self.south = south;
    }

    /// Sets the south edge in microdegrees.
    pub fn set_south_e6(&mut self, south: i32) {
        self.south = from_e6(south);
    }

    /// Gets the east edge.
    pub fn get_east(&self) -> f64 {
        self.east
    }

    /// Gets the east edge in microdegrees.
    pub fn get_east_e6(&self) -> i32 {
        to_e6(self.east)
    }

    /// Sets the east edge.
    pub fn set_east(&mut self, east: f64) {
        self.east = east;
    }

    /// Sets the east edge in microdegrees.
    pub fn set_east_e6(&mut self, east: i32) {
        self.east = from_e6(east);
    }

    /// Gets the west edge.
    pub fn get_west(&self) -> f64 {
        self.west
    }

    /// Gets the west edge in microdegrees.
    pub fn get_west_e6(&self) -> i32 {
        to_e6(self.west)
    }

    /// Sets the west edge.
    pub fn set_west(&mut self, west: f64) {
        self.west = west;
    }

    /// Sets the west edge in microdegrees.
    pub fn set_west_e6(&mut self, west: i32) {
        self.west = from_e6(west);
    }
}

/// The server sends "boundingbox" as [south, north, west, east], numbers quoted as strings. This
/// is the order documented for the current server; some old servers used [east, west, north,
/// south], which is not supported.
impl<'de> de::Deserialize<'de> for BoundingBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
        if values.len() != 4 {
            return Err(de::Error::invalid_length(
                values.len(),
                &"an array of 4 coordinates",
            ));
        }
        let mut edges = [0_f64; 4];
        for (edge, value) in edges.iter_mut().zip(values.iter()) {
            *edge = number_from_json(value).map_err(de::Error::custom)?;
        }
        let [south, north, west, east] = edges;
        Ok(BoundingBox::new(north, south, east, west))
    }
}

/// One vertex of a polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolygonPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl PolygonPoint {
    /// Gets the longitude in microdegrees.
    pub fn get_longitude_e6(&self) -> i32 {
        to_e6(self.longitude)
    }

    /// Gets the latitude in microdegrees.
    pub fn get_latitude_e6(&self) -> i32 {
        to_e6(self.latitude)
    }
}

/// The server sends polygon points as [lon, lat] pairs.
impl<'de> de::Deserialize<'de> for PolygonPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
        if values.len() != 2 {
            return Err(de::Error::invalid_length(values.len(), &"a [lon, lat] pair"));
        }
        let longitude = number_from_json(&values[0]).map_err(de::Error::custom)?;
        let latitude = number_from_json(&values[1]).map_err(de::Error::custom)?;
        Ok(PolygonPoint {
            longitude,
            latitude,
        })
    }
}

/// Address is one place returned by search, reverse or lookup.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct Address {
    /// Internal id of the place on the server.
    #[serde(default, deserialize_with = "de_lenient_opt_u64")]
    pub place_id: Option<u64>,
    /// Data licence.
    pub licence: Option<String>,
    /// "node", "way" or "relation".
    pub osm_type: Option<String>,
    /// OSM id, to be interpreted together with osm_type.
    #[serde(default, deserialize_with = "de_lenient_opt_u64")]
    pub osm_id: Option<u64>,
    /// Extent of the place.
    #[serde(rename = "boundingbox")]
    pub bounding_box: Option<BoundingBox>,
    /// Latitude of the centroid.
    #[serde(rename = "lat", default, deserialize_with = "de_lenient_f64")]
    pub latitude: f64,
    /// Longitude of the centroid.
    #[serde(rename = "lon", default, deserialize_with = "de_lenient_f64")]
    pub longitude: f64,
    /// Full, comma-separated name.
    #[serde(default)]
    pub display_name: String,
    /// Main OSM tag key, e.g. "highway".
    #[serde(rename = "class", alias = "category")]
    pub element_class: Option<String>,
    /// Main OSM tag value, e.g. "residential".
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    /// Rank of the place, 30 is a building, 26 is a street.
    #[serde(default, deserialize_with = "de_lenient_opt_u32")]
    pub place_rank: Option<u32>,
    /// Relative importance of the place.
    #[serde(default, deserialize_with = "de_lenient_opt_f64")]
    pub importance: Option<f64>,
    /// Address components, present with addressdetails=1.
    #[serde(rename = "address", default, deserialize_with = "de_elements")]
    pub address_elements: Option<Vec<Element>>,
    /// Name variants, present with namedetails=1.
    #[serde(rename = "namedetails", default, deserialize_with = "de_elements")]
    pub name_details: Option<Vec<Element>>,
    /// Geometry, present with polygon_geojson=1.
    pub geojson: Option<serde_json::Value>,
    /// Geometry as WKT, present with polygon_text=1.
    pub geotext: Option<String>,
    /// Geometry as points, sent by old servers.
    #[serde(rename = "polygonpoints")]
    pub polygon_points: Option<Vec<PolygonPoint>>,
}

impl Address {
    /// Gets the latitude in microdegrees.
    pub fn get_latitude_e6(&self) -> i32 {
        to_e6(self.latitude)
    }

    /// Sets the latitude in microdegrees.
    pub fn set_latitude_e6(&mut self, latitude: i32) {
        self.latitude = from_e6(latitude);
    }

    /// Gets the longitude in microdegrees.
    pub fn get_longitude_e6(&self) -> i32 {
        to_e6(self.longitude)
    }

    /// Sets the longitude in microdegrees.
    pub fn set_longitude_e6(&mut self, longitude: i32) {
        self.longitude = from_e6(longitude);
    }

    /// Looks up an address component by key, e.g. "city".
    pub fn get_address_element(&self, key: &str) -> Option<&str> {
        self.address_elements
            .as_ref()?
            .iter()
            .find(|element| element.key == key)
            .map(|element| element.value.as_str())
    }
}
