/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The query_string module renders a request object into an URL query string.
//!
//! Each request type declares an ordered list of [`Param`]s. A param couples a getter with the
//! metadata needed to render the value: a key, a format template, a serializer and whether the
//! serialized value has to be percent-encoded. Params without a value are skipped, the rest is
//! joined with `&`, in declaration order.

use crate::model::BoundingBox;
use anyhow::Context as _;
use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;

/// Characters which are escaped in a query value. What RFC 3986 allows in a query
/// (`pchar / "/" / "?"`) is kept, except the delimiters `&`, `=`, `+`, `;` and `@`. Commas are
/// kept, the server expects lists in that form.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Number of digits after the decimal point for coordinates.
const DOUBLE_PRECISION: usize = 14;

/// The default format template.
const KEY_VALUE: &str = "{key}={value}";

/// Something that can be rendered to a query string fragment.
pub trait QueryString {
    /// Renders the query string, without a leading '?'.
    fn to_query_string(&self) -> anyhow::Result<String>;
}

/// A request type, described by its ordered list of params.
pub trait Request {
    /// Returns the params in emission order.
    fn params() -> Vec<Param<Self>>
    where
        Self: Sized;
}

impl<T: Request> QueryString for T {
    fn to_query_string(&self) -> anyhow::Result<String> {
        render(self, &T::params())
    }
}

/// The current value of one param, as returned by its getter.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// A string.
    Text(&'a str),
    /// A non-negative integer.
    Integer(u64),
    /// A floating point number.
    Double(f64),
    /// A flag.
    Bool(bool),
    /// A list of strings.
    List(&'a [String]),
    /// A bounding box.
    BoundingBox(&'a BoundingBox),
    /// An other request, rendered recursively.
    Nested(&'a dyn QueryString),
}

/// Decides how a value is turned into a string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Serializer {
    /// Generic conversion, any value is accepted.
    ToString,
    /// Fixed point with 14 digits, only doubles are accepted.
    Double,
    /// "1" or "0", only bools are accepted.
    Boolean,
    /// Comma-separated list.
    List,
    /// "west,north,east,south" with fixed point doubles.
    BoundingBox,
}

impl Serializer {
    /// Serializes `value`, `key` is only used for error reporting.
    pub fn serialize(&self, key: &str, value: &Value<'_>) -> anyhow::Result<String> {
        match self {
            Serializer::ToString => to_plain_string(value),
            Serializer::Double => match value {
                Value::Double(double) => format_double(*double),
                _ => Err(anyhow::anyhow!("'{}': can't serialize anything but a double", key)),
            },
            Serializer::Boolean => match value {
                Value::Bool(flag) => Ok(String::from(if *flag { "1" } else { "0" })),
                _ => Err(anyhow::anyhow!("'{}': can't serialize anything but a bool", key)),
            },
            Serializer::List => match value {
                Value::List(items) => Ok(items.join(",")),
                _ => {
                    log::warn!("serialize: '{}' is not a list, falling back to to-string", key);
                    to_plain_string(value)
                }
            },
            Serializer::BoundingBox => match value {
                Value::BoundingBox(bbox) => Ok([
                    format_double(bbox.get_west())?,
                    format_double(bbox.get_north())?,
                    format_double(bbox.get_east())?,
                    format_double(bbox.get_south())?,
                ]
                .join(",")),
                _ => {
                    log::warn!(
                        "serialize: '{}' is not a bounding box, falling back to to-string",
                        key
                    );
                    to_plain_string(value)
                }
            },
        }
    }
}

/// Formats a coordinate the way the server expects it, independent of the locale.
pub fn format_double(value: f64) -> anyhow::Result<String> {
    if !value.is_finite() {
        return Err(anyhow::anyhow!("can't serialize non-finite number {}", value));
    }

    Ok(format!("{:.*}", DOUBLE_PRECISION, value))
}

/// The generic conversion, used when no specific serializer is declared.
fn to_plain_string(value: &Value<'_>) -> anyhow::Result<String> {
    let ret = match value {
        Value::Text(text) => text.to_string(),
        Value::Integer(integer) => integer.to_string(),
        Value::Double(double) => double.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::List(items) => items.join(","),
        Value::BoundingBox(bbox) => format!(
            "{},{},{},{}",
            bbox.get_west(),
            bbox.get_north(),
            bbox.get_east(),
            bbox.get_south()
        ),
        Value::Nested(nested) => nested.to_query_string()?,
    };
    Ok(ret)
}

/// Percent-encodes a query value: space is %20, non-ASCII is escaped as UTF-8.
pub fn encode(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Reads the value of a param from a request, None means unset.
pub type Getter<T> = fn(&T) -> Option<Value<'_>>;

/// Declares one query parameter of the request type `T`.
pub struct Param<T> {
    key: &'static str,
    format: &'static str,
    serializer: Serializer,
    encode: bool,
    getter: Getter<T>,
}

impl<T> Param<T> {
    /// Creates a `key=value` param, using the generic serializer and encoding.
    pub fn new(key: &'static str, getter: Getter<T>) -> Self {
        Param {
            key,
            format: KEY_VALUE,
            serializer: Serializer::ToString,
            encode: true,
            getter,
        }
    }

    /// Creates a param which emits only its value, e.g. a nested query.
    pub fn bare(key: &'static str, getter: Getter<T>) -> Self {
        Param {
            format: "{value}",
            ..Param::new(key, getter)
        }
    }

    /// Sets the format template, `{key}` and `{value}` are substituted.
    pub fn format(mut self, format: &'static str) -> Self {
        self.format = format;
        self
    }

    /// Sets the serializer.
    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    /// Sets if the serialized value has to be percent-encoded.
    pub fn encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    /// Gets the logical name of the param.
    pub fn get_key(&self) -> &'static str {
        self.key
    }

    /// Renders this param of `item`, None if there is nothing to emit.
    fn render(&self, item: &T) -> anyhow::Result<Option<String>> {
        let value = match (self.getter)(item) {
            Some(value) => value,
            None => return Ok(None),
        };

        let serialized = self
            .serializer
            .serialize(self.key, &value)
            .with_context(|| format!("failed to serialize '{}'", self.key))?;
        if serialized.trim().is_empty() {
            return Ok(None);
        }

        let value = if self.encode {
            encode(&serialized)
        } else {
            serialized
        };
        // Substitute the value last, so its content is never treated as a placeholder.
        Ok(Some(
            self.format
                .replace("{key}", self.key)
                .replace("{value}", &value),
        ))
    }
}

/// Renders the params of `item` to a query string.
pub fn render<T>(item: &T, params: &[Param<T>]) -> anyhow::Result<String> {
    let mut fragments: Vec<String> = Vec::new();
    for param in params {
        if let Some(fragment) = param.render(item)? {
            fragments.push(fragment);
        }
    }

    Ok(fragments.join("&"))
}
