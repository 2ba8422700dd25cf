//! Case-insensitive, order-preserving header bag.
//!
//! Header names are normalized to their canonical form before being used as a
//! key, both on insert and on lookup: the name is lowercased, then the first
//! letter of every `-` separated word is uppercased (`x-foo` becomes `X-Foo`).
//! Iteration yields headers in the order they were first inserted.
//!
//! Names and values are validated with the `http` crate's [`HeaderName`] and
//! [`HeaderValue`], so a `Headers` can always be converted into an
//! [`http::HeaderMap`].

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::InvalidArgument;

/// An ordered multimap of canonical header names to their values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

/// Normalizes a header name to its canonical case.
///
/// ```
/// use micro_message::header::normalize_name;
///
/// assert_eq!(normalize_name("x-foo"), "X-Foo");
/// assert_eq!(normalize_name("CONTENT-TYPE"), "Content-Type");
/// ```
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if word_start {
            normalized.push(c.to_ascii_uppercase());
        } else {
            normalized.push(c.to_ascii_lowercase());
        }
        word_start = c == '-';
    }
    normalized
}

fn validate_name(name: &str) -> Result<String, InvalidArgument> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        debug!(name, error = %e, "rejected header name");
        InvalidArgument::invalid_header_name(name)
    })?;
    Ok(normalize_name(name))
}

fn validate_values<I, V>(name: &str, values: I) -> Result<Vec<String>, InvalidArgument>
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    values
        .into_iter()
        .map(|value| {
            let value = value.into();
            match HeaderValue::from_str(&value) {
                Ok(_) => Ok(value),
                Err(_) => Err(InvalidArgument::invalid_header_value(name)),
            }
        })
        .collect()
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from `(name, line)` pairs, where every line may carry
    /// several comma separated values.
    ///
    /// ```
    /// use micro_message::header::Headers;
    ///
    /// let headers = Headers::parse_header_lines([("accept", "text/html, application/json")]).unwrap();
    /// assert_eq!(headers.get("Accept"), ["text/html", "application/json"]);
    /// ```
    pub fn parse_header_lines<I, N, L>(lines: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = (N, L)>,
        N: AsRef<str>,
        L: AsRef<str>,
    {
        lines.into_iter().try_fold(Self::new(), |headers, (name, line)| {
            let values = line.as_ref().split(',').map(str::trim).filter(|value| !value.is_empty());
            headers.with_added(name.as_ref(), values)
        })
    }

    fn position(&self, normalized: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == normalized)
    }

    /// Returns true if a header with this (case-insensitive) name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(&normalize_name(name)).is_some()
    }

    /// Returns all values of the header, or an empty slice if it does not exist.
    pub fn get(&self, name: &str) -> &[String] {
        match self.position(&normalize_name(name)) {
            Some(index) => &self.entries[index].1,
            None => &[],
        }
    }

    /// Returns all values of the header joined by `", "`, or an empty string if it does not exist.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Iterates over `(canonical name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy where `values` replace any existing values of the header.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidHeaderName`] or [`InvalidArgument::InvalidHeaderValue`]
    /// if the name or one of the values is not valid in an HTTP message.
    pub fn with<I, V>(&self, name: &str, values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let normalized = validate_name(name)?;
        let values = validate_values(name, values)?;

        let mut new = self.clone();
        match new.position(&normalized) {
            Some(index) => new.entries[index].1 = values,
            None => new.entries.push((normalized, values)),
        }
        Ok(new)
    }

    /// Returns a copy where `values` are appended to the existing values of the
    /// header, or inserted if the header does not exist yet.
    ///
    /// # Errors
    ///
    /// Same as [`Headers::with`].
    pub fn with_added<I, V>(&self, name: &str, values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let normalized = validate_name(name)?;
        let values = validate_values(name, values)?;

        let mut new = self.clone();
        match new.position(&normalized) {
            Some(index) => new.entries[index].1.extend(values),
            None => new.entries.push((normalized, values)),
        }
        Ok(new)
    }

    /// Returns a copy without the header.
    pub fn without(&self, name: &str) -> Self {
        let normalized = normalize_name(name);
        let entries = self.entries.iter().filter(|(existing, _)| *existing != normalized).cloned().collect();
        Self { entries }
    }
}

/// Converts into an [`http::HeaderMap`], keeping every value of every header.
impl From<&Headers> for HeaderMap {
    fn from(headers: &Headers) -> Self {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, values) in headers.iter() {
            // names and values were validated on insert
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                continue;
            };
            for value in values {
                if let Ok(header_value) = HeaderValue::from_str(value) {
                    map.append(header_name.clone(), header_value);
                }
            }
        }
        map
    }
}

impl TryFrom<&HeaderMap> for Headers {
    type Error = InvalidArgument;

    fn try_from(map: &HeaderMap) -> Result<Self, Self::Error> {
        map.iter().try_fold(Headers::new(), |headers, (name, value)| {
            let value = value.to_str().map_err(|e| {
                debug!(name = name.as_str(), error = %e, "header value is not visible ascii");
                InvalidArgument::invalid_header_value(name.as_str())
            })?;
            headers.with_added(name.as_str(), [value])
        })
    }
}
