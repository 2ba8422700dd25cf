//! Standard-port table used by [`Uri`](super::Uri).
//!
//! The table decides two things: which schemes [`Uri::with_scheme`](super::Uri::with_scheme)
//! accepts, and which port is folded away when it matches the scheme default.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Deserialize;
use triomphe::Arc;

use crate::error::InvalidArgument;

static DEFAULT_REGISTRY: Lazy<Arc<SchemeRegistry>> = Lazy::new(|| Arc::new(SchemeRegistry::default()));

/// Mapping from a lowercase scheme name to its standard port.
///
/// # Example
///
/// ```
/// use micro_message::uri::SchemeRegistry;
///
/// let registry = SchemeRegistry::default().with_scheme("ws", 80).with_scheme("wss", 443);
/// assert_eq!(registry.standard_port("WSS"), Some(443));
/// assert!(!registry.contains("ftp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemeRegistry {
    schemes: BTreeMap<String, u16>,
}

impl SchemeRegistry {
    /// Creates a registry that knows no scheme at all.
    pub fn empty() -> Self {
        Self { schemes: BTreeMap::new() }
    }

    /// Returns the shared process-wide registry (`http` → 80, `https` → 443).
    pub fn shared() -> Arc<SchemeRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    /// Loads a registry from a json document shaped like `{"schemes": {"http": 80}}`.
    ///
    /// Scheme names are lowercased while loading.
    pub fn from_json(json: &str) -> Result<Self, InvalidArgument> {
        let registry: SchemeRegistry =
            serde_json::from_str(json).map_err(InvalidArgument::invalid_scheme_registry)?;
        Ok(registry.into_iter().fold(Self::empty(), |acc, (scheme, port)| acc.with_scheme(scheme, port)))
    }

    /// Returns a registry that additionally maps `scheme` to `port`.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl AsRef<str>, port: u16) -> Self {
        self.schemes.insert(scheme.as_ref().to_ascii_lowercase(), port);
        self
    }

    /// Case-insensitive lookup of the standard port of `scheme`.
    pub fn standard_port(&self, scheme: &str) -> Option<u16> {
        if scheme.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.schemes.get(&scheme.to_ascii_lowercase()).copied();
        }
        self.schemes.get(scheme).copied()
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.standard_port(scheme).is_some()
    }

    /// Returns true if `port` is the standard port of `scheme`.
    pub fn is_standard_port(&self, scheme: &str, port: u16) -> bool {
        self.standard_port(scheme) == Some(port)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.schemes.iter().map(|(scheme, port)| (scheme.as_str(), *port))
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::empty().with_scheme("http", 80).with_scheme("https", 443)
    }
}

impl IntoIterator for SchemeRegistry {
    type Item = (String, u16);
    type IntoIter = std::collections::btree_map::IntoIter<String, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_knows_http_and_https() {
        let registry = SchemeRegistry::default();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.standard_port("http"), Some(80));
        assert_eq!(registry.standard_port("https"), Some(443));
        assert_eq!(registry.standard_port("ftp"), None);
        assert!(registry.is_standard_port("HTTP", 80));
        assert!(!registry.is_standard_port("http", 443));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = SchemeRegistry::empty();
        assert!(registry.is_empty());
        assert!(!registry.contains("http"));
    }

    #[test]
    fn extend_registry() {
        let registry = SchemeRegistry::default().with_scheme("FTP", 21);
        assert_eq!(registry.standard_port("ftp"), Some(21));
        assert_eq!(registry.iter().map(|(s, _)| s).collect::<Vec<_>>(), vec!["ftp", "http", "https"]);
    }

    #[test]
    fn load_from_json() {
        let json = indoc! {r#"
        {
            "schemes": {
                "HTTP": 8080,
                "ws": 80
            }
        }
        "#};

        let registry = SchemeRegistry::from_json(json).unwrap();
        assert_eq!(registry.standard_port("http"), Some(8080));
        assert_eq!(registry.standard_port("ws"), Some(80));
        assert_eq!(registry.standard_port("https"), None);
    }

    #[test]
    fn load_from_bad_json() {
        let err = SchemeRegistry::from_json(r#"{"schemes": {"http": 70000}}"#).unwrap_err();
        assert!(matches!(err, InvalidArgument::InvalidSchemeRegistry { .. }));

        let err = SchemeRegistry::from_json("{}").unwrap_err();
        assert!(matches!(err, InvalidArgument::InvalidSchemeRegistry { .. }));
    }

    #[test]
    fn shared_registry_is_default() {
        assert_eq!(*SchemeRegistry::shared(), SchemeRegistry::default());
    }
}
