use std::net::SocketAddr;

use bytes::Bytes;

/// Header collection with case-insensitive lookup.
///
/// Keeps insertion order and the casing of the most recent write, so headers
/// can be re-emitted the way they were received or set. Inserting a name that
/// already exists (in any casing) replaces that entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::request::HeaderMap;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("Content-Type", "text/html");
    /// assert_eq!(headers.get("content-type"), Some("text/html"));
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, with their stored casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A request as parsed off the wire.
///
/// Immutable once built: the parser either produces a complete value or an
/// error. Method, target and version are never empty.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub(crate) method: String,
    pub(crate) raw_target: String,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) version: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Bytes>,
    pub(crate) peer: SocketAddr,
    pub(crate) local: SocketAddr,
}

impl ParsedRequest {
    /// Method token as received (`GET`, `POST`, ...).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Target exactly as it appeared on the request line.
    pub fn raw_target(&self) -> &str {
        &self.raw_target
    }

    /// Percent-decoded path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string (after the first `?`), if the target had one.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Replaces the body; an empty body becomes `None`.
    pub(crate) fn with_body(mut self, body: Option<Bytes>) -> Self {
        self.body = body.filter(|b| !b.is_empty());
        self
    }
}
