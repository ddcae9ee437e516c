use crate::header::HeaderMultiMap;
use std::collections::HashMap;
use std::net::IpAddr;

/// The request half of an [`crate::exchange::Exchange`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: QueryMultiMap,
    pub headers: HeaderMultiMap,
    pub body: Vec<u8>,
    pub remote_addr: Option<IpAddr>,
    /// Bound path parameters, filled in once a resource/interceptor matches.
    pub path_params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: QueryMultiMap::default(),
            headers: HeaderMultiMap::default(),
            body: Vec::new(),
            remote_addr: None,
            path_params: HashMap::new(),
        }
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.first("content-type")
    }

    pub fn is_form(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    }

    pub fn form_params(&self) -> HashMap<String, String> {
        let Some(body) = self.body_str() else {
            return HashMap::new();
        };
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }
}

/// An order-preserving query-string multimap, mirroring [`HeaderMultiMap`].
#[derive(Debug, Clone, Default)]
pub struct QueryMultiMap {
    entries: Vec<(String, String)>,
}

impl QueryMultiMap {
    pub fn parse(raw: &str) -> Self {
        let entries = url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();
        Self { entries }
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, name: &str) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for QueryMultiMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parses_repeated_keys() {
        let q = QueryMultiMap::parse("a=1&a=2&b=3");
        assert_eq!(q.all("a").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(q.first("b"), Some("3"));
    }

    #[test]
    fn form_params_reads_urlencoded_body() {
        let mut req = Request::new("POST", "/x");
        req.headers
            .set("Content-Type", "application/x-www-form-urlencoded");
        req.body = b"name=Ada&lang=rust".to_vec();
        assert!(req.is_form());
        let parsed = req.form_params();
        assert_eq!(parsed.get("name").map(String::as_str), Some("Ada"));
    }
}
