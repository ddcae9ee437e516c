/// An order-preserving, case-insensitive-on-read multimap, per Design Note
/// "keep the multi-valued mapping; expose a first-value projection".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultiMap {
    entries: Vec<(String, String)>,
}

impl HeaderMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.entries.push((name, value.into()));
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// First value for `name`, compared case-insensitively.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, name: &str) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.first(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for HeaderMultiMap {
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
    fn first_is_case_insensitive() {
        let mut h = HeaderMultiMap::new();
        h.push("Content-Type", "application/json");
        assert_eq!(h.first("content-type"), Some("application/json"));
    }

    #[test]
    fn set_replaces_all_prior_values() {
        let mut h = HeaderMultiMap::new();
        h.push("X-Auth", "one");
        h.push("X-Auth", "two");
        h.set("x-auth", "three");
        assert_eq!(h.all("X-Auth").collect::<Vec<_>>(), vec!["three"]);
    }

    #[test]
    fn push_preserves_multiple_values_in_order() {
        let mut h = HeaderMultiMap::new();
        h.push("Accept", "text/html");
        h.push("Accept", "application/json");
        assert_eq!(
            h.all("accept").collect::<Vec<_>>(),
            vec!["text/html", "application/json"]
        );
    }

    #[test]
    fn remove_drops_every_case_variant() {
        let mut h = HeaderMultiMap::new();
        h.push("X-Id", "1");
        h.remove("x-id");
        assert!(!h.contains("X-Id"));
    }
}
