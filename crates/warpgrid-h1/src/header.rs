use serde::Serialize;

/// Normalize a header name to `UPPERCASE_WITH_UNDERSCORES`.
///
/// `Content-Length`, `content-length` and `CONTENT_LENGTH` all map to
/// `CONTENT_LENGTH`.
pub fn normalize_header_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// A parsed request header as a normalized name and its raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request headers keyed by normalized name.
///
/// Keys are unique: inserting an existing name replaces its value in place,
/// so iteration follows the order in which each name first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<Header>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or overwrite a header. `name` is normalized first.
    ///
    /// Returns the normalized key.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> String {
        let key = normalize_header_name(name);
        let value = value.into();
        match self.entries.iter_mut().find(|h| h.name == key) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Header::new(key.clone(), value)),
        }
        key
    }

    /// Append folded content to an existing header, separated by one space.
    ///
    /// Returns `false` if no header named `key` exists.
    pub fn append_folded(&mut self, key: &str, content: &str) -> bool {
        let Some(existing) = self.entries.iter_mut().find(|h| h.name == key) else {
            return false;
        };
        if !content.is_empty() {
            existing.value.push(' ');
            existing.value.push_str(content);
        }
        true
    }

    /// Look up a header by name, in either raw (`Content-Length`) or
    /// normalized (`CONTENT_LENGTH`) spelling.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = normalize_header_name(name);
        self.entries
            .iter()
            .find(|h| h.name == key)
            .map(|h| h.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Header> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
