//! Ordered HTTP header map.

/// Header map preserving insertion order and first-seen name casing.
///
/// Lookups are case-insensitive. Appending a name that already exists
/// folds the value into the existing entry, joined by `", "`
/// ([RFC-9110 Section 5.2](https://datatracker.ietf.org/doc/html/rfc9110#section-5.2)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Constructor.
    pub fn new() -> Self { Self::default() }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add a header, folding into an existing entry on a repeated name.
    pub fn append(&mut self, name: &str, value: &str) {
        if let Some((_, existing)) = self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            existing.push_str(", ");
            existing.push_str(value);
            return;
        }

        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(&name.into(), &value.into());
        }
        headers
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let headers: Headers = [("Sec-WebSocket-Key", "abc")].into_iter().collect();

        assert_eq!(headers.get("sec-websocket-key"), Some("abc"));
        assert_eq!(headers.get("SEC-WEBSOCKET-KEY"), Some("abc"));
        assert_eq!(headers.get("Sec-WebSocket-Accept"), None);
    }

    #[test]
    fn folding() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "text/plain");
        headers.append("Host", "example.com");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("accept"), Some("text/html, text/plain"));

        // first-seen casing survives
        let names: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["Accept", "Host"]);
    }
}
