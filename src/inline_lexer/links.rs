//! The link reference table consumed by reference-style links and images.
//!
//! Keys are normalized the same way on insert and on lookup: every run of
//! whitespace collapses to one space and the result is lower-cased.

use std::collections::HashMap;

use serde::Deserialize;

/// A link reference definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            href: href.into(),
            title: title.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, Link>")]
pub struct Links {
    entries: HashMap<String, Link>,
}

/// Collapse whitespace runs to a single space and lower-case.
pub fn normalize_key(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out.to_lowercase()
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, link: Link) -> Option<Link> {
        self.entries.insert(normalize_key(label), link)
    }

    pub fn get(&self, label: &str) -> Option<&Link> {
        self.entries.get(&normalize_key(label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.entries.iter().map(|(key, link)| (key.as_str(), link))
    }
}

impl From<HashMap<String, Link>> for Links {
    fn from(entries: HashMap<String, Link>) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Link)> for Links {
    fn from_iter<I: IntoIterator<Item = (K, Link)>>(iter: I) -> Self {
        let mut links = Links::new();
        for (label, link) in iter {
            links.insert(label.as_ref(), link);
        }
        links
    }
}
