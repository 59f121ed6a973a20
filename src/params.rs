use std::collections::BTreeMap;

use tracing::warn;

/// Flat string key/value parameter source, typically parsed from a
/// URL-style query string. This is the only shape the resolver consumes;
/// where the raw bytes came from is the host's business.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParams {
    map: BTreeMap<String, String>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=hello%20there&c`. A pair without `=` becomes an empty
    /// value. Malformed percent escapes pass through verbatim.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut map = BTreeMap::new();
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            map.insert(percent_decode(key), percent_decode(value));
        }
        Self { map }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// True when the key is absent or its value is empty after trimming.
    /// Blank overrides fall through to the preset and default layers.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).is_none_or(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match hex_pair(bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: Option<u8>, lo: Option<u8>) -> Option<u8> {
    let hi = (hi? as char).to_digit(16)? as u8;
    let lo = (lo? as char).to_digit(16)? as u8;
    Some(hi << 4 | lo)
}

/// Truthy-string convention for boolean parameters. Unrecognized strings
/// yield `None` so the caller can fall through to the next layer.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Comma-delimited list; entries are trimmed and empties dropped.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .collect()
}

/// `name:value` pairs out of an already-split list. Entries missing the
/// colon are dropped, not fatal; well-formed entries still apply.
pub fn parse_pairs(entries: &[String]) -> Vec<(String, String)> {
    entries
        .iter()
        .filter_map(|entry| match entry.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Some((name.trim().to_owned(), value.trim().to_owned()))
            }
            _ => {
                warn!(entry = %entry, "dropping malformed name:value pair");
                None
            }
        })
        .collect()
}

/// `name:rank` pairs with numeric ranks; non-numeric ranks are dropped.
pub fn parse_rank_pairs(entries: &[String]) -> Vec<(String, i64)> {
    parse_pairs(entries)
        .into_iter()
        .filter_map(|(name, value)| match value.parse::<i64>() {
            Ok(rank) => Some((name, rank)),
            Err(_) => {
                warn!(name = %name, value = %value, "dropping rank pair with non-numeric rank");
                None
            }
        })
        .collect()
}
