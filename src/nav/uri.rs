use std::collections::BTreeMap;

use thiserror::Error;

use super::Location;
use crate::kinds::KindId;

const SCHEME: &str = "safta";
const AUTHORITY: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("expected a {SCHEME}:// link")]
    InvalidScheme,
    #[error("expected {SCHEME}://{AUTHORITY}/...")]
    InvalidAuthority,
    #[error("missing resource in link")]
    InvalidPath,
    #[error("unknown resource {0:?}")]
    UnsupportedRoute(String),
}

pub fn parse_deep_link(input: &str) -> Result<Location, UriError> {
    let (scheme, rest) = input
        .trim()
        .split_once("://")
        .ok_or(UriError::InvalidScheme)?;
    if scheme != SCHEME {
        return Err(UriError::InvalidScheme);
    }

    let (authority, path_and_query) = match rest.split_once('/') {
        Some((auth, remainder)) => (auth, remainder),
        None => (rest, ""),
    };

    if authority != AUTHORITY {
        return Err(UriError::InvalidAuthority);
    }

    let (path, query) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };

    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(percent_decode_path)
        .collect();

    let [resource] = segments.as_slice() else {
        return Err(UriError::InvalidPath);
    };
    let kind =
        KindId::from_slug(resource).ok_or_else(|| UriError::UnsupportedRoute(resource.clone()))?;

    Ok(Location::new(kind, parse_query(query)))
}

pub fn format_deep_link(location: &Location) -> String {
    let mut link = format!("{}://{}/{}", SCHEME, AUTHORITY, location.kind.slug());

    let query = build_query(&location.params);
    if !query.is_empty() {
        link.push('?');
        link.push_str(&query);
    }
    link
}

fn build_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn parse_query(query: Option<&str>) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let Some(query) = query else {
        return params;
    };

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let value = percent_decode_query(value);
        if !value.is_empty() {
            params.insert(percent_decode_query(key), value);
        }
    }

    params
}

fn percent_encode(input: &str) -> String {
    let mut out = String::new();
    for b in input.as_bytes() {
        match *b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(*b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn percent_decode_path(input: &str) -> String {
    percent_decode_inner(input, false)
}

fn percent_decode_query(input: &str) -> String {
    percent_decode_inner(input, true)
}

fn percent_decode_inner(input: &str, plus_as_space: bool) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    // Multi-byte characters are encoded byte by byte.
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    (*byte? as char).to_digit(16).map(|d| d as u8)
}
