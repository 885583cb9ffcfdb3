//! URL parsing and dial-target resolution.
//!
//! # Design
//! The socket gurl connects to and the host the request claims to be for are
//! decided separately. [`resolve`] picks the socket: the `--server` override
//! when given, the URL's own host otherwise, with port 80 filled in when no
//! port is written. The request line and `Host` header are always built from
//! the URL, so pointing `--server` at a backend behind a load balancer still
//! exercises the right virtual host.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GurlError, Result};

pub const DEFAULT_PORT: u16 = 80;

/// A `host:port` pair to dial. IPv6 hosts keep their brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse the URL argument, assuming `http://` when no scheme is written.
///
/// Only schemes starting with `http` are accepted.
pub fn parse_url(raw: &str) -> Result<Url> {
    let url = if has_scheme(raw) {
        Url::parse(raw)
    } else {
        Url::parse(&format!("http://{raw}"))
    }
    .map_err(|e| GurlError::Url(format!("{raw}: {e}")))?;

    if !url.scheme().starts_with("http") {
        return Err(GurlError::Url(format!("{raw}: unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(GurlError::Url(format!("{raw}: missing host")));
    }
    Ok(url)
}

/// A scheme is only present when `://` comes before any path, query or
/// fragment, so `example.com/login?next=http://other/` has none.
fn has_scheme(raw: &str) -> bool {
    match raw.find("://") {
        Some(at) => !raw[..at].contains(['/', '?', '#']),
        None => false,
    }
}

/// Choose the endpoint to dial for `url`, honouring an optional override.
pub fn resolve(url: &Url, server: Option<&str>) -> Result<Endpoint> {
    if let Some(server) = server {
        return parse_authority(server);
    }
    let host = url
        .host_str()
        .ok_or_else(|| GurlError::Url(format!("{url}: missing host")))?;
    // `Url::port` hides the scheme default, so https without a port also
    // lands on 80 here.
    Ok(Endpoint {
        host: host.to_string(),
        port: url.port().unwrap_or(DEFAULT_PORT),
    })
}

/// Parse `HOST`, `HOST:PORT`, `[V6]` or `[V6]:PORT`.
pub fn parse_authority(authority: &str) -> Result<Endpoint> {
    let invalid = || GurlError::usage(format!("invalid server {authority}"));

    let (host, port) = if authority.starts_with('[') {
        let end = authority.find(']').ok_or_else(invalid)?;
        let rest = &authority[end + 1..];
        let port = match rest {
            "" => None,
            _ => Some(rest.strip_prefix(':').ok_or_else(invalid)?),
        };
        (&authority[..=end], port)
    } else {
        match authority.split_once(':') {
            Some((_, port)) if port.contains(':') => return Err(invalid()),
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };

    if host.is_empty() || host == "[]" {
        return Err(invalid());
    }
    let port = match port {
        Some(port) => port.parse::<u16>().map_err(|_| invalid())?,
        None => DEFAULT_PORT,
    };
    Ok(Endpoint {
        host: host.to_string(),
        port,
    })
}
