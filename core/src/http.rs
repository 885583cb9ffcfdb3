//! HTTP request and response types.
//!
//! # Design
//! Requests and responses are plain data. Request assembly produces an
//! `HttpRequest`; a [`crate::transport::Connection`] turns it into bytes on a
//! socket and hands back an `HttpResponse`. Nothing here performs I/O, which
//! keeps assembly and formatting testable without a network.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::GurlError;
use crate::headers::HeaderTable;

/// The methods gurl accepts on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Delete,
    Options,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Only POST and PUT get an encoded body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl FromStr for HttpMethod {
    type Err = GurlError;

    /// Case-insensitive; `get` becomes `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            _ => Err(GurlError::usage(format!("invalid method {s}"))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled outbound request.
///
/// The URL is what the server is told about (request line and `Host`); the
/// socket it travels on is chosen separately by [`crate::endpoint::resolve`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderTable,
    pub body: Vec<u8>,
}

/// A response read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Minor version of `HTTP/1.x`.
    pub version: u8,
    pub status: u16,
    pub reason: String,
    /// Headers in arrival order; repeated names are kept as separate entries.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True when any `Content-Type` value mentions `application/json`, so
    /// `application/json; charset=utf-8` qualifies.
    pub fn is_json(&self) -> bool {
        self.header_values("Content-Type")
            .any(|v| v.contains("application/json"))
    }

    pub fn status_line(&self) -> String {
        format!("HTTP/1.{} {} {}", self.version, self.status, self.reason)
    }
}
