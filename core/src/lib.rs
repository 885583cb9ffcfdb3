//! Core of gurl, a command-line HTTP client.
//!
//! # Overview
//! Turns a method, a URL and freeform request items (`key=value` body
//! fields, `Name:Value` headers) into an HTTP/1.1 request, sends it over a
//! connection gurl dials itself, and renders the response.
//!
//! # Design
//! - [`Config`] is validated once and passed by reference; no global state.
//! - Request assembly ([`GurlClient::build_request`]) does no I/O.
//! - The dial target is resolved separately from the URL, so `--server`
//!   can reroute the socket while the request still names the original
//!   host.
//! - The network sits behind [`Transport`] / [`Connection`]; a peer that
//!   closes right after a complete response yields
//!   [`Exchange::ClosedAfter`], not an error.
//! - Every failure is a [`GurlError`] returned to the caller; only the
//!   binary decides to exit.

pub mod auth;
pub mod body;
pub mod client;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod http;
pub mod items;
pub mod output;
pub mod transport;

pub use auth::{AuthType, Credentials};
pub use body::{BodyEncoding, BodyFieldSet};
pub use client::GurlClient;
pub use config::{Config, ConfigBuilder};
pub use dispatch::{DispatchState, Dispatched, Dispatcher};
pub use endpoint::Endpoint;
pub use error::{GurlError, Result};
pub use headers::HeaderTable;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use items::{Assignment, ParsedItem};
pub use transport::{Connection, Exchange, TcpConnection, TcpTransport, Transport};
