//! Request assembly and the end-to-end run of one invocation.
//!
//! # Design
//! `GurlClient` borrows a [`Config`] and carries no other state. The work is
//! split the same way the wire is: `build_request` turns request items into
//! an `HttpRequest` without I/O, `send` hands it to a [`Transport`] through
//! the [`Dispatcher`], and `render` turns the result into stdout bytes.
//!
//! Header precedence, lowest first: defaults (`User-Agent`, `Accept`), auth,
//! body `Content-Type`, then request items in command-line order.

use log::warn;

use crate::auth::AuthType;
use crate::body::{BodyEncoding, BodyFieldSet};
use crate::config::Config;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::error::Result;
use crate::headers::HeaderTable;
use crate::http::HttpRequest;
use crate::items::{self, Assignment};
use crate::output;
use crate::transport::Transport;

pub const JSON_ACCEPT: &str = "application/json, */*";

#[derive(Debug, Clone, Copy)]
pub struct GurlClient<'a> {
    config: &'a Config,
}

impl<'a> GurlClient<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build_request(&self) -> Result<HttpRequest> {
        let config = self.config;
        let method = config.method;
        let parsed = items::parse_items(&config.items)?;

        let mut headers = HeaderTable::with_defaults();
        if config.body_encoding == BodyEncoding::Json {
            headers.set("Accept", JSON_ACCEPT);
        }
        if let Some(credentials) = &config.auth {
            match config.auth_type {
                AuthType::Basic => headers.set("Authorization", &credentials.basic_header_value()),
                AuthType::Digest => warn!("digest authentication is not implemented; sending no credentials"),
            }
        }
        if method.carries_body() {
            headers.set("Content-Type", config.body_encoding.content_type());
        }

        let mut fields = BodyFieldSet::new();
        let mut ignored = 0;
        for item in parsed {
            match item {
                Assignment::Header { name, value } => headers.apply(&name, &value),
                Assignment::Body { key, value } if method.carries_body() => fields.insert(&key, &value),
                Assignment::Body { .. } => ignored += 1,
            }
        }
        if ignored > 0 {
            warn!("{method} requests carry no body; ignoring {ignored} body field(s)");
        }

        let body = if method.carries_body() {
            fields.encode(config.body_encoding)?
        } else {
            Vec::new()
        };

        Ok(HttpRequest {
            method,
            url: config.url.clone(),
            headers,
            body,
        })
    }

    pub fn send<T: Transport>(&self, transport: T) -> Result<Dispatched> {
        let request = self.build_request()?;
        let mut dispatcher = Dispatcher::new(transport);
        dispatcher.dispatch(&self.config.endpoint, &request, self.config.verbose)
    }

    /// Everything that goes to stdout: the echoed request when verbose,
    /// then the response.
    pub fn render(&self, dispatched: &Dispatched) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(dump) = &dispatched.request_dump {
            out.extend_from_slice(&output::render_request(dump));
        }
        out.extend_from_slice(&output::render_response(&dispatched.response, self.config.indent));
        out
    }
}
