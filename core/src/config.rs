//! The invocation, validated once.
//!
//! # Design
//! `Config` is built from command-line arguments by [`ConfigBuilder::build`]
//! and never changes afterwards. Everything that can be rejected before the
//! network is touched is rejected here: the method, the URL and its scheme,
//! conflicting body flags, auth syntax and the `--server` override. Request
//! items are kept raw and classified during request assembly.

use url::Url;

use crate::auth::{AuthType, Credentials};
use crate::body::BodyEncoding;
use crate::endpoint::{self, Endpoint};
use crate::error::{GurlError, Result};
use crate::http::HttpMethod;

#[derive(Debug, Clone)]
pub struct Config {
    pub method: HttpMethod,
    pub url: Url,
    pub items: Vec<String>,
    pub body_encoding: BodyEncoding,
    pub verbose: bool,
    pub indent: bool,
    pub auth: Option<Credentials>,
    pub auth_type: AuthType,
    /// Where to dial. Differs from the URL's host when `--server` is given.
    pub endpoint: Endpoint,
}

impl Config {
    pub fn builder(method: impl Into<String>, url: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            method: method.into(),
            url: url.into(),
            items: Vec::new(),
            json: false,
            form: false,
            verbose: false,
            indent: true,
            auth: None,
            auth_type: AuthType::default(),
            server: None,
        }
    }
}

/// Raw arguments on their way to a [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    method: String,
    url: String,
    items: Vec<String>,
    json: bool,
    form: bool,
    verbose: bool,
    indent: bool,
    auth: Option<String>,
    auth_type: AuthType,
    server: Option<String>,
}

impl ConfigBuilder {
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Form is already the default; the flag only matters for the
    /// exclusivity check against `json`.
    pub fn form(mut self, form: bool) -> Self {
        self.form = form;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn auth(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }

    pub fn auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    pub fn server(mut self, server: Option<String>) -> Self {
        self.server = server;
        self
    }

    pub fn build(self) -> Result<Config> {
        let method: HttpMethod = self.method.parse()?;
        if self.json && self.form {
            return Err(GurlError::usage("json and form flags are mutually exclusive"));
        }
        let url = endpoint::parse_url(&self.url)?;
        let endpoint = endpoint::resolve(&url, self.server.as_deref())?;
        let auth = self.auth.as_deref().map(Credentials::parse).transpose()?;

        Ok(Config {
            method,
            url,
            items: self.items,
            body_encoding: if self.json {
                BodyEncoding::Json
            } else {
                BodyEncoding::Form
            },
            verbose: self.verbose,
            indent: self.indent,
            auth,
            auth_type: self.auth_type,
            endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::builder("get", "http://example.com").build().unwrap();
        assert_eq!(config.method, HttpMethod::Get);
        assert_eq!(config.body_encoding, BodyEncoding::Form);
        assert!(config.indent);
        assert!(!config.verbose);
        assert!(config.items.is_empty());
        assert!(config.auth.is_none());
        assert_eq!(config.endpoint.to_string(), "example.com:80");
    }

    #[test]
    fn json_selects_json_encoding() {
        let config = Config::builder("POST", "example.com").json(true).build().unwrap();
        assert_eq!(config.body_encoding, BodyEncoding::Json);
    }

    #[test]
    fn json_and_form_conflict() {
        let err = Config::builder("POST", "example.com")
            .json(true)
            .form(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, GurlError::Usage(_)));
    }

    #[test]
    fn invalid_method_is_rejected_first() {
        let err = Config::builder("PATCH", "ftp://nowhere").build().unwrap_err();
        assert_eq!(err.to_string(), "invalid method PATCH");
    }

    #[test]
    fn bad_scheme_is_a_url_error() {
        let err = Config::builder("GET", "ftp://example.com").build().unwrap_err();
        assert!(matches!(err, GurlError::Url(_)));
    }

    #[test]
    fn server_override_changes_only_the_endpoint() {
        let config = Config::builder("GET", "http://example.com/path")
            .server(Some("10.0.0.5".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.endpoint.to_string(), "10.0.0.5:80");
        assert_eq!(config.url.host_str(), Some("example.com"));
    }

    #[test]
    fn auth_is_parsed() {
        let config = Config::builder("GET", "example.com")
            .auth(Some("joe:pw".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.auth.unwrap().username, "joe");

        let err = Config::builder("GET", "example.com")
            .auth(Some("joe".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, GurlError::Usage(_)));
    }
}
