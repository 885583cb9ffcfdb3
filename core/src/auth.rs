//! `--auth` credentials.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{GurlError, Result};

/// Authentication scheme selected with `--auth-type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthType {
    #[default]
    Basic,
    /// Accepted on the command line; no credentials are sent.
    Digest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse `USER:PASS`. Exactly one `:` is allowed.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 2 {
            return Err(GurlError::usage(format!("invalid syntax for auth: {raw}")));
        }
        Ok(Self {
            username: parts[0].to_string(),
            password: parts[1].to_string(),
        })
    }

    /// `Basic <base64(user:pass)>`
    pub fn basic_header_value(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}
