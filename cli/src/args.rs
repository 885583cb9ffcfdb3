//! Command-line surface.

use clap::{ArgAction, Parser, ValueEnum};
use gurl_core::{AuthType, Config, Result};

#[derive(Parser, Debug)]
#[command(
    name = "gurl",
    version,
    about = "Build an HTTP request from request items and print the response"
)]
pub struct Cli {
    /// GET, HEAD, DELETE, OPTIONS, POST or PUT (any case)
    pub method: String,

    /// Request URL; http:// is assumed when no scheme is given
    pub url: String,

    /// key=value body fields and Name:Value headers (Name: removes a header)
    pub items: Vec<String>,

    /// Serialize body fields as a JSON object
    #[arg(long, conflicts_with = "form")]
    pub json: bool,

    /// Serialize body fields as form fields (default)
    #[arg(long)]
    pub form: bool,

    /// Print the request as well as the response
    #[arg(long)]
    pub verbose: bool,

    /// Indent JSON response bodies
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        conflicts_with = "noindent"
    )]
    pub indent: bool,

    /// Print response bodies as received
    #[arg(long)]
    pub noindent: bool,

    /// Credentials as USER:PASS
    #[arg(long, value_name = "USER:PASS")]
    pub auth: Option<String>,

    /// Authentication scheme
    #[arg(long, value_enum, default_value_t = AuthKind::Basic)]
    pub auth_type: AuthKind,

    /// Connect to HOST[:PORT] instead of the URL's host, still sending the
    /// URL's Host header
    #[arg(long, value_name = "HOST[:PORT]")]
    pub server: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthKind {
    Basic,
    Digest,
}

impl From<AuthKind> for AuthType {
    fn from(kind: AuthKind) -> Self {
        match kind {
            AuthKind::Basic => AuthType::Basic,
            AuthKind::Digest => AuthType::Digest,
        }
    }
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        Config::builder(self.method, self.url)
            .items(self.items)
            .json(self.json)
            .form(self.form)
            .verbose(self.verbose)
            .indent(self.indent && !self.noindent)
            .auth(self.auth)
            .auth_type(self.auth_type.into())
            .server(self.server)
            .build()
    }
}
