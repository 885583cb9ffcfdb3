mod args;

use std::io::{self, Write};
use std::process;

use clap::Parser;
use env_logger::Env;
use gurl_core::{GurlClient, GurlError, TcpTransport};
use log::debug;

use args::Cli;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("gurl: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GurlError> {
    let config = cli.into_config()?;
    debug!("{} {} via {}", config.method, config.url, config.endpoint);

    let client = GurlClient::new(&config);
    let dispatched = client.send(TcpTransport)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&client.render(&dispatched))?;
    stdout.flush()?;
    Ok(())
}
