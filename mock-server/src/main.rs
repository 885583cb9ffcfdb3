//! Standalone gurl fixture server, for trying the CLI by hand:
//! `gurl --server 127.0.0.1:8088 POST example.com/echo name=joe`.

use tokio::net::TcpListener;

const DEFAULT_PORT: &str = "8088";

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("gurl fixture server on http://{addr} (routes: /echo, /json, /status/{{code}}, /close)");
    mock_server::run(listener).await
}
