//! Connections gurl dials by hand.
//!
//! # Design
//! `Transport` and `Connection` are the seam between request dispatch and
//! the network. [`TcpTransport`] is the real thing: a blocking `TcpStream`
//! to whatever endpoint the resolver picked, with the request written by
//! [`crate::codec`]. Tests plug in fakes to drive the dispatcher through
//! every outcome without sockets.

use std::io::{BufReader, Write};
use std::net::{Shutdown, TcpStream};

use log::debug;

use crate::codec;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// How a request/response exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// The response was read and the connection is still usable.
    Response(HttpResponse),
    /// The peer closed the connection right after a complete response. The
    /// response is valid; this is not a failure.
    ClosedAfter(HttpResponse),
}

impl Exchange {
    pub fn peer_closed(&self) -> bool {
        matches!(self, Exchange::ClosedAfter(_))
    }

    pub fn into_response(self) -> HttpResponse {
        match self {
            Exchange::Response(response) | Exchange::ClosedAfter(response) => response,
        }
    }
}

/// One open connection.
pub trait Connection {
    /// Write the whole request.
    fn send(&mut self, request: &HttpRequest) -> Result<()>;

    /// Read one response to a request made with `method`.
    fn receive(&mut self, method: HttpMethod) -> Result<Exchange>;

    /// Release the connection. Calling it more than once is harmless.
    fn close(&mut self);

    /// Send `request` and read its response. This is the call dispatch makes.
    fn exchange(&mut self, request: &HttpRequest) -> Result<Exchange> {
        self.send(request)?;
        self.receive(request.method)
    }
}

/// Something that can open connections to an endpoint.
pub trait Transport {
    type Conn: Connection;

    fn dial(&mut self, endpoint: &Endpoint) -> Result<Self::Conn>;
}

/// Plain TCP, no TLS, no timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    type Conn = TcpConnection;

    fn dial(&mut self, endpoint: &Endpoint) -> Result<TcpConnection> {
        debug!("dialing {endpoint}");
        let stream = TcpStream::connect(endpoint.to_string())?;
        TcpConnection::new(stream)
    }
}

#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    closed: bool,
}

impl TcpConnection {
    pub fn new(stream: TcpStream) -> Result<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            stream,
            reader,
            closed: false,
        })
    }
}

impl Connection for TcpConnection {
    fn send(&mut self, request: &HttpRequest) -> Result<()> {
        let bytes = codec::encode_request(request);
        self.stream.write_all(&bytes)?;
        self.stream.flush()?;
        debug!("wrote {} bytes", bytes.len());
        Ok(())
    }

    fn receive(&mut self, method: HttpMethod) -> Result<Exchange> {
        let (response, peer_closed) = codec::read_response(&mut self.reader, method)?;
        debug!("received {}", response.status_line());
        Ok(if peer_closed {
            Exchange::ClosedAfter(response)
        } else {
            Exchange::Response(response)
        })
    }

    fn close(&mut self) {
        if !self.closed {
            // The peer may already be gone; there is nothing left to do then.
            let _ = self.stream.shutdown(Shutdown::Both);
            self.closed = true;
        }
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        self.close();
    }
}
