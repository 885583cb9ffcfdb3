//! Request dispatch: one dial, one request, one response.
//!
//! ```text
//! Unconnected -> Connected -> RequestSent -> ResponseReceived -> Closed
//! ```
//!
//! The write and the read happen in one [`Connection::exchange`] call, so
//! `RequestSent` and `ResponseReceived` are recorded together when it
//! returns a response. A dial failure leaves the dispatcher `Unconnected`.
//! Once dialed, the connection is closed on every path, including errors and
//! the peer having closed it already.

use log::debug;

use crate::codec;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Connection, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Unconnected,
    Connected,
    RequestSent,
    ResponseReceived,
    Closed,
}

/// What a successful dispatch hands back.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub response: HttpResponse,
    /// The serialized request, present when echo was requested.
    pub request_dump: Option<Vec<u8>>,
    pub peer_closed: bool,
}

pub struct Dispatcher<T: Transport> {
    transport: T,
    state: DispatchState,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: DispatchState::Unconnected,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn dispatch(&mut self, endpoint: &Endpoint, request: &HttpRequest, echo: bool) -> Result<Dispatched> {
        let mut conn = self.transport.dial(endpoint)?;
        self.transition(DispatchState::Connected);

        let outcome = conn.exchange(request);
        if outcome.is_ok() {
            self.transition(DispatchState::RequestSent);
            self.transition(DispatchState::ResponseReceived);
        }
        conn.close();
        self.transition(DispatchState::Closed);

        let exchange = outcome?;
        let peer_closed = exchange.peer_closed();
        if peer_closed {
            debug!("peer closed the connection after the response");
        }
        Ok(Dispatched {
            response: exchange.into_response(),
            request_dump: echo.then(|| codec::encode_request(request)),
            peer_closed,
        })
    }

    fn transition(&mut self, next: DispatchState) {
        debug!("dispatch {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
