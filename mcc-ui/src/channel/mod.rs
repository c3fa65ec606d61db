//! Push channel to the realtime status source
//!
//! The dashboard never constructs connections itself: it is handed a
//! [`Connector`] and opens exactly one [`PushChannel`] per mount.

mod ws;

pub use ws::{WsChannel, WsConnector};

use async_trait::async_trait;
use mcc_common::events::{Command, ServerEvent};
use mcc_common::Result;

/// An open bidirectional event connection
#[async_trait]
pub trait PushChannel: Send {
    /// Send one outbound command. Fire-and-forget: no acknowledgement is awaited.
    async fn emit(&mut self, command: &Command) -> Result<()>;

    /// Next inbound event in arrival order.
    ///
    /// `None` once the connection is closed. `Some(Err(Error::Protocol(..)))`
    /// reports an undecodable frame; the connection stays usable.
    async fn next_event(&mut self) -> Option<Result<ServerEvent>>;

    async fn close(&mut self) -> Result<()>;
}

/// Opens push-channel connections
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn PushChannel>>;
}
