//! TCP listener for the command protocol.
//!
//! The listener binds the configured endpoint, accepts connections on a
//! background thread and hands each one to a [`ConnectionHandler`] on its own
//! thread.

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::{ListenerHandle, SocketListener};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
