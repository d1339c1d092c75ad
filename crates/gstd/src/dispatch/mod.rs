//! Request dispatch for the command protocol.
//!
//! A client sends one request line and receives one response:
//!
//! ```text
//! pipeline_create p0 videotestsrc ! fakesink\n
//! ```
//!
//! ```text
//! {
//!   "code": 0,
//!   "description": "Success",
//!   "response": null
//! }\0
//! ```
//!
//! The verb is either one of the primitives `create`, `read`, `update` and
//! `delete`, or an alias that expands to exactly one primitive. The primitive
//! addresses a path in the resource tree rooted at the session.

mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::errors::DispatchError;
pub(crate) use self::handler::DispatchConnectionHandler;
pub use self::request::CommandRequest;
pub use self::router::{Command, CommandRouter};
