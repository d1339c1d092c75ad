//! Wire types shared by the gstd daemon and its client.
//!
//! The daemon answers every request with a single [`Response`] envelope that
//! carries a [`ReturnCode`]. Both binaries agree on the framing constants in
//! [`framing`] so requests and responses can be delimited without relying on
//! the size of a single socket read.

mod code;
pub mod framing;
mod response;

pub use code::{InvalidReturnCode, ReturnCode};
pub use response::Response;
