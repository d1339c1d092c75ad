//! Test suites exercising the daemon over real sockets.

mod support;
