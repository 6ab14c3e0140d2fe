// Library root: re-exports all modules so integration tests and the binary
// can access the server's public API.

pub mod config;
pub mod protocol;
pub mod service;
pub mod ws_server;
