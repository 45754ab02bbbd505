//! WebSocket chat relay server: transport binding and diagnostics.

mod handler;
mod server;
mod signal;
pub mod state;
mod sweeper;

pub use server::Server;
pub use signal::shutdown_signal;
