//! Hiroba: a room-scoped real-time chat relay.
//!
//! Layers, from the inside out:
//! - `domain`: sessions, rooms, events and the traits the outer layers implement
//! - `infrastructure`: in-memory registry, WebSocket pusher and wire DTOs
//! - `usecase`: per-connection state machine and room transitions
//! - `ui`: axum routes, WebSocket binding and the idle sweeper

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
