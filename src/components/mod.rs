//! Inbox components

pub mod messages;
mod nav_header;

pub use nav_header::*;
