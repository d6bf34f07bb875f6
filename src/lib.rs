//! wpchatbot - conversation engine for the embedded shop chat widget
//!
//! Submits user turns to the answering service, keeps the session going
//! across turns, and renders structured replies (plain text, option questions,
//! producer and product cards) into an append-only transcript.

pub mod backend;
pub mod config;
pub mod markup;
pub mod protocol;
pub mod render;
pub mod runtime;
pub mod sanitize;
pub mod session;
pub mod state_machine;
pub mod transcript;
