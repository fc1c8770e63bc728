//! Core types and trait definitions for the devlink social backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the documents, the rules for mutating their embedded sub-collections, and
//! the ownership checks that gate every mutation.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod collection;
pub mod error;
pub mod guard;
pub mod identity;
pub mod patch;
pub mod post;
pub mod profile;
pub mod store;

pub use error::{Error, Result};
