//! Configuration for agent tool registries and the model endpoint they serve.
//!
//! [`RegistryConfig`] tunes catalog generation and is read from JSON or the
//! process environment. [`ModelEndpoint`] carries the credentials an
//! application needs to talk to a chat-completions API; the registry itself
//! never reads it.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::load_dotenv;
pub use schema::{ModelEndpoint, RegistryConfig};
