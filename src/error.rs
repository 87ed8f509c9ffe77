//! Error types for the ReJSON bindings.
//!
//! Every failure produced by a client, network or server call is carried as
//! [`ReJsonError::Redis`] wrapping the [`redis::RedisError`] as received; this
//! crate never reinterprets server error payloads.

use thiserror::Error;

/// The error type returned by command dispatch and the typed JSON commands.
#[derive(Debug, Error)]
pub enum ReJsonError {
    /// An error raised by the underlying `redis` client: I/O, protocol, or an
    /// error reply from the server (e.g. `ERR key is not a JSON value`).
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Failure to serialize a value to JSON text or to parse a JSON reply.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection to the server could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// A reply arrived in a shape the command's signature does not declare.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The name is not part of the JSON command catalog.
    #[error("unknown JSON command: {0}")]
    UnknownCommand(String),

    /// A command name was empty or contained whitespace.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),
}

/// Convenience type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReJsonError>;
