//! Error taxonomy for the forwarder.
//!
//! Construction-time problems are `ConfigError`s and prevent the adapter
//! from ever being created. Send-time problems either recover inside the
//! stream loop or surface as a `StreamError` when the loop gives up, so the
//! host can decide whether to rebuild the forwarder.

use std::io;

use thiserror::Error;

/// Errors raised while parsing a field template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` opener without a matching `}}`.
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
    /// A placeholder that is not a `.Field` reference.
    #[error("malformed field reference at byte {0}")]
    MalformedField(usize),
}

/// Invalid configuration detected while building an adapter.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad transport: {0}")]
    UnknownTransport(String),
    #[error("unsupported syslog format: {0}")]
    UnknownFormat(String),
    #[error("unknown tcp framing value: {0}")]
    UnknownFraming(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The initial dial performed at construction failed.
    #[error("dial failed: {0}")]
    Dial(#[source] io::Error),
}

/// A template referenced a field the render context cannot supply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown template field: {0}")]
    UnknownField(String),
}

/// Fatal conditions that terminate an adapter's stream loop.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Rendering failed; a broken template affects every subsequent record
    /// identically, so the loop fails fast.
    #[error("message rendering failed: {0}")]
    Render(#[from] RenderError),
    /// Redialing the destination exhausted its retry budget.
    #[error("reconnect failed: {0}")]
    Reconnect(#[source] io::Error),
    /// The single resend permitted after a successful reconnect failed.
    #[error("write after reconnect failed: {0}")]
    Resend(#[source] io::Error),
}
