//! Forward structured log records to a remote syslog collector.
//!
//! Each record is rendered into an RFC 5424 or RFC 3164 message, optionally
//! octet-count framed for stream transports (RFC 6587), and written to a
//! single owned connection. Write failures on TCP and TLS are classified
//! and recovered through bounded in-place retries and reconnect-and-resend;
//! UDP write failures drop the record. Delivery is at-least-once and
//! best-effort per the retry budget; there is no queueing beyond the
//! in-flight message, no deduplication, and no acknowledgment.
//!
//! The host hands the adapter a [`RouteConfig`], an immutable
//! [`SyslogConfig`], and (directly or by name) a [`Transport`] to dial
//! through, then feeds records into [`SyslogAdapter::stream`] or the
//! channel returned by [`spawn_adapter`].

pub mod adapter;
pub mod config;
pub mod error;
pub mod framing;
pub mod log_record;
pub mod priority;
pub mod render;
pub mod retry;
pub mod route;
pub mod template;
pub mod transport;

pub use adapter::{spawn_adapter, SyslogAdapter, DEFAULT_CHANNEL_CAPACITY};
pub use config::SyslogConfig;
pub use error::{ConfigError, RenderError, StreamError, TemplateError};
pub use framing::TcpFraming;
pub use log_record::{ContainerInfo, LogRecord};
pub use priority::{Facility, Priority, Severity};
pub use render::{MessageRenderer, SyslogFormat};
pub use retry::retry_exp;
pub use route::{RouteConfig, RouteOptions};
pub use template::Template;
pub use transport::{
    lookup_transport, Conn, TcpTransport, TlsTransport, Transport, TransportKind, UdpTransport,
};
