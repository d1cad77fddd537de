//! Forwarding adapter: owns the live connection and drives the send loop.
//!
//! One adapter forwards one ordered record stream to one destination. All
//! writes, retries, and reconnects happen sequentially on the thread that
//! runs [`SyslogAdapter::stream`]; there is no internal parallelism. A
//! write that hangs indefinitely blocks the loop for as long as the
//! transport lets it; no timeout is imposed here beyond what the
//! connection itself enforces.

use std::{
    io::{self},
    thread,
};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, warn};

use crate::{
    config::SyslogConfig,
    error::{ConfigError, StreamError},
    framing::TcpFraming,
    log_record::LogRecord,
    render::MessageRenderer,
    retry::retry_exp,
    route::RouteConfig,
    transport::{lookup_transport, Conn, Transport, TransportKind},
};

/// Bounded capacity of the channel created by [`spawn_adapter`].
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Streams log records to a collector in syslog format.
pub struct SyslogAdapter {
    conn: Box<dyn Conn>,
    kind: TransportKind,
    renderer: MessageRenderer,
    framing: TcpFraming,
    transport: Box<dyn Transport>,
    route: RouteConfig,
    retry_count: u32,
}

impl SyslogAdapter {
    /// Build an adapter for `route`, dialing through the supplied transport.
    ///
    /// Templates are compiled, the framing mode and hostname source are
    /// resolved, and the connection is dialed here; every configuration
    /// problem surfaces as a `ConfigError` before any record is consumed.
    pub fn build(
        route: RouteConfig,
        config: &SyslogConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let renderer = MessageRenderer::new(config, &route)?;
        let kind = transport.kind();
        let framing = match kind {
            TransportKind::Stream => route
                .option("tcp_framing")
                .unwrap_or(&config.tcp_framing)
                .parse()?,
            // Datagram boundaries delimit messages already.
            TransportKind::Datagram => TcpFraming::Traditional,
        };
        let conn = transport
            .dial(&route.address, &route.options)
            .map_err(ConfigError::Dial)?;
        Ok(Self {
            conn,
            kind,
            renderer,
            framing,
            transport,
            route,
            retry_count: config.retry_count,
        })
    }

    /// Build an adapter resolving the transport from the route's name.
    pub fn from_route(route: RouteConfig, config: &SyslogConfig) -> Result<Self, ConfigError> {
        let transport = lookup_transport(&route.transport)?;
        Self::build(route, config, transport)
    }

    /// Forward records until the channel closes or a fatal error occurs.
    ///
    /// Records are processed strictly in order, one at a time. Rendering
    /// failures are fatal: a broken template would fail every subsequent
    /// record the same way. Write failures on datagram transports drop the
    /// record; on stream transports they enter the retry/reconnect path,
    /// whose exhaustion terminates the loop with an error.
    pub fn stream(mut self, records: Receiver<LogRecord>) -> Result<(), StreamError> {
        while let Ok(record) = records.recv() {
            let buf = match self.renderer.render(&record) {
                Ok(buf) => buf,
                Err(err) => {
                    warn!("syslog: terminating stream, rendering failed: {err}");
                    return Err(StreamError::Render(err));
                }
            };
            let buf = match self.kind {
                TransportKind::Stream => self.framing.apply(buf),
                TransportKind::Datagram => buf,
            };
            if let Err(err) = send(self.conn.as_mut(), &buf) {
                match self.kind {
                    TransportKind::Datagram => {
                        warn!("syslog: dropped record, datagram write failed: {err}");
                        continue;
                    }
                    TransportKind::Stream => self.recover(&buf, err)?,
                }
            }
        }
        debug!("syslog: record channel closed");
        Ok(())
    }

    /// Recover from a failed stream write holding the pending frame.
    fn recover(&mut self, buf: &[u8], err: io::Error) -> Result<(), StreamError> {
        warn!("syslog: write failed: {err}");
        if is_transient(&err) {
            debug!("syslog: retrying write up to {} times", self.retry_count);
            match retry_exp(|| send(self.conn.as_mut(), buf), self.retry_count) {
                Ok(()) => {
                    info!("syslog: write retry successful");
                    return Ok(());
                }
                Err(retry_err) => warn!("syslog: write retry failed: {retry_err}"),
            }
        }
        self.reconnect()?;
        if let Err(resend_err) = send(self.conn.as_mut(), buf) {
            warn!("syslog: terminating stream, resend after reconnect failed: {resend_err}");
            return Err(StreamError::Resend(resend_err));
        }
        info!("syslog: reconnect successful");
        Ok(())
    }

    /// Redial the destination under the retry budget, replacing the owned
    /// connection on success.
    fn reconnect(&mut self) -> Result<(), StreamError> {
        debug!("syslog: reconnecting up to {} times", self.retry_count);
        let conn = retry_exp(
            || self.transport.dial(&self.route.address, &self.route.options),
            self.retry_count,
        )
        .map_err(|err| {
            warn!("syslog: terminating stream, reconnect attempts exhausted: {err}");
            StreamError::Reconnect(err)
        })?;
        self.conn = conn;
        Ok(())
    }
}

fn send(conn: &mut dyn Conn, buf: &[u8]) -> io::Result<()> {
    conn.write_all(buf)?;
    conn.flush()
}

/// Whether a stream write error is worth retrying on the same connection.
///
/// Timeout-shaped errors are; connection resets and everything else go
/// straight to reconnect.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Run an adapter's stream loop on a dedicated worker thread.
///
/// Returns the sending half of a bounded record channel and the join
/// handle carrying the loop's exit result. Dropping the sender closes the
/// stream gracefully.
pub fn spawn_adapter(
    adapter: SyslogAdapter,
) -> (Sender<LogRecord>, thread::JoinHandle<Result<(), StreamError>>) {
    let (tx, rx) = bounded(DEFAULT_CHANNEL_CAPACITY);
    let handle = thread::spawn(move || adapter.stream(rx));
    (tx, handle)
}
