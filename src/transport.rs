//! Transport primitives: dialing and connection handles.
//!
//! The adapter never inspects a connection's dynamic type. Each transport
//! reports its kind (datagram or stream) once, and the adapter carries that
//! flag alongside the boxed connection.

use std::{
    io::{self, Write},
    net::{TcpStream, ToSocketAddrs, UdpSocket},
};

use native_tls::TlsConnector;

use crate::{error::ConfigError, route::RouteOptions};

/// Route option that disables TLS certificate validation (tests only).
pub const TLS_SKIP_VERIFY_OPTION: &str = "tls_skip_verify";

/// Delivery semantics of a dialed connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// Fire-and-forget datagrams; write errors drop the message.
    Datagram,
    /// Connection-oriented byte stream; write errors trigger recovery.
    Stream,
}

/// An open connection to the collector.
///
/// Blanket-implemented for any writable, sendable stream so tests can
/// substitute in-memory connections.
pub trait Conn: Write + Send {}

impl<T: Write + Send> Conn for T {}

/// Dial capability for one transport flavour.
pub trait Transport: Send + Sync {
    /// Delivery semantics of connections this transport produces.
    fn kind(&self) -> TransportKind;

    /// Open a connection to `address`.
    fn dial(&self, address: &str, options: &RouteOptions) -> io::Result<Box<dyn Conn>>;
}

/// Look up a transport implementation by route name.
pub fn lookup_transport(name: &str) -> Result<Box<dyn Transport>, ConfigError> {
    match name {
        "udp" => Ok(Box::new(UdpTransport)),
        "tcp" => Ok(Box::new(TcpTransport)),
        "tls" | "tcp+tls" => Ok(Box::new(TlsTransport)),
        other => Err(ConfigError::UnknownTransport(other.to_owned())),
    }
}

/// UDP datagram transport.
pub struct UdpTransport;

/// A connected UDP socket exposed as a writer; each write is one datagram.
struct UdpConn(UdpSocket);

impl Write for UdpConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for UdpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Datagram
    }

    fn dial(&self, address: &str, _options: &RouteOptions) -> io::Result<Box<dyn Conn>> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(address)?;
        Ok(Box::new(UdpConn(socket)))
    }
}

/// Plain TCP transport.
pub struct TcpTransport;

impl Transport for TcpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Stream
    }

    fn dial(&self, address: &str, _options: &RouteOptions) -> io::Result<Box<dyn Conn>> {
        Ok(Box::new(connect_tcp(address)?))
    }
}

/// TCP transport wrapped in TLS via the platform's TLS stack.
pub struct TlsTransport;

impl Transport for TlsTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Stream
    }

    fn dial(&self, address: &str, options: &RouteOptions) -> io::Result<Box<dyn Conn>> {
        let stream = connect_tcp(address)?;
        let domain = address.rsplit_once(':').map_or(address, |(host, _)| host);
        let mut builder = TlsConnector::builder();
        if options.get(TLS_SKIP_VERIFY_OPTION).map(String::as_str) == Some("true") {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        let connector = builder.build().map_err(io::Error::other)?;
        let stream = connector.connect(domain, stream).map_err(io::Error::other)?;
        Ok(Box::new(stream))
    }
}

fn connect_tcp(address: &str) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in address.to_socket_addrs()? {
        match TcpStream::connect(addr) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err
        .unwrap_or_else(|| io::Error::other(format!("no addresses resolved for {address}"))))
}
