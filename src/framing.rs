//! Message framing for stream-oriented transports.

use std::str::FromStr;

use crate::error::ConfigError;

/// How message boundaries are delimited on a TCP or TLS byte stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TcpFraming {
    /// Rely on the trailing newline as the delimiter.
    #[default]
    Traditional,
    /// Prefix each message with its byte length, RFC 6587 section 3.4.1.
    OctetCounted,
}

impl FromStr for TcpFraming {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "traditional" => Ok(Self::Traditional),
            "octet-counted" => Ok(Self::OctetCounted),
            other => Err(ConfigError::UnknownFraming(other.to_owned())),
        }
    }
}

impl TcpFraming {
    /// Wrap a rendered message for the wire.
    ///
    /// Only meaningful on stream transports; datagram writes carry the
    /// buffer unchanged and never call this.
    pub fn apply(self, buf: Vec<u8>) -> Vec<u8> {
        match self {
            Self::Traditional => buf,
            Self::OctetCounted => {
                let mut framed = format!("{} ", buf.len()).into_bytes();
                framed.extend_from_slice(&buf);
                framed
            }
        }
    }
}
