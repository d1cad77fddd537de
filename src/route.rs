//! Destination route description supplied by the host.

use std::collections::BTreeMap;

/// String options attached to a route.
pub type RouteOptions = BTreeMap<String, String>;

/// Where and how a forwarder delivers its records.
///
/// Immutable for the adapter's lifetime. The options map carries
/// destination-specific knobs; the keys the forwarder recognises are
/// `append_tag`, `structured_data`, and `tcp_framing`.
#[derive(Clone, Debug)]
pub struct RouteConfig {
    /// Collector address, `host:port`.
    pub address: String,
    /// Transport name, e.g. `"udp"`, `"tcp"`, or `"tls"`.
    pub transport: String,
    /// Destination-specific options.
    pub options: RouteOptions,
}

impl RouteConfig {
    /// Describe a route to `address` over the named transport.
    pub fn new(address: &str, transport: &str) -> Self {
        Self {
            address: address.to_owned(),
            transport: transport.to_owned(),
            options: RouteOptions::new(),
        }
    }

    /// Attach an option, builder style.
    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Look up an option value.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
