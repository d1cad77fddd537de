//! Log record representation consumed by the forwarder.
//!
//! A `LogRecord` is one observed line of output from a container or
//! process, together with the identity of its emitter and the time it was
//! seen. Records are owned by the host collector and borrowed by the
//! renderer for the duration of a single render.

use chrono::{DateTime, Utc};

/// Identity of the container or process that emitted a record.
#[derive(Clone, Debug)]
pub struct ContainerInfo {
    /// Display name as reported by the runtime (may carry a leading `/`).
    pub name: String,
    /// Hostname configured inside the container.
    pub hostname: String,
    /// Process ID of the container's main process.
    pub pid: i64,
}

impl ContainerInfo {
    /// Construct container identity from name, hostname, and pid.
    pub fn new(name: &str, hostname: &str, pid: i64) -> Self {
        Self {
            name: name.to_owned(),
            hostname: hostname.to_owned(),
            pid,
        }
    }
}

/// One observed log line together with its emission context.
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Source stream tag, e.g. `"stdout"` or `"stderr"`.
    pub source: String,
    /// Identity of the emitting container.
    pub container: ContainerInfo,
    /// Time the line was observed.
    pub timestamp: DateTime<Utc>,
    /// Raw text payload.
    pub data: String,
}

impl LogRecord {
    /// Construct a record observed now.
    pub fn new(source: &str, container: ContainerInfo, data: &str) -> Self {
        Self {
            source: source.to_owned(),
            container,
            timestamp: Utc::now(),
            data: data.to_owned(),
        }
    }

    /// Container display name with the runtime's leading `/` stripped.
    pub fn container_name(&self) -> &str {
        self.container
            .name
            .strip_prefix('/')
            .unwrap_or(&self.container.name)
    }
}
