//! Forwarder configuration.
//!
//! All tunables live in one immutable struct constructed once at process
//! start and passed by reference into adapter construction. `from_env`
//! mirrors the environment variables the deployment images historically
//! used; `Default` gives the same values without touching the environment.

use std::{env, fs, path::PathBuf};

use log::debug;

/// Default retry budget for in-place write retries and reconnect dials.
pub const DEFAULT_RETRY_COUNT: u32 = 10;
/// File whose contents, when present, override every other hostname source.
pub const DEFAULT_HOSTNAME_FILE: &str = "/etc/host_hostname";

/// Default field templates.
const DEFAULT_FORMAT: &str = "rfc5424";
const DEFAULT_PRIORITY_TEMPLATE: &str = "{{.Priority}}";
const DEFAULT_PID_TEMPLATE: &str = "{{.Container.State.Pid}}";
const DEFAULT_TAG_TEMPLATE: &str = "{{.ContainerName}}";
const DEFAULT_TIMESTAMP_TEMPLATE: &str = "{{.Timestamp}}";
const DEFAULT_DATA_TEMPLATE: &str = "{{.Data}}";
const DEFAULT_TCP_FRAMING: &str = "traditional";
/// Fallback hostname template when neither the override file nor the
/// configured hostname supply a value: the emitting container's hostname.
const DEFAULT_HOSTNAME_TEMPLATE: &str = "{{.Container.Config.Hostname}}";

/// Immutable process-wide forwarder configuration.
#[derive(Clone, Debug)]
pub struct SyslogConfig {
    /// Syslog format name, `rfc5424` or `rfc3164`.
    pub format: String,
    /// Template for the PRI value.
    pub priority_template: String,
    /// Template for the PROCID / pid field.
    pub pid_template: String,
    /// Template for the tag field. The route's `append_tag` option is
    /// appended to this as a literal suffix.
    pub tag_template: String,
    /// Template for the timestamp field.
    pub timestamp_template: String,
    /// Template for the message payload.
    pub data_template: String,
    /// RFC 5424 structured data. Routes may override via the
    /// `structured_data` option. Empty renders as the `-` placeholder.
    pub structured_data: String,
    /// Default TCP framing mode; routes may override via `tcp_framing`.
    pub tcp_framing: String,
    /// Attempt budget shared by write retries and reconnect dials.
    pub retry_count: u32,
    /// Hostname override file, read once at adapter construction.
    pub hostname_file: PathBuf,
    /// Hostname template used when the override file is absent. Empty means
    /// "resolve from the file, then the OS, then the container".
    pub hostname: String,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_owned(),
            priority_template: DEFAULT_PRIORITY_TEMPLATE.to_owned(),
            pid_template: DEFAULT_PID_TEMPLATE.to_owned(),
            tag_template: DEFAULT_TAG_TEMPLATE.to_owned(),
            timestamp_template: DEFAULT_TIMESTAMP_TEMPLATE.to_owned(),
            data_template: DEFAULT_DATA_TEMPLATE.to_owned(),
            structured_data: String::new(),
            tcp_framing: DEFAULT_TCP_FRAMING.to_owned(),
            retry_count: DEFAULT_RETRY_COUNT,
            hostname_file: PathBuf::from(DEFAULT_HOSTNAME_FILE),
            hostname: String::new(),
        }
    }
}

impl SyslogConfig {
    /// Build the configuration from `SYSLOG_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let retry_count = env::var("RETRY_COUNT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_RETRY_COUNT);
        debug!("retry budget set to {retry_count}");
        Self {
            format: env_or("SYSLOG_FORMAT", &defaults.format),
            priority_template: env_or("SYSLOG_PRIORITY", &defaults.priority_template),
            pid_template: env_or("SYSLOG_PID", &defaults.pid_template),
            tag_template: env_or("SYSLOG_TAG", &defaults.tag_template),
            timestamp_template: env_or("SYSLOG_TIMESTAMP", &defaults.timestamp_template),
            data_template: env_or("SYSLOG_DATA", &defaults.data_template),
            structured_data: env_or("SYSLOG_STRUCTURED_DATA", ""),
            tcp_framing: env_or("SYSLOG_TCP_FRAMING", &defaults.tcp_framing),
            retry_count,
            hostname_file: defaults.hostname_file,
            hostname: env_or("SYSLOG_HOSTNAME", ""),
        }
    }

    /// Resolve the hostname template once, at adapter construction.
    ///
    /// Precedence: the override file, then the configured hostname, then
    /// the OS hostname, then the emitting container's own hostname.
    pub fn resolve_hostname(&self) -> String {
        if let Ok(content) = fs::read_to_string(&self.hostname_file) {
            let trimmed = content.trim_end_matches(['\r', '\n']);
            if !trimmed.is_empty() {
                return trimmed.to_owned();
            }
        }
        if !self.hostname.is_empty() {
            return self.hostname.clone();
        }
        match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(_) => DEFAULT_HOSTNAME_TEMPLATE.to_owned(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn hostname_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "from-file").expect("write hostname");
        let config = SyslogConfig {
            hostname_file: file.path().to_path_buf(),
            hostname: "from-config".to_owned(),
            ..SyslogConfig::default()
        };
        assert_eq!(config.resolve_hostname(), "from-file");
    }

    #[test]
    fn configured_hostname_used_when_file_missing() {
        let config = SyslogConfig {
            hostname_file: PathBuf::from("/nonexistent/host_hostname"),
            hostname: "from-config".to_owned(),
            ..SyslogConfig::default()
        };
        assert_eq!(config.resolve_hostname(), "from-config");
    }

    #[test]
    fn empty_hostname_file_is_ignored() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let config = SyslogConfig {
            hostname_file: file.path().to_path_buf(),
            hostname: "from-config".to_owned(),
            ..SyslogConfig::default()
        };
        assert_eq!(config.resolve_hostname(), "from-config");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = SyslogConfig::default();
        assert_eq!(config.format, "rfc5424");
        assert_eq!(config.tcp_framing, "traditional");
        assert_eq!(config.retry_count, 10);
        assert_eq!(config.priority_template, "{{.Priority}}");
    }
}
