//! Wire message construction.
//!
//! `MessageRenderer` binds one syslog format and a set of compiled field
//! templates at adapter construction, then turns each record into a
//! newline-terminated byte buffer. Field maxima from the RFCs are enforced
//! by byte-length truncation of the rendered values.

use std::str::FromStr;

use crate::{
    config::SyslogConfig,
    error::{ConfigError, RenderError},
    log_record::LogRecord,
    route::RouteConfig,
    template::Template,
};

/// RFC 5424: the HOSTNAME field must not exceed 255 characters.
const MAX_HOSTNAME: usize = 255;
/// RFC 5424: the TAG (APP-NAME) field must not exceed 48 characters.
const MAX_TAG_5424: usize = 48;
/// RFC 5424: the PROCID field must not exceed 128 characters.
const MAX_PID: usize = 128;
/// RFC 3164: the TAG field must not exceed 32 characters.
const MAX_TAG_3164: usize = 32;

/// Supported syslog message formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyslogFormat {
    Rfc5424,
    Rfc3164,
}

impl FromStr for SyslogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rfc5424" => Ok(Self::Rfc5424),
            "rfc3164" => Ok(Self::Rfc3164),
            other => Err(ConfigError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Compiled per-destination message renderer.
///
/// Stateless after construction and shared read-only across records.
pub struct MessageRenderer {
    format: SyslogFormat,
    priority: Template,
    timestamp: Template,
    hostname: Template,
    tag: Template,
    pid: Template,
    data: Template,
    structured_data: String,
}

impl MessageRenderer {
    /// Compile the templates for one route.
    ///
    /// The hostname source is resolved here, once; the route's `append_tag`
    /// option is folded into the tag template; structured data from the
    /// route overrides the configured value and is reduced to its final
    /// literal form (`-` or `[value]`).
    pub fn new(config: &SyslogConfig, route: &RouteConfig) -> Result<Self, ConfigError> {
        let format = config.format.parse()?;

        let mut tag_template = config.tag_template.clone();
        if let Some(suffix) = route.option("append_tag") {
            tag_template.push_str(suffix);
        }

        let structured_data = route
            .option("structured_data")
            .filter(|value| !value.is_empty())
            .unwrap_or(&config.structured_data);
        let structured_data = if structured_data.is_empty() {
            "-".to_owned()
        } else {
            format!("[{structured_data}]")
        };

        Ok(Self {
            format,
            priority: Template::parse(&config.priority_template)?,
            timestamp: Template::parse(&config.timestamp_template)?,
            hostname: Template::parse(&config.resolve_hostname())?,
            tag: Template::parse(&tag_template)?,
            pid: Template::parse(&config.pid_template)?,
            data: Template::parse(&config.data_template)?,
            structured_data,
        })
    }

    /// The format this renderer produces.
    pub fn format(&self) -> SyslogFormat {
        self.format
    }

    /// Render one record into a newline-terminated wire buffer.
    pub fn render(&self, record: &LogRecord) -> Result<Vec<u8>, RenderError> {
        let priority = self.priority.render(record)?;
        let timestamp = self.timestamp.render(record)?;
        let hostname = self.hostname.render(record)?;
        let tag = self.tag.render(record)?;
        let pid = self.pid.render(record)?;
        let data = self.data.render(record)?;

        let hostname = truncate_bytes(&hostname, MAX_HOSTNAME);
        let pid = truncate_bytes(&pid, MAX_PID);

        let line = match self.format {
            SyslogFormat::Rfc5424 => {
                let tag = truncate_bytes(&tag, MAX_TAG_5424);
                format!(
                    "<{priority}>1 {timestamp} {hostname} {tag} {pid} - {sd} {data}\n",
                    sd = self.structured_data,
                )
            }
            SyslogFormat::Rfc3164 => {
                let tag = truncate_bytes(&tag, MAX_TAG_3164);
                format!("<{priority}>{timestamp} {hostname} {tag}[{pid}]: {data}\n")
            }
        };
        Ok(line.into_bytes())
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 code point.
fn truncate_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::log_record::ContainerInfo;

    use super::*;

    fn config_with(hostname: &str) -> SyslogConfig {
        SyslogConfig {
            hostname: hostname.to_owned(),
            hostname_file: "/nonexistent/host_hostname".into(),
            ..SyslogConfig::default()
        }
    }

    fn record(source: &str, name: &str, data: &str) -> LogRecord {
        let mut record = LogRecord::new(source, ContainerInfo::new(name, "ctr-host", 4242), data);
        record.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        record
    }

    fn renderer(config: &SyslogConfig, route: &RouteConfig) -> MessageRenderer {
        MessageRenderer::new(config, route).expect("build renderer")
    }

    #[test]
    fn renders_default_rfc5424_line() {
        let config = config_with("host-a");
        let route = RouteConfig::new("collector:514", "udp");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "hello"))
            .expect("render");
        assert_eq!(
            String::from_utf8(rendered).expect("utf8"),
            "<14>1 2024-03-09T12:30:00Z host-a web-1 4242 - - hello\n"
        );
    }

    #[test]
    fn renders_default_rfc3164_line() {
        let config = SyslogConfig {
            format: "rfc3164".to_owned(),
            ..config_with("host-a")
        };
        let route = RouteConfig::new("collector:514", "udp");
        let rendered = renderer(&config, &route)
            .render(&record("stderr", "/web-1", "boom"))
            .expect("render");
        assert_eq!(
            String::from_utf8(rendered).expect("utf8"),
            "<11>2024-03-09T12:30:00Z host-a web-1[4242]: boom\n"
        );
    }

    #[test]
    fn rendering_is_deterministic_for_identical_input() {
        let config = config_with("host-a");
        let route = RouteConfig::new("collector:514", "udp");
        let renderer = renderer(&config, &route);
        let record = record("stdout", "/web-1", "hello");
        assert_eq!(
            renderer.render(&record).expect("first"),
            renderer.render(&record).expect("second")
        );
    }

    #[test]
    fn structured_data_wraps_in_brackets() {
        let config = config_with("host-a");
        let route = RouteConfig::new("collector:514", "udp")
            .with_option("structured_data", "id@1 k=\"v\"");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "hello"))
            .expect("render");
        let line = String::from_utf8(rendered).expect("utf8");
        assert!(line.contains(" - [id@1 k=\"v\"] hello\n"), "line: {line}");
    }

    #[test]
    fn route_structured_data_overrides_config() {
        let config = SyslogConfig {
            structured_data: "cfg@1".to_owned(),
            ..config_with("host-a")
        };
        let route =
            RouteConfig::new("collector:514", "udp").with_option("structured_data", "route@1");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "hello"))
            .expect("render");
        assert!(String::from_utf8(rendered)
            .expect("utf8")
            .contains("[route@1]"));
    }

    #[test]
    fn append_tag_suffixes_container_name() {
        let config = config_with("host-a");
        let route = RouteConfig::new("collector:514", "udp").with_option("append_tag", ".app");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "hello"))
            .expect("render");
        assert!(String::from_utf8(rendered)
            .expect("utf8")
            .contains(" web-1.app "));
    }

    #[rstest]
    #[case::hostname(2, MAX_HOSTNAME)]
    #[case::tag(3, MAX_TAG_5424)]
    #[case::pid(4, MAX_PID)]
    fn rfc5424_fields_respect_maxima(#[case] index: usize, #[case] max: usize) {
        let long = "x".repeat(600);
        let config = SyslogConfig {
            pid_template: long.clone(),
            ..config_with(&long)
        };
        let route = RouteConfig::new("collector:514", "udp");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", &format!("/{long}"), "hello"))
            .expect("render");
        let line = String::from_utf8(rendered).expect("utf8");
        let fields: Vec<&str> = line.trim_end().split(' ').collect();
        assert_eq!(fields[index].len(), max);
    }

    #[test]
    fn rfc3164_tag_respects_maximum() {
        let config = SyslogConfig {
            format: "rfc3164".to_owned(),
            ..config_with("host-a")
        };
        let route = RouteConfig::new("collector:514", "udp");
        let long_name = format!("/{}", "t".repeat(100));
        let rendered = renderer(&config, &route)
            .render(&record("stdout", &long_name, "hello"))
            .expect("render");
        let line = String::from_utf8(rendered).expect("utf8");
        let tag = line
            .split(' ')
            .nth(2)
            .and_then(|field| field.split('[').next())
            .expect("tag field");
        assert_eq!(tag.len(), MAX_TAG_3164);
    }

    #[test]
    fn short_fields_are_not_truncated() {
        let config = config_with("host-a");
        let route = RouteConfig::new("collector:514", "udp");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "payload under the maxima"))
            .expect("render");
        let line = String::from_utf8(rendered).expect("utf8");
        assert!(line.contains("web-1"));
        assert!(line.ends_with("payload under the maxima\n"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("héllo", 3), "hé");
        assert_eq!(truncate_bytes("héllo", 99), "héllo");
    }

    #[test]
    fn unknown_format_is_a_config_error() {
        let config = SyslogConfig {
            format: "rfc9999".to_owned(),
            ..config_with("host-a")
        };
        let route = RouteConfig::new("collector:514", "udp");
        assert!(matches!(
            MessageRenderer::new(&config, &route),
            Err(ConfigError::UnknownFormat(name)) if name == "rfc9999"
        ));
    }

    #[test]
    fn container_hostname_template_renders_per_record() {
        let config = SyslogConfig {
            hostname: "{{.Container.Config.Hostname}}".to_owned(),
            hostname_file: "/nonexistent/host_hostname".into(),
            ..SyslogConfig::default()
        };
        let route = RouteConfig::new("collector:514", "udp");
        let rendered = renderer(&config, &route)
            .render(&record("stdout", "/web-1", "hello"))
            .expect("render");
        assert!(String::from_utf8(rendered)
            .expect("utf8")
            .contains(" ctr-host "));
    }
}
