//! Minimal field templates for message construction.
//!
//! A template is literal text interleaved with `{{.Field}}` placeholders.
//! Parsing happens once at adapter construction; syntax problems are
//! configuration errors. Field lookup happens per record, and referencing a
//! field the context cannot supply is a render error, which the stream loop
//! treats as fatal.

use crate::{
    error::{RenderError, TemplateError},
    log_record::LogRecord,
    priority::Priority,
};

use chrono::SecondsFormat;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A compiled rendering rule for one message field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Compile `input`, splitting it into literal and placeholder segments.
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = input;
        let mut offset = 0;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_owned()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + open))?;
            let field = after_open[..close]
                .trim()
                .strip_prefix('.')
                .filter(|name| !name.is_empty())
                .ok_or(TemplateError::MalformedField(offset + open))?;
            segments.push(Segment::Field(field.to_owned()));
            offset += open + 2 + close + 2;
            rest = &after_open[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }
        Ok(Self { segments })
    }

    /// Evaluate the template against one record.
    pub fn render(&self, record: &LogRecord) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(&resolve(name, record)?),
            }
        }
        Ok(out)
    }
}

/// Look up one field path on a record.
fn resolve(field: &str, record: &LogRecord) -> Result<String, RenderError> {
    match field {
        "Priority" => Ok(Priority::for_source(&record.source).value().to_string()),
        "Timestamp" => Ok(record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true)),
        "Data" => Ok(record.data.clone()),
        "ContainerName" => Ok(record.container_name().to_owned()),
        "Container.Name" => Ok(record.container.name.clone()),
        "Container.Config.Hostname" => Ok(record.container.hostname.clone()),
        "Container.State.Pid" => Ok(record.container.pid.to_string()),
        other => Err(RenderError::UnknownField(other.to_owned())),
    }
}
