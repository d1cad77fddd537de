//! Syslog priority (facility and severity) derivation.

/// Syslog facility codes used by the forwarder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facility {
    User = 1,
    Daemon = 3,
}

/// Syslog severity codes used by the forwarder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Err = 3,
    Info = 6,
}

/// A combined facility/severity priority value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Priority {
    pub facility: Facility,
    pub severity: Severity,
}

impl Priority {
    /// Map a record's source stream to its syslog priority.
    ///
    /// `stdout` lines are user.info, `stderr` lines are user.err, and
    /// anything else is daemon.info.
    pub fn for_source(source: &str) -> Self {
        match source {
            "stdout" => Self {
                facility: Facility::User,
                severity: Severity::Info,
            },
            "stderr" => Self {
                facility: Facility::User,
                severity: Severity::Err,
            },
            _ => Self {
                facility: Facility::Daemon,
                severity: Severity::Info,
            },
        }
    }

    /// Numeric PRI value: `facility * 8 + severity`.
    pub fn value(self) -> u8 {
        ((self.facility as u8) << 3) | self.severity as u8
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("stdout", 14)]
    #[case("stderr", 11)]
    #[case("tty", 30)]
    #[case("", 30)]
    fn maps_source_to_priority(#[case] source: &str, #[case] expected: u8) {
        assert_eq!(Priority::for_source(source).value(), expected);
    }

    #[test]
    fn mapping_is_deterministic() {
        assert_eq!(
            Priority::for_source("stdout"),
            Priority::for_source("stdout")
        );
    }
}
