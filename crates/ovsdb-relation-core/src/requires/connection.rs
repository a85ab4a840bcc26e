//! Connection string composition
//!
//! An OVSDB manager connection is described as `protocol:host:port`, for
//! example `ssl:10.0.0.10:6640`. The value is derived from relation data on
//! every query and never stored.

use std::fmt;

/// Port used when the remote unit has not published one
pub const DEFAULT_PORT: &str = "6640";

/// A resolved OVSDB manager connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionString {
    /// Transport protocol (e.g. `tcp`, `ssl`)
    pub protocol: String,
    /// Remote host, or the relation's private address
    pub host: String,
    /// Remote port, or [`DEFAULT_PORT`]
    pub port: String,
}

impl ConnectionString {
    /// Build a connection, defaulting the port to [`DEFAULT_PORT`]
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: Option<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: port.unwrap_or_else(|| DEFAULT_PORT.to_string()),
        }
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.protocol, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let conn = ConnectionString::new("soc", "10.0.0.10", Some("1234".to_string()));
        assert_eq!(conn.to_string(), "soc:10.0.0.10:1234");
    }

    #[test]
    fn test_default_port() {
        let conn = ConnectionString::new("tcp", "db.local", None);
        assert_eq!(conn.port, DEFAULT_PORT);
        assert_eq!(conn.to_string(), "tcp:db.local:6640");
    }
}
