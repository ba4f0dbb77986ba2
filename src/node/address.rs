use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `host:port` pair a node is reachable on
///
/// IPv6 hosts are written in brackets, e.g. `[::1]:10002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkHostAndPort {
    pub host: String,
    pub port: u16,
}

impl NetworkHostAndPort {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ParseError> {
        let host = host.into();
        if host.is_empty() {
            return Err(ParseError::InvalidAddress("empty host".to_string()));
        }
        if port == 0 {
            return Err(ParseError::InvalidAddress(format!("{host}: port must be non-zero")));
        }
        Ok(Self { host, port })
    }

    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidAddress(value.to_string());

        let (host, port) = if let Some(rest) = value.strip_prefix('[') {
            let (host, port) = rest.split_once("]:").ok_or_else(invalid)?;
            (host, port)
        } else {
            let (host, port) = value.rsplit_once(':').ok_or_else(invalid)?;
            // Unbracketed IPv6 is ambiguous
            if host.contains(':') {
                return Err(invalid());
            }
            (host, port)
        };

        let port: u16 = port.parse().map_err(|_| invalid())?;
        Self::new(host, port)
    }
}

impl FromStr for NetworkHostAndPort {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NetworkHostAndPort {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NetworkHostAndPort> for String {
    fn from(address: NetworkHostAndPort) -> Self {
        address.to_string()
    }
}

impl fmt::Display for NetworkHostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
