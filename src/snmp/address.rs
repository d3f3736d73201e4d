use std::fmt;

use crate::error::{Result, SnmpError};

pub const DEFAULT_SNMP_PORT: u16 = 161;

/// Адрес агента. Принимаются формы `udp:host/port`, `host/port`,
/// `host:port`, `[v6]:port` и просто `host` (порт 161).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddress {
    pub host: String,
    pub port: u16,
}

impl TargetAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let rest = match trimmed.split_once(':') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("udp") => rest,
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("tcp") => {
                return Err(SnmpError::Configuration(format!(
                    "Транспорт TCP не поддерживается: '{}'",
                    raw
                )));
            }
            _ => trimmed,
        };

        let (host, port) = split_host_port(rest)
            .ok_or_else(|| SnmpError::Configuration(format!("Невалидный адрес: '{}'", raw)))?;

        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(SnmpError::Configuration(format!(
                "Невалидный адрес: '{}'",
                raw
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Строка для `ToSocketAddrs`
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "udp:{}/{}", self.host, self.port)
    }
}

fn split_host_port(s: &str) -> Option<(&str, u16)> {
    if let Some(v6) = s.strip_prefix('[') {
        let (host, tail) = v6.split_once(']')?;
        return match tail.strip_prefix(':') {
            Some(port) => Some((host, port.parse().ok()?)),
            None if tail.is_empty() => Some((host, DEFAULT_SNMP_PORT)),
            None => None,
        };
    }

    // snmp4j-стиль: host/port
    if let Some((host, port)) = s.rsplit_once('/') {
        return Some((host, port.parse().ok()?));
    }

    match s.matches(':').count() {
        0 => Some((s, DEFAULT_SNMP_PORT)),
        1 => {
            let (host, port) = s.split_once(':')?;
            Some((host, port.parse().ok()?))
        }
        // голый IPv6 без порта
        _ => Some((s, DEFAULT_SNMP_PORT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_forms() {
        let cases = [
            ("udp:10.0.0.1/161", "10.0.0.1", 161),
            ("10.0.0.1/1161", "10.0.0.1", 1161),
            ("router.local:162", "router.local", 162),
            ("router.local", "router.local", 161),
            ("[::1]:1161", "::1", 1161),
            ("UDP:switch/161", "switch", 161),
        ];

        for (raw, host, port) in cases {
            let addr = TargetAddress::parse(raw).unwrap();
            assert_eq!(addr.host, host, "{raw}");
            assert_eq!(addr.port, port, "{raw}");
        }
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["", "udp:", "host/notaport", "host:99999", "tcp:host/161", "a b:161"] {
            let err = TargetAddress::parse(raw).unwrap_err();
            assert!(matches!(err, SnmpError::Configuration(_)), "{raw}");
        }
    }

    #[test]
    fn socket_addr_brackets_v6() {
        let addr = TargetAddress::parse("[fe80::1]:161").unwrap();
        assert_eq!(addr.socket_addr(), "[fe80::1]:161");
        assert_eq!(TargetAddress::parse("h/10").unwrap().socket_addr(), "h:10");
    }
}
