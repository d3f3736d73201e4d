use std::fmt;
use std::time::Duration;

use super::address::TargetAddress;
use super::security::{AuthProtocol, PrivProtocol};
use crate::config::{ConnectionSettings, SnmpEndpoint};
use crate::error::{Result, SnmpError};

/// Параметры сессии, вычисленные один раз при её создании
#[derive(Clone)]
pub struct SessionParams {
    pub target: TargetAddress,
    pub security: SecurityParams,
    /// Таймаут одной попытки
    pub timeout: Duration,
    /// Повторы после первой попытки
    pub retries: u32,
}

#[derive(Clone)]
pub enum SecurityParams {
    V2c { community: String },
    V3(UsmParams),
}

/// Пользователь USM и контекст для PDU
#[derive(Clone)]
pub struct UsmParams {
    pub security_name: String,
    pub auth: Option<(AuthProtocol, String)>,
    pub privacy: Option<(PrivProtocol, String)>,
    pub context_name: String,
}

impl SessionParams {
    pub fn resolve(endpoint: &SnmpEndpoint, connection: &ConnectionSettings) -> Result<Self> {
        let target = TargetAddress::parse(&endpoint.target_address)?;

        let security = match endpoint.version.trim().chars().next() {
            Some('1') => {
                return Err(SnmpError::UnsupportedVersion(endpoint.version.clone()));
            }
            Some('2') => resolve_v2c(endpoint)?,
            Some('3') => resolve_v3(endpoint)?,
            _ => {
                return Err(SnmpError::Configuration(format!(
                    "Неизвестная версия SNMP: '{}'",
                    endpoint.version
                )));
            }
        };

        Ok(Self {
            target,
            security,
            timeout: connection.timeout(),
            retries: connection.retries,
        })
    }

    pub fn version(&self) -> &'static str {
        match self.security {
            SecurityParams::V2c { .. } => "v2c",
            SecurityParams::V3(_) => "v3",
        }
    }
}

fn resolve_v2c(endpoint: &SnmpEndpoint) -> Result<SecurityParams> {
    if endpoint.community_name.is_empty() {
        return Err(SnmpError::Configuration(
            "Используется SNMP v2c, но параметр Community Name пустой".to_string(),
        ));
    }

    Ok(SecurityParams::V2c {
        community: endpoint.community_name.clone(),
    })
}

fn resolve_v3(endpoint: &SnmpEndpoint) -> Result<SecurityParams> {
    let security_name = endpoint.security_name.as_deref().unwrap_or_default();

    let mut missing = Vec::new();
    if security_name.is_empty() {
        missing.push("Security Name");
    }
    if !missing.is_empty() {
        return Err(SnmpError::Configuration(format!(
            "Используется SNMP v3, но не хватает параметров: {}",
            missing.join(",")
        )));
    }

    let auth = match &endpoint.auth_passphrase {
        Some(passphrase) => Some((
            AuthProtocol::resolve(&endpoint.auth_protocol)?,
            checked_passphrase("authPassphrase", passphrase)?,
        )),
        None => None,
    };

    let privacy = match &endpoint.priv_passphrase {
        Some(passphrase) => Some((
            PrivProtocol::resolve(&endpoint.priv_protocol)?,
            checked_passphrase("privPassphrase", passphrase)?,
        )),
        None => None,
    };

    // authPriv без auth в USM не бывает
    if privacy.is_some() && auth.is_none() {
        return Err(SnmpError::Configuration(
            "privPassphrase задан без authPassphrase".to_string(),
        ));
    }

    Ok(SecurityParams::V3(UsmParams {
        security_name: security_name.to_string(),
        auth,
        privacy,
        context_name: endpoint.context_name.clone(),
    }))
}

/// Минимальная длина пароля USM по RFC 3414
pub const MIN_PASSPHRASE_LEN: usize = 8;

fn checked_passphrase(field: &str, passphrase: &str) -> Result<String> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(SnmpError::Configuration(format!(
            "{} короче {} символов",
            field, MIN_PASSPHRASE_LEN
        )));
    }
    Ok(passphrase.to_string())
}

// Пароли в логи не попадают
impl fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionParams")
            .field("target", &self.target.to_string())
            .field("security", &self.security)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}

impl fmt::Debug for SecurityParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityParams::V2c { .. } => f.write_str("V2c { community: *** }"),
            SecurityParams::V3(usm) => f
                .debug_struct("V3")
                .field("security_name", &usm.security_name)
                .field("auth", &usm.auth.as_ref().map(|(p, _)| *p))
                .field("privacy", &usm.privacy.as_ref().map(|(p, _)| *p))
                .field("context_name", &usm.context_name)
                .finish(),
        }
    }
}
