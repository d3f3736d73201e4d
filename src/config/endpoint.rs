use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::snmp::oid::default_oids;

/// Значение `targetAddress`, при котором endpoint пропускается
pub const UNCONFIGURED: &str = "unconfigured";

/// Описание одного опрашиваемого устройства
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Префикс пути метрик этого устройства
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub snmp_endpoint: SnmpEndpoint,
}

/// SNMP часть описания устройства
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnmpEndpoint {
    pub target_address: String,
    /// "1", "2", "2c", "3"... значим только первый символ
    pub version: String,
    pub community_name: String,
    pub context_name: String,
    pub security_name: Option<String>,
    pub auth_passphrase: Option<String>,
    pub auth_protocol: String,
    pub priv_passphrase: Option<String>,
    pub priv_protocol: String,
    /// OID -> имя метрики
    pub oids: HashMap<String, String>,
}

impl Default for SnmpEndpoint {
    fn default() -> Self {
        Self {
            target_address: UNCONFIGURED.to_string(),
            version: "2".to_string(),
            community_name: "public".to_string(),
            context_name: String::new(),
            security_name: None,
            auth_passphrase: None,
            auth_protocol: "hmac384sha512".to_string(),
            priv_passphrase: None,
            priv_protocol: "aes256".to_string(),
            oids: default_oids(),
        }
    }
}

impl SnmpEndpoint {
    pub fn is_configured(&self) -> bool {
        self.target_address != UNCONFIGURED
    }
}

impl Endpoint {
    pub fn new(name: impl Into<String>, snmp_endpoint: SnmpEndpoint) -> Self {
        Self {
            name: name.into(),
            url: None,
            user: None,
            password: None,
            snmp_endpoint,
        }
    }
}
