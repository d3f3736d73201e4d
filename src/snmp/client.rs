use std::net::Ipv4Addr;

use async_trait::async_trait;
use snmp2::{Pdu, Value};

use super::oid::parse_oid;
use super::params::{SecurityParams, SessionParams};
use super::transport::{Connector, GetRequest, Response, Transport, VarBind};
use super::v2c::SnmpClientV2c;
use super::v3::SnmpClientV3;
use crate::error::{Result, SnmpError};

/// UDP клиент поверх snmp2
pub enum SnmpClient {
    V2c(Box<SnmpClientV2c>),
    V3(Box<SnmpClientV3>),
    Closed,
}

/// Открывает `SnmpClient` нужной версии
#[derive(Debug, Clone, Copy, Default)]
pub struct Snmp2Connector;

#[async_trait]
impl Connector for Snmp2Connector {
    type Transport = SnmpClient;

    async fn open(&self, params: &SessionParams) -> Result<SnmpClient> {
        match &params.security {
            SecurityParams::V2c { community } => {
                let client = SnmpClientV2c::new(&params.target, community.as_bytes()).await?;
                Ok(SnmpClient::V2c(Box::new(client)))
            }
            SecurityParams::V3(usm) => {
                let client = SnmpClientV3::new(&params.target, usm).await?;
                Ok(SnmpClient::V3(Box::new(client)))
            }
        }
    }
}

#[async_trait]
impl Transport for SnmpClient {
    async fn discover(&mut self) -> Result<()> {
        match self {
            SnmpClient::V3(client) => client.init().await,
            SnmpClient::V2c(_) => Ok(()),
            SnmpClient::Closed => Err(closed()),
        }
    }

    async fn send(&mut self, request: &GetRequest) -> Result<Response> {
        let oid = parse_oid(&request.oid)?;
        match self {
            SnmpClient::V2c(client) => client.get(&oid).await,
            SnmpClient::V3(client) => client.get(&oid).await,
            SnmpClient::Closed => Err(closed()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        // сокет закрывается при drop сессии
        *self = SnmpClient::Closed;
        Ok(())
    }
}

fn closed() -> SnmpError {
    SnmpError::Transport("SNMP сессия уже закрыта".to_string())
}

/// Переводит ответ snmp2 во владеющий `Response`.
/// noSuchObject / noSuchInstance / endOfMibView отбрасываются.
pub(crate) fn response_from_pdu(pdu: Pdu<'_>) -> Response {
    let error_status = pdu.error_status;
    let error_index = pdu.error_index;
    let varbinds = pdu
        .varbinds
        .filter_map(|(oid, value)| {
            value_text(&value).map(|value| VarBind {
                oid: oid.to_string(),
                value,
            })
        })
        .collect();

    Response {
        error_status,
        error_index,
        varbinds,
    }
}

fn value_text(value: &Value<'_>) -> Option<String> {
    match value {
        Value::Integer(v) => Some(v.to_string()),
        Value::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::ObjectIdentifier(oid) => Some(oid.to_string()),
        Value::IpAddress(octets) => Some(Ipv4Addr::from(*octets).to_string()),
        Value::Counter32(v) | Value::Unsigned32(v) | Value::Timeticks(v) => Some(v.to_string()),
        Value::Counter64(v) => Some(v.to_string()),
        Value::Boolean(v) => Some(v.to_string()),
        Value::Null | Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => None,
        other => Some(format!("{:?}", other)),
    }
}
