//! Симулятор SNMP агентов для тестов и прогонов без сети.
//!
//! [`SimulatedConnector`] хранит набор устройств по адресу. Адрес без
//! устройства ведёт себя как недоступный хост: сокет открывается, но
//! ни discovery, ни запросы не получают ответа.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::address::TargetAddress;
use super::oid::normalize_oid;
use super::params::SessionParams;
use super::transport::{Connector, GetRequest, Response, Transport, VarBind};
use crate::error::{Result, SnmpError};

/// Что агент отвечает на GET конкретного OID
#[derive(Debug, Clone)]
pub enum Reply {
    /// Значение, OID в ответе как в запросе
    Value(String),
    /// Значение с явно заданным OID в ответе
    ValueAt { oid: String, value: String },
    /// Ответ без varbind'ов
    Empty,
    /// Ненулевой error-status
    ErrorStatus(u32),
    /// Ответа нет, запрос уходит в таймаут
    Silent,
    /// Сбой одной попытки запроса
    Fail(String),
    /// Транспорт умер
    Broken,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedDevice {
    replies: HashMap<String, Reply>,
    unreachable: bool,
    bind_failure: bool,
    echo_leading_dot: bool,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Устройство, которое молчит на всё, включая discovery
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Сокет под это устройство не открывается
    pub fn bind_failure() -> Self {
        Self {
            bind_failure: true,
            ..Self::default()
        }
    }

    pub fn with_value(self, oid: &str, value: impl Into<String>) -> Self {
        self.with_reply(oid, Reply::Value(value.into()))
    }

    pub fn with_reply(mut self, oid: &str, reply: Reply) -> Self {
        self.replies.insert(normalize_oid(oid), reply);
        self
    }

    /// Отвечать OID'ами в форме ".1.3.6..."
    pub fn echo_leading_dot(mut self) -> Self {
        self.echo_leading_dot = true;
        self
    }

    fn reply(&self, oid: &str) -> Reply {
        if self.unreachable {
            return Reply::Silent;
        }
        self.replies
            .get(&normalize_oid(oid))
            .cloned()
            .unwrap_or(Reply::Empty)
    }

    fn echo(&self, oid: &str) -> String {
        let normalized = normalize_oid(oid);
        if self.echo_leading_dot {
            format!(".{}", normalized)
        } else {
            normalized
        }
    }
}

/// Счётчики взаимодействия с симулятором
#[derive(Debug, Clone, Default)]
pub struct SimulatorStats {
    pub opened: usize,
    pub closed: usize,
    pub discoveries: usize,
    /// Все отправленные запросы, включая повторы
    pub requests: Vec<GetRequest>,
}

impl SimulatorStats {
    pub fn attempts_for(&self, oid: &str) -> usize {
        let oid = normalize_oid(oid);
        self.requests
            .iter()
            .filter(|r| normalize_oid(&r.oid) == oid)
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedConnector {
    devices: HashMap<String, SimulatedDevice>,
    stats: Arc<Mutex<SimulatorStats>>,
}

impl SimulatedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, target_address: &str, device: SimulatedDevice) -> Self {
        self.devices.insert(device_key(target_address), device);
        self
    }

    pub fn stats(&self) -> SimulatorStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut SimulatorStats)) {
        update(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

fn device_key(target_address: &str) -> String {
    TargetAddress::parse(target_address)
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| target_address.to_string())
}

#[async_trait]
impl Connector for SimulatedConnector {
    type Transport = SimulatedTransport;

    async fn open(&self, params: &SessionParams) -> Result<SimulatedTransport> {
        let device = self
            .devices
            .get(&params.target.to_string())
            .cloned()
            .unwrap_or_else(SimulatedDevice::unreachable);

        if device.bind_failure {
            return Err(SnmpError::Transport(format!(
                "Не удалось открыть сокет для {}",
                params.target
            )));
        }

        self.record(|stats| stats.opened += 1);

        Ok(SimulatedTransport {
            device,
            connector: self.clone(),
            closed: false,
        })
    }
}

pub struct SimulatedTransport {
    device: SimulatedDevice,
    connector: SimulatedConnector,
    closed: bool,
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn discover(&mut self) -> Result<()> {
        self.connector.record(|stats| stats.discoveries += 1);
        if self.device.unreachable {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn send(&mut self, request: &GetRequest) -> Result<Response> {
        if self.closed {
            return Err(SnmpError::Transport("транспорт закрыт".to_string()));
        }
        self.connector
            .record(|stats| stats.requests.push(request.clone()));

        match self.device.reply(&request.oid) {
            Reply::Value(value) => Ok(Response {
                varbinds: vec![VarBind {
                    oid: self.device.echo(&request.oid),
                    value,
                }],
                ..Response::default()
            }),
            Reply::ValueAt { oid, value } => Ok(Response {
                varbinds: vec![VarBind { oid, value }],
                ..Response::default()
            }),
            Reply::Empty => Ok(Response::default()),
            Reply::ErrorStatus(status) => Ok(Response {
                error_status: status,
                error_index: 1,
                varbinds: Vec::new(),
            }),
            Reply::Silent => std::future::pending().await,
            Reply::Fail(cause) => Err(SnmpError::Request(cause)),
            Reply::Broken => Err(SnmpError::Transport("соединение разорвано".to_string())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.connector.record(|stats| stats.closed += 1);
        }
        Ok(())
    }
}
