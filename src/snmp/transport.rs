use async_trait::async_trait;

use super::params::{SecurityParams, SessionParams};
use crate::error::Result;

/// GET одного OID. Для v3 в PDU кладётся context name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub oid: String,
    pub context_name: Option<String>,
}

impl GetRequest {
    pub fn new(security: &SecurityParams, oid: &str) -> Self {
        let context_name = match security {
            SecurityParams::V2c { .. } => None,
            SecurityParams::V3(usm) => Some(usm.context_name.clone()),
        };

        Self {
            oid: oid.to_string(),
            context_name,
        }
    }
}

/// Пара OID -> значение из ответа, значение уже в текстовом виде
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    pub oid: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Response {
    pub error_status: u32,
    pub error_index: u32,
    pub varbinds: Vec<VarBind>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.error_status == 0
    }

    pub fn error_status_text(&self) -> &'static str {
        error_status_text(self.error_status)
    }
}

/// Текст error-status по RFC 3416
pub fn error_status_text(status: u32) -> &'static str {
    match status {
        0 => "Success",
        1 => "Response message would have been too large",
        2 => "There is no such variable name in this MIB",
        3 => "The value given has the wrong type or length",
        4 => "The two parties used do not have access to use the specified SNMP PDU",
        5 => "A general failure occured",
        6 => "Access denied",
        7 => "Wrong type",
        8 => "Wrong length",
        9 => "Wrong encoding",
        10 => "Wrong value",
        11 => "No creation",
        12 => "Inconsistent value",
        13 => "Resource not available",
        14 => "Commit failed",
        15 => "Undo failed",
        16 => "Authorization error",
        17 => "Not writable",
        18 => "Inconsistent naming used",
        _ => "Unknown error",
    }
}

/// Открытый канал до одного агента.
///
/// Повторы и таймауты делает сессия: одна попытка здесь это ровно один
/// запрос. `SnmpError::Transport` из `send` означает, что канал мёртв и
/// дальше слать бесполезно; остальные ошибки относятся к одной попытке.
#[async_trait]
pub trait Transport: Send {
    /// SNMPv3 discovery authoritative engine
    async fn discover(&mut self) -> Result<()>;

    async fn send(&mut self, request: &GetRequest) -> Result<Response>;

    async fn close(&mut self) -> Result<()>;
}

/// Фабрика транспорта: поднимает сокет под параметры сессии
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    async fn open(&self, params: &SessionParams) -> Result<Self::Transport>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::params::UsmParams;

    #[test]
    fn context_name_only_for_v3() {
        let v2c = SecurityParams::V2c {
            community: "public".to_string(),
        };
        assert_eq!(GetRequest::new(&v2c, "1.3.6.1.2.1.1.3.0").context_name, None);

        let v3 = SecurityParams::V3(UsmParams {
            security_name: "monitor".to_string(),
            auth: None,
            privacy: None,
            context_name: "bridge1".to_string(),
        });
        let request = GetRequest::new(&v3, "1.3.6.1.2.1.1.3.0");
        assert_eq!(request.context_name.as_deref(), Some("bridge1"));
        assert_eq!(request.oid, "1.3.6.1.2.1.1.3.0");
    }

    #[test]
    fn status_text() {
        let response = Response {
            error_status: 2,
            ..Response::default()
        };
        assert!(!response.is_success());
        assert_eq!(
            response.error_status_text(),
            "There is no such variable name in this MIB"
        );
        assert_eq!(error_status_text(99), "Unknown error");
    }
}
