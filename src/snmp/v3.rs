use snmp2::{AsyncSession, Oid, v3};

use super::address::TargetAddress;
use super::client::response_from_pdu;
use super::params::UsmParams;
use super::transport::Response;
use crate::error::{Result, SnmpError};

pub struct SnmpClientV3 {
    target: TargetAddress,
    usm: UsmParams,
    session: AsyncSession,
    /// Прошлый GET не получил ответа, на сокете может лежать опоздавший ответ
    stale: bool,
}

impl SnmpClientV3 {
    /// Поднимает сокет под пользователя USM. Discovery отдельно, см. `init`.
    pub async fn new(target: &TargetAddress, usm: &UsmParams) -> Result<Self> {
        // TODO: snmp2 не кладёт contextName в scoped PDU, снять запрет когда научится
        if !usm.context_name.is_empty() {
            return Err(SnmpError::Configuration(format!(
                "contextName '{}' не поддерживается SNMPv3 клиентом",
                usm.context_name
            )));
        }

        let session = connect(target, usm).await?;

        Ok(Self {
            target: target.clone(),
            usm: usm.clone(),
            session,
            stale: false,
        })
    }

    /// Discovery authoritative engine (engine id, boots, time)
    pub async fn init(&mut self) -> Result<()> {
        self.session
            .init()
            .await
            .map_err(|e| SnmpError::Discovery(e.to_string()))
    }

    pub async fn get(&mut self, oid: &Oid<'_>) -> Result<Response> {
        if self.stale {
            // новый сокет заново узнаёт engine id, это часть текущей попытки
            let mut session = connect(&self.target, &self.usm).await?;
            session.init().await.map_err(|e| {
                SnmpError::Request(format!("Повторный discovery не удался: {}", e))
            })?;
            self.session = session;
            self.stale = false;
            tracing::debug!(target_address = %self.target, "SNMPv3 сокет пересоздан");
        }

        self.stale = true;
        let pdu = self
            .session
            .get(oid)
            .await
            .map_err(|e| SnmpError::Request(format!("SNMPv3 GET запрос не удался: {}", e)))?;
        let response = response_from_pdu(pdu);
        self.stale = false;

        Ok(response)
    }
}

async fn connect(target: &TargetAddress, usm: &UsmParams) -> Result<AsyncSession> {
    AsyncSession::new_v3(target.socket_addr(), 2, security(usm))
        .await
        .map_err(|e| {
            SnmpError::Transport(format!("Не удалось создать SNMPv3 сессию {}: {}", target, e))
        })
}

/// Уровень безопасности зависит от того, какие пароли заданы:
/// noAuthNoPriv, authNoPriv или authPriv
fn security(usm: &UsmParams) -> v3::Security {
    let auth_password = usm
        .auth
        .as_ref()
        .map(|(_, password)| password.as_bytes())
        .unwrap_or_default();

    let security = v3::Security::new(usm.security_name.as_bytes(), auth_password);

    match (&usm.auth, &usm.privacy) {
        (Some((protocol, _)), Some((cipher, privacy_password))) => security
            .with_auth_protocol((*protocol).into())
            .with_auth(v3::Auth::AuthPriv {
                cipher: (*cipher).into(),
                privacy_password: privacy_password.as_bytes().to_vec(),
            }),
        (Some((protocol, _)), None) => security
            .with_auth_protocol((*protocol).into())
            .with_auth(v3::Auth::AuthNoPriv),
        _ => security.with_auth(v3::Auth::NoAuthNoPriv),
    }
}
