use snmp2::{AsyncSession, Oid};

use super::address::TargetAddress;
use super::client::response_from_pdu;
use super::transport::Response;
use crate::error::{Result, SnmpError};

pub struct SnmpClientV2c {
    target: TargetAddress,
    community: Vec<u8>,
    session: AsyncSession,
    /// Прошлый GET не получил ответа, на сокете может лежать опоздавший ответ
    stale: bool,
}

impl SnmpClientV2c {
    pub async fn new(target: &TargetAddress, community: &[u8]) -> Result<Self> {
        let session = connect(target, community).await?;

        Ok(Self {
            target: target.clone(),
            community: community.to_vec(),
            session,
            stale: false,
        })
    }

    pub async fn get(&mut self, oid: &Oid<'_>) -> Result<Response> {
        // snmp2 сверяет request-id только с последним запросом, поэтому
        // после брошенного запроса сокет меняется целиком
        if self.stale {
            self.session = connect(&self.target, &self.community).await?;
            self.stale = false;
            tracing::debug!(target_address = %self.target, "SNMP сокет пересоздан");
        }

        self.stale = true;
        let pdu = self
            .session
            .get(oid)
            .await
            .map_err(|e| SnmpError::Request(format!("SNMP GET запрос не удался: {}", e)))?;
        let response = response_from_pdu(pdu);
        self.stale = false;

        Ok(response)
    }
}

async fn connect(target: &TargetAddress, community: &[u8]) -> Result<AsyncSession> {
    AsyncSession::new_v2c(target.socket_addr(), community, 2)
        .await
        .map_err(|e| {
            SnmpError::Transport(format!("Не удалось создать SNMP сессию {}: {}", target, e))
        })
}
