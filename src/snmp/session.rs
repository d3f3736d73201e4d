use std::collections::BTreeMap;

use tokio::time::timeout;

use super::oid::OidCatalog;
use super::params::{SecurityParams, SessionParams};
use super::transport::{Connector, GetRequest, Transport, VarBind};
use crate::config::{ConnectionSettings, SnmpEndpoint};
use crate::error::{Result, SnmpError};

/// SNMP сессия одного endpoint'а на один цикл опроса.
///
/// Версия и параметры безопасности фиксируются при создании. Сессия
/// закрывается через [`SnmpSession::close`], который поглощает её, поэтому
/// закрыть дважды нельзя.
pub struct SnmpSession<T: Transport> {
    transport: T,
    params: SessionParams,
    catalog: OidCatalog,
}

impl<T: Transport> SnmpSession<T> {
    /// Проверяет конфигурацию, поднимает транспорт и для v3 выполняет
    /// discovery. Если discovery не удался, транспорт закрывается.
    pub async fn open<C>(
        connector: &C,
        endpoint: &SnmpEndpoint,
        connection: &ConnectionSettings,
    ) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        let catalog = OidCatalog::new(&endpoint.oids)?;
        let params = SessionParams::resolve(endpoint, connection)?;

        let mut transport = connector.open(&params).await?;

        if let SecurityParams::V3(_) = params.security {
            if let Err(e) = discover(&mut transport, &params).await {
                if let Err(close_err) = transport.close().await {
                    tracing::debug!(error = %close_err, "Ошибка при закрытии транспорта проигнорирована");
                }
                return Err(e);
            }
        }

        tracing::debug!(
            target_address = %params.target,
            version = params.version(),
            oids = catalog.len(),
            "SNMP сессия инициализирована"
        );

        Ok(Self {
            transport,
            params,
            catalog,
        })
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// GET одного OID с таймаутом и повторами сессии.
    ///
    /// Обычно в ответе одна пара, но полагаться на это нельзя.
    pub async fn get_oid(&mut self, oid: &str) -> Result<Vec<VarBind>> {
        request(&mut self.transport, &self.params, oid).await
    }

    /// Опрашивает все OID каталога: имя метрики -> значение.
    ///
    /// OID без данных или с ошибкой пропускается, результат может быть
    /// подмножеством каталога. Прерывает опрос только ошибка транспорта.
    pub async fn get_all_data(&mut self) -> Result<BTreeMap<String, String>> {
        let Self {
            transport,
            params,
            catalog,
        } = self;
        let mut data = BTreeMap::new();

        for oid in catalog.oids() {
            let requested_label = catalog.label(oid).unwrap_or(oid);

            let varbinds = match request(transport, params, oid).await {
                Ok(varbinds) => varbinds,
                Err(e @ SnmpError::Transport(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(oid, metric = requested_label, error = %e, "OID пропущен");
                    continue;
                }
            };

            let Some(first) = varbinds.into_iter().next() else {
                tracing::warn!(oid, metric = requested_label, "Нет данных в ответе на SNMP запрос");
                continue;
            };

            let label = match catalog.label(&first.oid) {
                Some(label) => label,
                None => {
                    tracing::debug!(
                        oid,
                        returned_oid = %first.oid,
                        "Агент вернул OID не из каталога, используется запрошенное имя"
                    );
                    requested_label
                }
            };

            tracing::debug!(oid, metric = label, value = %first.value, "SNMP данные получены");
            data.insert(label.to_string(), first.value);
        }

        Ok(data)
    }

    /// Освобождает транспорт. Ошибки закрытия не пробрасываются.
    pub async fn close(mut self) {
        if let Err(e) = self.transport.close().await {
            tracing::debug!(
                target_address = %self.params.target,
                error = %e,
                "Ошибка при закрытии SNMP сессии проигнорирована"
            );
        }
    }
}

async fn discover<T: Transport>(transport: &mut T, params: &SessionParams) -> Result<()> {
    match timeout(params.timeout, transport.discover()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e @ SnmpError::Discovery(_))) => Err(e),
        Ok(Err(e)) => Err(SnmpError::Discovery(e.to_string())),
        Err(_) => Err(SnmpError::Discovery(format!(
            "таймаут {} мс",
            params.timeout.as_millis()
        ))),
    }
}

/// Один GET: первая попытка плюс `retries` повторов при таймауте или сбое
/// запроса. Ответ с ошибкой и ошибки транспорта не повторяются.
async fn request<T: Transport>(
    transport: &mut T,
    params: &SessionParams,
    oid: &str,
) -> Result<Vec<VarBind>> {
    let request = GetRequest::new(&params.security, oid);
    let attempts = params.retries.saturating_add(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match timeout(params.timeout, transport.send(&request)).await {
            Ok(Ok(response)) if response.is_success() => {
                tracing::trace!(oid, varbinds = response.varbinds.len(), "Ответ получен");
                return Ok(response.varbinds);
            }
            Ok(Ok(response)) => {
                let status = response.error_status_text();
                tracing::warn!(
                    oid,
                    error_status = response.error_status,
                    error_index = response.error_index,
                    "Агент вернул ошибку: {}",
                    status
                );
                return Err(SnmpError::Protocol(status.to_string()));
            }
            Ok(Err(SnmpError::Request(cause))) => last_error = cause,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                last_error = format!("таймаут {} мс", params.timeout.as_millis());
            }
        }

        tracing::debug!(oid, attempt, attempts, error = %last_error, "Попытка запроса не удалась");
    }

    Err(SnmpError::Request(last_error))
}
