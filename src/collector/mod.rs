use std::collections::BTreeMap;

use tracing::Instrument;

use crate::config::{Endpoint, Settings};
use crate::error::SnmpError;
use crate::metrics::{Metric, MetricSink};
use crate::snmp::{Connector, SnmpSession};

pub mod types;

pub use types::{CycleReport, EndpointOutcome};

/// Имя liveness метрики, выгружается каждый цикл
pub const LIVENESS_METRIC: &str = "up";
/// Разделитель имени endpoint'а и имени метрики
pub const METRIC_PATH_SEPARATOR: &str = "|";

/// Коллектор: обходит endpoint'ы, открывает по сессии на каждый и
/// отдаёт полученные значения в sink.
pub struct SnmpCollector<C: Connector> {
    connector: C,
    settings: Settings,
}

enum Failure {
    Open(SnmpError),
    Collect(SnmpError),
}

impl<C: Connector> SnmpCollector<C> {
    pub fn new(connector: C, settings: Settings) -> Self {
        Self {
            connector,
            settings,
        }
    }

    /// Один цикл опроса.
    ///
    /// Liveness метрика уходит первой и не зависит от результата опроса.
    /// Ошибка любого endpoint'а логируется и не мешает остальным.
    pub async fn run_cycle<S: MetricSink>(&self, endpoints: &[Endpoint], sink: &mut S) -> CycleReport {
        let prefix = self.settings.metrics.prefix.as_str();
        let mut report = CycleReport::default();

        sink.emit(Metric::sum(prefix, LIVENESS_METRIC, "1"));
        report.emitted += 1;

        for endpoint in endpoints {
            if !endpoint.snmp_endpoint.is_configured() {
                tracing::debug!(endpoint = %endpoint.name, "SNMP не настроен, endpoint пропущен");
                report
                    .outcomes
                    .push((endpoint.name.clone(), EndpointOutcome::Skipped));
                continue;
            }

            let span = tracing::info_span!("endpoint", endpoint = %endpoint.name);
            let outcome = match self.collect_endpoint(endpoint).instrument(span).await {
                Ok(data) => {
                    let metrics = data.len();
                    for (key, value) in data {
                        let name = format!("{}{}{}", endpoint.name, METRIC_PATH_SEPARATOR, key);
                        sink.emit(Metric::current(prefix, &name, &value));
                    }
                    report.emitted += metrics;
                    EndpointOutcome::Polled { metrics }
                }
                Err(Failure::Open(e)) => {
                    tracing::warn!(
                        endpoint = %endpoint.name,
                        error = %e,
                        "Не удалось настроить SNMP, endpoint пропущен в этом цикле"
                    );
                    EndpointOutcome::OpenFailed(e.to_string())
                }
                Err(Failure::Collect(e)) => {
                    tracing::warn!(
                        endpoint = %endpoint.name,
                        error = %e,
                        "SNMP сбор данных не удался"
                    );
                    EndpointOutcome::CollectFailed(e.to_string())
                }
            };

            report.outcomes.push((endpoint.name.clone(), outcome));
        }

        tracing::info!(
            emitted = report.emitted,
            endpoints = endpoints.len(),
            failed = report.failed().count(),
            "Цикл опроса SNMP завершён"
        );

        report
    }

    async fn collect_endpoint(
        &self,
        endpoint: &Endpoint,
    ) -> Result<BTreeMap<String, String>, Failure> {
        let mut session = SnmpSession::open(
            &self.connector,
            &endpoint.snmp_endpoint,
            &self.settings.connection,
        )
        .await
        .map_err(Failure::Open)?;

        let data = session.get_all_data().await;
        session.close().await;

        data.map_err(Failure::Collect)
    }
}
