use serde::{Deserialize, Serialize};

use crate::metrics::{Aggregation, ClusterRollup, Metric, MetricValue, TimeRollup};

/// JSON запись одной метрики для выгрузки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecordJson {
    pub timestamp: String,
    pub name: String,
    pub value: MetricValue,
    pub aggregation: Aggregation,
    pub time_rollup: TimeRollup,
    pub cluster_rollup: ClusterRollup,
}

/// JSON форматтер для выгружаемых метрик
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_metric(metric: &Metric) -> MetricRecordJson {
        MetricRecordJson {
            timestamp: chrono::Utc::now().to_rfc3339(),
            name: metric.name.clone(),
            value: metric.value.clone(),
            aggregation: metric.aggregation,
            time_rollup: metric.time_rollup,
            cluster_rollup: metric.cluster_rollup,
        }
    }

    /// Компактная строка, без переводов строк
    pub fn to_json_line(metric: &Metric) -> serde_json::Result<String> {
        serde_json::to_string(&Self::format_metric(metric))
    }
}
