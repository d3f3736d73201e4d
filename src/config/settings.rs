use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_METRIC_PREFIX: &str = "Custom Metrics|SNMP Monitor|";

/// Базовые настройки приложения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Настройки подключения
    pub connection: ConnectionSettings,
    /// Настройки выгрузки метрик
    pub metrics: MetricSettings,
    /// Период опроса (секунды)
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Таймаут одной попытки запроса (миллисекунды)
    pub timeout_ms: u64,
    /// Количество повторов после первой попытки
    pub retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSettings {
    /// Префикс всех имён метрик, заканчивается на '|'
    pub prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            metrics: MetricSettings {
                prefix: DEFAULT_METRIC_PREFIX.to_string(),
            },
            interval_secs: 60,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            retries: 3,
        }
    }
}

impl ConnectionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl MetricSettings {
    /// Префикс из пользовательского имени: "Custom Metrics|<name>|"
    pub fn with_custom_prefix(name: &str) -> Self {
        let name = name.trim().trim_end_matches('|');
        Self {
            prefix: format!("Custom Metrics|{}|", name),
        }
    }
}
