use anyhow::{Context, Result};
use std::env;
use std::path::Path;

pub mod endpoint;
pub mod settings;

pub use endpoint::{Endpoint, SnmpEndpoint, UNCONFIGURED};
pub use settings::{ConnectionSettings, MetricSettings, Settings};

/// Главная конфигурация приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Опрашиваемые устройства, в порядке из файла
    pub endpoints: Vec<Endpoint>,
    /// Базовые настройки
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает список endpoint'ов из JSON (или YAML по расширению) файла
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let endpoints = load_endpoints(path.as_ref())?;
        let settings = settings_from_env(Settings::default());

        Ok(Self {
            endpoints,
            settings,
        })
    }

    pub fn debug_config(&self) {
        tracing::debug!(
            endpoints = self.endpoints.len(),
            timeout_ms = self.settings.connection.timeout_ms,
            retries = self.settings.connection.retries,
            prefix = %self.settings.metrics.prefix,
            interval_secs = self.settings.interval_secs,
            "Конфигурация SNMP загружена"
        );
    }
}

pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Не удалось прочитать файл: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let endpoints: Vec<Endpoint> = if is_yaml {
        serde_yml::from_str(&content).context("Не удалось распарсить YAML")?
    } else {
        serde_json::from_str(&content).context("Не удалось распарсить JSON")?
    };

    if endpoints.is_empty() {
        anyhow::bail!("В файле {} нет ни одного endpoint'а", path.display());
    }

    Ok(endpoints)
}

/// Переопределяет настройки из переменных окружения
fn settings_from_env(mut settings: Settings) -> Settings {
    if let Some(timeout_ms) = env_parse("SNMP_MONITOR_TIMEOUT_MS") {
        settings.connection.timeout_ms = timeout_ms;
    }
    if let Some(retries) = env_parse("SNMP_MONITOR_RETRIES") {
        settings.connection.retries = retries;
    }
    if let Some(interval) = env_parse("SNMP_MONITOR_INTERVAL_SECS") {
        settings.interval_secs = interval;
    }
    if let Ok(prefix) = env::var("SNMP_MONITOR_PREFIX") {
        settings.metrics = MetricSettings::with_custom_prefix(&prefix);
    }
    settings
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_json_array_in_order() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{ "name": "a", "snmpEndpoint": {{ "targetAddress": "udp:10.0.0.1/161" }} }},
                {{ "name": "b" }}
            ]"#
        )
        .unwrap();

        let endpoints = load_endpoints(file.path()).unwrap();
        let names: Vec<_> = endpoints.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(endpoints[0].snmp_endpoint.is_configured());
        assert!(!endpoints[1].snmp_endpoint.is_configured());
    }

    #[test]
    fn loads_yaml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "- name: edge\n  snmpEndpoint:\n    targetAddress: \"edge.lan/161\"\n    communityName: ro\n"
        )
        .unwrap();

        let endpoints = load_endpoints(file.path()).unwrap();
        assert_eq!(endpoints[0].snmp_endpoint.community_name, "ro");
    }

    #[test]
    fn empty_list_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[]").unwrap();
        assert!(load_endpoints(file.path()).is_err());
    }

    #[test]
    fn bundled_profile_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("profiles/endpoints.json");
        let endpoints = load_endpoints(&path).unwrap();
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[1].snmp_endpoint.oids.len(), 2);
        assert!(!endpoints[2].snmp_endpoint.is_configured());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_endpoints(Path::new("/nonexistent/snmp.json")).is_err());
    }
}
