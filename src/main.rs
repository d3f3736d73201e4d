use anyhow::{Context, Result};
use tokio::time::{Duration, interval};
use tracing_subscriber::EnvFilter;

use snmp_monitor::collector::SnmpCollector;
use snmp_monitor::config::AppConfig;
use snmp_monitor::metrics::JsonLineSink;
use snmp_monitor::snmp::Snmp2Connector;

const CONFIG_ENV: &str = "SNMP_MONITOR_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("snmp_monitor=info".parse()?),
        )
        .init();

    let mut once = false;
    let mut config_path = std::env::var(CONFIG_ENV).ok();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--once" => once = true,
            path => config_path = Some(path.to_string()),
        }
    }

    let config_path = config_path
        .filter(|p| p != "unconfigured")
        .context("Файл конфигурации SNMP не задан, делать нечего")?;

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Не удалось прочитать конфигурацию SNMP: {}", config_path))?;
    config.debug_config();

    let collector = SnmpCollector::new(Snmp2Connector, config.settings.clone());
    let mut sink = JsonLineSink::stdout();

    if once {
        collector.run_cycle(&config.endpoints, &mut sink).await;
        return Ok(());
    }

    let mut tick = interval(Duration::from_secs(config.settings.interval_secs.max(1)));
    tracing::info!(
        endpoints = config.endpoints.len(),
        interval_secs = config.settings.interval_secs,
        "Запуск цикла опроса SNMP"
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                collector.run_cycle(&config.endpoints, &mut sink).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Получен Ctrl-C, остановка");
                break;
            }
        }
    }

    Ok(())
}
