use snmp_monitor::collector::{EndpointOutcome, SnmpCollector};
use snmp_monitor::config::{ConnectionSettings, Endpoint, MetricSettings, Settings, SnmpEndpoint};
use snmp_monitor::metrics::{MemorySink, MetricValue, TimeRollup};
use snmp_monitor::snmp::fake::{Reply, SimulatedConnector, SimulatedDevice};

const PREFIX: &str = "Custom Metrics|SNMP Monitor|";

const LOAD_1: &str = ".1.3.6.1.4.1.2021.10.1.3.1";
const CPU_IDLE: &str = ".1.3.6.1.4.1.2021.11.11.0";
const CPU_USER: &str = ".1.3.6.1.4.1.2021.11.9.0";
const SWAP_TOTAL: &str = ".1.3.6.1.4.1.2021.4.3.0";

fn settings() -> Settings {
    Settings {
        connection: ConnectionSettings {
            timeout_ms: 20,
            retries: 1,
        },
        ..Settings::default()
    }
}

fn v2c(name: &str, target: &str) -> Endpoint {
    Endpoint::new(
        name,
        SnmpEndpoint {
            target_address: target.to_string(),
            ..SnmpEndpoint::default()
        },
    )
}

fn v3(name: &str, target: &str) -> Endpoint {
    Endpoint::new(
        name,
        SnmpEndpoint {
            target_address: target.to_string(),
            version: "3".to_string(),
            security_name: Some("monitor".to_string()),
            auth_passphrase: Some("auth-secret".to_string()),
            ..SnmpEndpoint::default()
        },
    )
}

fn unconfigured(name: &str) -> Endpoint {
    Endpoint::new(name, SnmpEndpoint::default())
}

#[tokio::test]
async fn unconfigured_endpoints_touch_nothing() {
    let connector = SimulatedConnector::new();
    let collector = SnmpCollector::new(connector.clone(), settings());
    let mut sink = MemorySink::new();

    let report = collector
        .run_cycle(&[unconfigured("a"), unconfigured("b")], &mut sink)
        .await;

    assert_eq!(sink.metrics.len(), 1);
    let up = sink.get(&format!("{PREFIX}up")).unwrap();
    assert_eq!(up.value, MetricValue::Text("1".to_string()));
    assert_eq!(up.time_rollup, TimeRollup::Sum);

    assert_eq!(report.outcome("a"), Some(&EndpointOutcome::Skipped));
    assert_eq!(report.outcome("b"), Some(&EndpointOutcome::Skipped));

    let stats = connector.stats();
    assert_eq!(stats.opened, 0);
    assert!(stats.requests.is_empty());
}

#[tokio::test]
async fn empty_community_skips_only_that_endpoint() {
    let connector = SimulatedConnector::new()
        .with_device("udp:10.0.0.1/161", SimulatedDevice::new().with_value(CPU_IDLE, "97"))
        .with_device("udp:10.0.0.2/161", SimulatedDevice::new().with_value(CPU_IDLE, "88"));

    let mut broken = v2c("broken", "udp:10.0.0.1/161");
    broken.snmp_endpoint.community_name.clear();
    let healthy = v2c("healthy", "udp:10.0.0.2/161");

    let collector = SnmpCollector::new(connector, settings());
    let mut sink = MemorySink::new();
    let report = collector.run_cycle(&[broken, healthy], &mut sink).await;

    assert!(matches!(
        report.outcome("broken"),
        Some(EndpointOutcome::OpenFailed(_))
    ));
    assert_eq!(
        report.outcome("healthy"),
        Some(&EndpointOutcome::Polled { metrics: 1 })
    );
    assert_eq!(
        sink.get(&format!("{PREFIX}healthy|CPU Idle %")).map(|m| &m.value),
        Some(&MetricValue::Text("88".to_string()))
    );
    assert_eq!(sink.with_prefix(&format!("{PREFIX}broken|")).count(), 0);
}

#[tokio::test]
async fn reachable_and_unreachable_endpoints() {
    let core = SimulatedDevice::new()
        .with_value(LOAD_1, "3.14")
        .with_value(CPU_IDLE, "97")
        .with_value(SWAP_TOTAL, "2097148");
    let connector = SimulatedConnector::new().with_device("udp:10.0.0.1/161", core);

    let endpoints = [
        v2c("core", "udp:10.0.0.1/161"),
        v3("edge", "udp:10.0.0.2/161"),
    ];

    let collector = SnmpCollector::new(connector.clone(), settings());
    let mut sink = MemorySink::new();
    let report = collector.run_cycle(&endpoints, &mut sink).await;

    assert_eq!(report.emitted, 4);
    assert_eq!(sink.metrics.len(), 4);
    assert_eq!(sink.metrics[0].name, format!("{PREFIX}up"));

    let core_prefix = format!("{PREFIX}core|");
    assert_eq!(sink.with_prefix(&core_prefix).count(), 3);
    assert_eq!(sink.with_prefix(&format!("{PREFIX}edge|")).count(), 0);

    let load = sink
        .get(&format!("{core_prefix}1 minute load average (x100)"))
        .unwrap();
    assert_eq!(load.value, MetricValue::Integer(314));
    assert_eq!(load.time_rollup, TimeRollup::Current);
    assert_eq!(
        sink.get(&format!("{core_prefix}Swap Total")).map(|m| &m.value),
        Some(&MetricValue::Text("2097148".to_string()))
    );

    match report.outcome("edge") {
        Some(EndpointOutcome::OpenFailed(message)) => assert!(message.contains("Authoritative")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.failed().collect::<Vec<_>>(), ["edge"]);

    let stats = connector.stats();
    assert_eq!(stats.opened, 2);
    assert_eq!(stats.closed, 2);
}

#[tokio::test]
async fn collection_failure_still_closes_session() {
    let device = SimulatedDevice::new()
        .with_value(CPU_IDLE, "97")
        .with_reply(CPU_USER, Reply::Broken);
    let connector = SimulatedConnector::new().with_device("udp:10.0.0.1/161", device);

    let collector = SnmpCollector::new(connector.clone(), settings());
    let mut sink = MemorySink::new();
    let report = collector
        .run_cycle(&[v2c("core", "udp:10.0.0.1/161")], &mut sink)
        .await;

    assert!(matches!(
        report.outcome("core"),
        Some(EndpointOutcome::CollectFailed(_))
    ));
    assert_eq!(sink.metrics.len(), 1);

    let stats = connector.stats();
    assert_eq!(stats.opened, 1);
    assert_eq!(stats.closed, 1);
}

#[tokio::test]
async fn custom_prefix_is_applied_to_every_metric() {
    let connector = SimulatedConnector::new()
        .with_device("10.0.0.1:161", SimulatedDevice::new().with_value(CPU_IDLE, "97"));
    let settings = Settings {
        metrics: MetricSettings::with_custom_prefix("Lab"),
        ..settings()
    };

    let collector = SnmpCollector::new(connector, settings);
    let mut sink = MemorySink::new();
    collector
        .run_cycle(&[v2c("core", "udp:10.0.0.1/161")], &mut sink)
        .await;

    let names: Vec<_> = sink.metrics.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Custom Metrics|Lab|up", "Custom Metrics|Lab|core|CPU Idle %"]);
}

#[tokio::test]
async fn endpoints_are_polled_in_configuration_order() {
    let connector = SimulatedConnector::new()
        .with_device("udp:10.0.0.1/161", SimulatedDevice::new().with_value(CPU_IDLE, "1"))
        .with_device("udp:10.0.0.2/161", SimulatedDevice::new().with_value(CPU_IDLE, "2"));

    let collector = SnmpCollector::new(connector, settings());
    let mut sink = MemorySink::new();
    let report = collector
        .run_cycle(
            &[
                v2c("second", "udp:10.0.0.2/161"),
                unconfigured("idle"),
                v2c("first", "udp:10.0.0.1/161"),
            ],
            &mut sink,
        )
        .await;

    let order: Vec<_> = report.outcomes.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(order, ["second", "idle", "first"]);
    assert_eq!(sink.metrics[1].name, format!("{PREFIX}second|CPU Idle %"));
    assert_eq!(sink.metrics[2].name, format!("{PREFIX}first|CPU Idle %"));
}
