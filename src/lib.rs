//! Опрос устройств по SNMP (v2c/v3) и выгрузка значений OID в виде метрик.
//!
//! Цикл опроса: [`config::AppConfig`] -> [`collector::SnmpCollector::run_cycle`]
//! -> [`snmp::SnmpSession::get_all_data`] на каждый endpoint -> [`metrics::MetricSink`].

pub mod collector;
pub mod config;
pub mod error;
pub mod formatter;
pub mod metrics;
pub mod snmp;

pub use error::{Result, SnmpError};
