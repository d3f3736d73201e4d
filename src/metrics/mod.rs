//! Модель метрики и приведение значений к виду, который принимает sink.
//!
//! Sink принимает только целые числа, поэтому десятичная дробь умножается
//! на 100, отбрасывается дробная часть, а к имени добавляется " (x100)".

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod sink;

pub use sink::{JsonLineSink, MemorySink, MetricSink};

pub const SCALED_SUFFIX: &str = " (x100)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeRollup {
    /// Значение на момент опроса
    Current,
    /// Счётчики, например liveness
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClusterRollup {
    Collective,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Text(v) => f.write_str(v),
        }
    }
}

/// Одна метрика, готовая к выгрузке
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub aggregation: Aggregation,
    pub time_rollup: TimeRollup,
    pub cluster_rollup: ClusterRollup,
}

impl Metric {
    /// Собирает метрику: префикс + имя, масштабирование дробей
    pub fn normalized(prefix: &str, name: &str, value: &str, time_rollup: TimeRollup) -> Self {
        let (name, value) = match scale_decimal(value) {
            Some(scaled) => (
                format!("{}{}{}", prefix, name, SCALED_SUFFIX),
                MetricValue::Integer(scaled),
            ),
            None => (format!("{}{}", prefix, name), MetricValue::Text(value.to_string())),
        };

        Self {
            name,
            value,
            aggregation: Aggregation::Observation,
            time_rollup,
            cluster_rollup: ClusterRollup::Collective,
        }
    }

    pub fn current(prefix: &str, name: &str, value: &str) -> Self {
        Self::normalized(prefix, name, value, TimeRollup::Current)
    }

    pub fn sum(prefix: &str, name: &str, value: &str) -> Self {
        Self::normalized(prefix, name, value, TimeRollup::Sum)
    }
}

/// Десятичная дробь: необязательный знак, цифры, точка, цифры
pub fn is_decimal_number(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    match digits.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// value * 100 с отбрасыванием дробной части (арифметика f64)
pub fn scale_decimal(value: &str) -> Option<i64> {
    if !is_decimal_number(value) {
        return None;
    }
    let parsed: f64 = value.parse().ok()?;
    Some((parsed * 100.0) as i64)
}
