use std::io::Write;

use super::Metric;
use crate::formatter::JsonFormatter;

/// Получатель метрик. Пакетирование и публикация на его стороне.
pub trait MetricSink {
    fn emit(&mut self, metric: Metric);
}

/// Копит метрики в памяти
#[derive(Debug, Default)]
pub struct MemorySink {
    pub metrics: Vec<Metric>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Метрики, чьё имя начинается с `prefix`
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Metric> + 'a {
        self.metrics.iter().filter(move |m| m.name.starts_with(prefix))
    }
}

impl MetricSink for MemorySink {
    fn emit(&mut self, metric: Metric) {
        self.metrics.push(metric);
    }
}

/// Пишет каждую метрику отдельной JSON строкой
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLineSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MetricSink for JsonLineSink<W> {
    fn emit(&mut self, metric: Metric) {
        tracing::info!(metric = %metric.name, value = %metric.value, "Print Metric");

        let line = match JsonFormatter::to_json_line(&metric) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(metric = %metric.name, error = %e, "Ошибка JSON сериализации");
                return;
            }
        };

        if let Err(e) = writeln!(self.writer, "{}", line) {
            tracing::warn!(metric = %metric.name, error = %e, "Не удалось записать метрику");
        }
    }
}
