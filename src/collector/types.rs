/// Чем закончился опрос одного endpoint'а
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
    /// targetAddress == "unconfigured", SNMP не трогали
    Skipped,
    /// Данные получены, `metrics` штук выгружено
    Polled { metrics: usize },
    /// Сессию не удалось создать
    OpenFailed(String),
    /// Сессия создана, но сбор данных прервался
    CollectFailed(String),
}

/// Итог одного цикла опроса
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Сколько метрик ушло в sink, включая liveness
    pub emitted: usize,
    /// По endpoint'ам, в порядке конфигурации
    pub outcomes: Vec<(String, EndpointOutcome)>,
}

impl CycleReport {
    pub fn outcome(&self, endpoint: &str) -> Option<&EndpointOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, outcome)| outcome)
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            EndpointOutcome::OpenFailed(_) | EndpointOutcome::CollectFailed(_) => {
                Some(name.as_str())
            }
            _ => None,
        })
    }
}
