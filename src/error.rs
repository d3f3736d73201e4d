/// Ошибки SNMP сессии.
///
/// Ошибки построения сессии (`Configuration`, `UnsupportedVersion`,
/// `Discovery`, `Transport`) фатальны только для своего endpoint'а.
/// `Protocol` и `Request` относятся к одному запросу OID.
#[derive(Debug, thiserror::Error)]
pub enum SnmpError {
    /// Неверный или отсутствующий параметр конфигурации
    #[error("Ошибка конфигурации: {0}")]
    Configuration(String),

    /// Запрошена версия SNMP, которую мы не поддерживаем (v1)
    #[error("Версия SNMP не поддерживается: {0}")]
    UnsupportedVersion(String),

    /// SNMPv3: не удалось обнаружить authoritative engine
    #[error("Не удалось обнаружить SNMP Authoritative Engine: {0}")]
    Discovery(String),

    /// Транспорт не поднялся или умер
    #[error("Ошибка транспорта: {0}")]
    Transport(String),

    /// Агент вернул ненулевой error-status
    #[error("Ответ с ошибкой: {0}")]
    Protocol(String),

    /// Таймаут, исчерпаны повторы или сбой при отправке/приёме
    #[error("SNMP запрос не удался: {0}")]
    Request(String),
}

pub type Result<T> = std::result::Result<T, SnmpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_cause() {
        let err = SnmpError::Protocol("No such name".to_string());
        assert!(err.to_string().contains("No such name"));

        let err = SnmpError::UnsupportedVersion("1".to_string());
        assert!(err.to_string().contains('1'));
    }
}
