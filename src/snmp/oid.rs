use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use snmp2::Oid;

use crate::error::{Result, SnmpError};

/// Разбирает строку OID ("1.3.6.1..." или ".1.3.6.1...") на числовые компоненты
fn oid_components(s: &str) -> Result<Vec<u64>> {
    let trimmed = s.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(SnmpError::Configuration(format!("Пустой OID: '{}'", s)));
    }

    trimmed
        .split('.')
        .map(|p| {
            p.parse::<u64>()
                .map_err(|e| SnmpError::Configuration(format!("Невалидный OID '{}': {}", s, e)))
        })
        .collect()
}

pub fn parse_oid(s: &str) -> Result<Oid<'static>> {
    let parts = oid_components(s)?;
    Oid::from(&parts)
        .map_err(|e| SnmpError::Configuration(format!("Не удалось создать Oid '{}': {:?}", s, e)))
}

/// Приводит OID к одной форме: без пробелов и без ведущей точки.
/// Через эту функцию проходят и ключи каталога, и OID из ответа агента.
pub fn normalize_oid(s: &str) -> String {
    s.trim().trim_start_matches('.').to_string()
}

/// Каталог OID -> имя метрики для одного endpoint'а
#[derive(Debug, Clone)]
pub struct OidCatalog {
    entries: BTreeMap<String, String>,
}

impl OidCatalog {
    pub fn new(oids: &HashMap<String, String>) -> Result<Self> {
        if oids.is_empty() {
            return Err(SnmpError::Configuration(
                "Список OID для опроса пустой".to_string(),
            ));
        }

        let mut entries = BTreeMap::new();
        for (oid, label) in oids {
            parse_oid(oid)?;
            match entries.entry(normalize_oid(oid)) {
                Entry::Vacant(slot) => {
                    slot.insert(label.clone());
                }
                Entry::Occupied(slot) => {
                    return Err(SnmpError::Configuration(format!(
                        "OID {} задан дважды (с ведущей точкой и без)",
                        slot.key()
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Имя метрики по OID, в любой из двух форм записи
    pub fn label(&self, oid: &str) -> Option<&str> {
        self.entries.get(&normalize_oid(oid)).map(String::as_str)
    }

    pub fn oids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Каталог по умолчанию: нагрузка, CPU и swap из UCD-SNMP-MIB
pub fn default_oids() -> HashMap<String, String> {
    [
        (".1.3.6.1.4.1.2021.10.1.3.1", "1 minute load average"),
        (".1.3.6.1.4.1.2021.10.1.3.2", "5 minute load average"),
        (".1.3.6.1.4.1.2021.10.1.3.3", "15 minute load average"),
        (".1.3.6.1.4.1.2021.11.11.0", "CPU Idle %"),
        (".1.3.6.1.4.1.2021.11.9.0", "CPU User %"),
        (".1.3.6.1.4.1.2021.4.4.0", "Swap Available"),
        (".1.3.6.1.4.1.2021.4.3.0", "Swap Total"),
    ]
    .into_iter()
    .map(|(oid, label)| (oid.to_string(), label.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_resolves_both_forms() {
        let catalog = OidCatalog::new(&default_oids()).unwrap();
        assert_eq!(catalog.len(), 7);
        assert_eq!(
            catalog.label("1.3.6.1.4.1.2021.11.11.0"),
            Some("CPU Idle %")
        );
        assert_eq!(
            catalog.label(".1.3.6.1.4.1.2021.11.11.0"),
            Some("CPU Idle %")
        );
        assert_eq!(catalog.label("1.3.6.1.2.1.1.1.0"), None);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = OidCatalog::new(&HashMap::new()).unwrap_err();
        assert!(matches!(err, SnmpError::Configuration(_)));
    }

    #[test]
    fn malformed_oid_is_rejected() {
        let mut oids = HashMap::new();
        oids.insert("1.3.six.1".to_string(), "broken".to_string());
        let err = OidCatalog::new(&oids).unwrap_err();
        assert!(matches!(err, SnmpError::Configuration(_)));
    }

    #[test]
    fn same_oid_in_both_forms_is_rejected() {
        let oids = HashMap::from([
            ("1.3.6.1.4.1.2021.11.11.0".to_string(), "idle".to_string()),
            (".1.3.6.1.4.1.2021.11.11.0".to_string(), "CPU Idle %".to_string()),
        ]);
        let err = OidCatalog::new(&oids).unwrap_err();
        assert!(matches!(err, SnmpError::Configuration(_)));
        assert!(err.to_string().contains("1.3.6.1.4.1.2021.11.11.0"));
    }

    #[test]
    fn unencodable_oid_is_rejected_up_front() {
        for oid in ["5", "7.1.2", "1.45.2"] {
            let oids = HashMap::from([(oid.to_string(), "bad arc".to_string())]);
            assert!(
                matches!(OidCatalog::new(&oids), Err(SnmpError::Configuration(_))),
                "{oid}"
            );
        }
    }

    #[test]
    fn parse_oid_accepts_leading_dot() {
        let oid = parse_oid(".1.3.6.1.2.1.1.2.0").unwrap();
        assert_eq!(oid, parse_oid("1.3.6.1.2.1.1.2.0").unwrap());
    }
}
