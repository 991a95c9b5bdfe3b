use crate::error::SimError;
use serde::Deserialize;

pub mod remote;

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorRecord {
    pub connector_name: String,
    pub merchant_connector_id: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorMap {
    entries: Vec<(String, String)>,
}

impl ConnectorMap {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut map = Self::default();
        for (name, account) in pairs {
            map.insert(name, account);
        }
        map
    }

    /// Later duplicates replace the account id but keep the first position.
    pub fn insert(&mut self, name: String, account_id: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = account_id;
        } else {
            self.entries.push((name, account_id));
        }
    }

    pub fn account_id(&self, connector: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == connector)
            .map(|(_, a)| a.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
pub trait ConnectorSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ConnectorRecord>, SimError>;
}

pub struct ConnectorDirectory {
    pub static_connectors: Vec<(String, String)>,
    pub profile_id: String,
    pub remote: Option<Box<dyn ConnectorSource>>,
}

impl ConnectorDirectory {
    pub fn from_static(pairs: Vec<(String, String)>) -> Self {
        Self {
            static_connectors: pairs,
            profile_id: String::new(),
            remote: None,
        }
    }

    pub async fn resolve(&self) -> Result<ConnectorMap, SimError> {
        if !self.static_connectors.is_empty() {
            return Ok(ConnectorMap::from_pairs(self.static_connectors.clone()));
        }

        let Some(remote) = &self.remote else {
            return Err(SimError::DirectoryUnavailable(
                "no static connectors configured and no lookup source".to_string(),
            ));
        };

        let records = match remote.fetch().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("connector lookup failed: {}", e);
                Vec::new()
            }
        };

        let map = filter_records(records, &self.profile_id);
        if map.is_empty() {
            return Err(SimError::DirectoryUnavailable(format!(
                "connector lookup returned no enabled connector for profile {}",
                self.profile_id
            )));
        }

        tracing::info!("connector map loaded for profile {}: {:?}", self.profile_id, map.names());
        Ok(map)
    }
}

pub fn filter_records(records: Vec<ConnectorRecord>, profile_id: &str) -> ConnectorMap {
    let mut map = ConnectorMap::default();
    for record in records {
        if record.disabled || record.profile_id.as_deref() != Some(profile_id) {
            continue;
        }
        map.insert(record.connector_name, record.merchant_connector_id);
    }
    map
}
