use chrono::{DateTime, Utc};
use serde::Serialize;

/// One cloud layer as reported by the decoded METAR endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudLayer {
    pub code: String,
    pub description: String,
}

/// A single decoded station observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRecord {
    pub icao: String,
    pub raw_text: String,
    pub station_name: String,
    pub clouds: Vec<CloudLayer>,
}

impl StationRecord {
    /// The first reported cloud layer, if the station reported any.
    pub fn primary_cloud(&self) -> Option<&CloudLayer> {
        self.clouds.first()
    }
}

/// The last successful fetch, kept by the service as its cache.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Request URL the records were fetched with.
    pub query: String,
    pub records: Vec<StationRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl QueryResult {
    pub fn new(query: String, records: Vec<StationRecord>) -> Self {
        Self { query, records, fetched_at: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_cloud_is_none_without_layers() {
        let record = StationRecord {
            icao: "KMHR".into(),
            raw_text: "KMHR 100451Z".into(),
            station_name: "Sacramento Mather".into(),
            clouds: Vec::new(),
        };
        assert!(record.primary_cloud().is_none());
    }

    #[test]
    fn serialized_cloud_layer_uses_model_names() {
        let layer = CloudLayer { code: "SCT".into(), description: "Scattered".into() };
        let value = serde_json::to_value(&layer).unwrap();

        assert_eq!(value["description"], "Scattered");
        assert!(value.get("text").is_none());
    }
}
