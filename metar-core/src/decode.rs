//! Projection of the provider's decoded-METAR JSON onto [`StationRecord`].
//!
//! Only the fields the report needs are read; everything else in the payload
//! (barometer, dewpoint, humidity, ...) is skipped by serde.

use serde::Deserialize;

use crate::{
    error::MetarError,
    model::{CloudLayer, StationRecord},
};

#[derive(Debug, Deserialize)]
struct CwEnvelope {
    data: Vec<CwStation>,
}

#[derive(Debug, Deserialize)]
struct CwStation {
    icao: String,
    raw_text: String,
    station: CwStationInfo,
    clouds: Vec<CwCloud>,
}

#[derive(Debug, Deserialize)]
struct CwStationInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CwCloud {
    code: String,
    text: String,
}

impl From<CwCloud> for CloudLayer {
    fn from(cloud: CwCloud) -> Self {
        Self { code: cloud.code, description: cloud.text }
    }
}

/// Decode a response body into station records, preserving payload order.
///
/// One malformed entry fails the whole batch.
pub fn decode(body: &[u8]) -> Result<Vec<StationRecord>, MetarError> {
    let envelope: CwEnvelope = serde_json::from_slice(body)?;

    let records = envelope
        .data
        .into_iter()
        .enumerate()
        .map(|(index, station)| into_record(index, station))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = records.len(), "decoded METAR batch");
    Ok(records)
}

fn into_record(index: usize, station: CwStation) -> Result<StationRecord, MetarError> {
    if station.icao.trim().is_empty() {
        return Err(MetarError::EmptyField { index, field: "icao" });
    }
    if station.raw_text.trim().is_empty() {
        return Err(MetarError::EmptyField { index, field: "raw_text" });
    }

    Ok(StationRecord {
        icao: station.icao,
        raw_text: station.raw_text,
        station_name: station.station.name,
        clouds: station.clouds.into_iter().map(CloudLayer::from).collect(),
    })
}
