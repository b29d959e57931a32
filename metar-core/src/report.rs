use crate::model::StationRecord;

/// Printed in place of the weather line when a station reports no cloud layers.
pub const NO_CLOUD_DATA: &str = "no cloud data";

/// Separator used when only the raw METAR lines are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    TripleNewline,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::TripleNewline => "\n\n\n",
        }
    }
}

/// Render one block per station, in input order.
///
/// ```text
/// ----La Guardia Airport-----
/// KLGA: KLGA 100451Z 06004KT 10SM CLR ...
///  Weather: CLR, Clear skies
///
/// ```
pub fn format_report(records: &[StationRecord]) -> String {
    let mut out = String::new();

    for record in records {
        let weather = match record.primary_cloud() {
            Some(cloud) => format!("{}, {}", cloud.code, cloud.description),
            None => NO_CLOUD_DATA.to_string(),
        };
        out.push_str(&format!(
            "----{}-----\n{}: {}\n Weather: {}\n\n",
            record.station_name, record.icao, record.raw_text, weather
        ));
    }

    out
}

pub fn join_raw(records: &[StationRecord], delimiter: Delimiter) -> String {
    records
        .iter()
        .map(|r| r.raw_text.as_str())
        .collect::<Vec<_>>()
        .join(delimiter.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CloudLayer;

    fn record(icao: &str, name: &str, clouds: Vec<CloudLayer>) -> StationRecord {
        StationRecord {
            icao: icao.into(),
            raw_text: format!("{icao} TEST"),
            station_name: name.into(),
            clouds,
        }
    }

    fn clear() -> Vec<CloudLayer> {
        vec![CloudLayer { code: "CLR".into(), description: "Clear skies".into() }]
    }

    #[test]
    fn empty_records_give_empty_report() {
        assert_eq!(format_report(&[]), "");
        assert_eq!(join_raw(&[], Delimiter::Comma), "");
    }

    #[test]
    fn single_block_layout() {
        let report = format_report(&[record("KLGA", "Test Airport", clear())]);
        assert_eq!(
            report,
            "----Test Airport-----\nKLGA: KLGA TEST\n Weather: CLR, Clear skies\n\n"
        );
    }

    #[test]
    fn only_first_cloud_layer_is_reported() {
        let clouds = vec![
            CloudLayer { code: "FEW".into(), description: "Few".into() },
            CloudLayer { code: "BKN".into(), description: "Broken".into() },
        ];
        let report = format_report(&[record("KMCC", "McClellan", clouds)]);
        assert!(report.contains(" Weather: FEW, Few\n"));
        assert!(!report.contains("BKN"));
    }

    #[test]
    fn missing_clouds_use_placeholder() {
        let report = format_report(&[record("KAUN", "Auburn", Vec::new())]);
        assert!(report.contains(" Weather: no cloud data\n"));
    }

    #[test]
    fn blocks_are_concatenated_in_order() {
        let report = format_report(&[
            record("KMHR", "Mather", clear()),
            record("KPVF", "Placerville", clear()),
        ]);

        let mather = report.find("----Mather-----").unwrap();
        let placerville = report.find("----Placerville-----").unwrap();
        assert!(mather < placerville);
        assert!(report.contains("Clear skies\n\n----Placerville"));
    }

    #[test]
    fn join_raw_uses_delimiter() {
        let records = [record("KMHR", "Mather", clear()), record("KMCC", "McClellan", clear())];

        assert_eq!(join_raw(&records, Delimiter::Comma), "KMHR TEST,KMCC TEST");
        assert_eq!(join_raw(&records, Delimiter::TripleNewline), "KMHR TEST\n\n\nKMCC TEST");
    }
}
