//! CSV Import/Export Helpers
//!
//! Dataset exchange uses a fixed header with `-` marking absent metric
//! cells. Formatting is line-based on both sides.
//
// TODO: quoted fields are not handled; an Access_Policy value containing
// a comma needs a real CSV reader.

use std::collections::HashMap;
use storage::DatasetRecord;

/// Export header, matching the import column vocabulary
pub const EXPORT_HEADER: &str = "Record_ID,Timestamp,Data_Owner,Sector,Data_Provider_Type,\
Data_Category,Temperature_C,Air_Quality_Index,Traffic_Density,Energy_Consumption_kWh,\
Blockchain_Tx_Cost_Gas,Authorization_Latency_sec,Hash";

/// One parsed CSV row, keyed by header column
#[derive(Debug, Clone)]
pub struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// Trimmed cell value for a column; absent or blank cells yield None
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Parse a CSV body: first non-empty line is the header, every later
/// non-empty line becomes a row. Short lines leave trailing columns
/// absent; extra cells are dropped.
pub fn parse(body: &str) -> Vec<CsvRow> {
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_string())
        .collect();

    lines
        .map(|line| {
            let fields = headers
                .iter()
                .zip(line.split(','))
                .map(|(header, cell)| (header.clone(), cell.trim().to_string()))
                .collect();
            CsvRow { fields }
        })
        .collect()
}

/// Render all records in export format, one line per record
pub fn export(records: &[DatasetRecord]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for (index, record) in records.iter().enumerate() {
        let m = &record.metadata;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            index + 1,
            record.created_at.to_rfc3339(),
            record.owner_role,
            m.sector,
            m.provider_type,
            m.category,
            metric_cell(m.readings.temperature_c),
            metric_cell(m.readings.air_quality_index),
            metric_cell(m.readings.traffic_density),
            metric_cell(m.readings.energy_consumption_kwh),
            opt_cell(m.tx_cost_gas),
            opt_cell(m.authorization_latency_sec),
            record.hash,
        ));
    }

    out
}

fn metric_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn opt_cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
