//! CSV loader for tracking spreadsheets.
//!
//! Handles the CSV export of the telemetry sheet. Brazilian exports are
//! frequently WINDOWS-1252 encoded, so the file is decoded with a fallback
//! before parsing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use encoding_rs::WINDOWS_1252;
use log::warn;
use thiserror::Error;

use crate::types::TrackPoint;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Column positions resolved from the header row.
struct Columns {
    timestamp: usize,
    latitude: usize,
    longitude: usize,
    event: Option<usize>,
    ignition: Option<usize>,
    observation: Option<usize>,
    category: Option<usize>,
    person_name: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SheetError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SheetError::MissingColumn(name.to_string()))
        };

        Ok(Columns {
            timestamp: require("Data/Hora")?,
            latitude: require("Latitude")?,
            longitude: require("Longitude")?,
            event: find("Evento"),
            ignition: find("Ignição"),
            observation: find("Observações"),
            // `Tipo` is the current column name; older sheets used `Veículo`.
            category: find("Tipo").or_else(|| find("Veículo")),
            person_name: find("NOME_PESSOA"),
        })
    }
}

/// Load tracking points from a CSV file.
///
/// Rows with an unparseable timestamp or missing coordinates are dropped and
/// logged; the result comes back sorted by timestamp ascending.
pub fn load_track_points<P: AsRef<Path>>(path: P) -> Result<Vec<TrackPoint>, SheetError> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let decoded = match std::str::from_utf8(&bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                warn!("some characters could not be decoded from WINDOWS-1252");
            }
            text.into_owned()
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let cols = Columns::resolve(&headers)?;

    let mut points = Vec::new();
    let mut dropped = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = row_idx + 2; // header is row 1

        match parse_record(&record, &cols) {
            Some(point) => points.push(point),
            None => {
                dropped += 1;
                warn!("dropping row {row_num}: invalid timestamp or coordinates");
            }
        }
    }

    if dropped > 0 {
        warn!("{dropped} row(s) dropped during ingestion");
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

fn parse_record(record: &csv::StringRecord, cols: &Columns) -> Option<TrackPoint> {
    let timestamp = parse_datetime(record.get(cols.timestamp)?)?;
    let latitude = parse_coord(record.get(cols.latitude)?)?;
    let longitude = parse_coord(record.get(cols.longitude)?)?;

    let get = |idx: Option<usize>| -> String {
        idx.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
    };

    let category = match get(cols.category) {
        c if c.is_empty() => "Geral".to_string(),
        c => c,
    };

    Some(TrackPoint {
        timestamp,
        latitude,
        longitude,
        event: get(cols.event),
        ignition: get(cols.ignition),
        observation: get(cols.observation),
        category,
        person_name: get(cols.person_name),
    })
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_coord(s: &str) -> Option<f64> {
    // Some exports write decimal commas for coordinates too.
    let cleaned = s.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}
