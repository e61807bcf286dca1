//! KMZ/KML checkpoint extraction.
//!
//! Pulls placemark points (checkpoints, with an optional monetary "valor")
//! and line-string routes out of a `.kml` file or the first `.kml` member of
//! a `.kmz` archive.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use kml::types::{Element, Geometry, Placemark};
use kml::{Kml, KmlReader};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::money::normalize_money;
use crate::types::Checkpoint;

#[derive(Error, Debug)]
pub enum KmzError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to parse KML: {0}")]
    Kml(#[from] kml::Error),

    #[error("KMZ archive contains no .kml member")]
    NoKmlEntry,
}

lazy_static! {
    static ref VALOR_RE: Regex = Regex::new(r"(?i)VALOR.*?(\d[\d\s.,]*)").unwrap();
}

/// Parsed content of a KMZ/KML file.
#[derive(Debug, Default)]
pub struct KmzContent {
    pub checkpoints: Vec<Checkpoint>,
    /// Route vertices from LineString elements, (lat, lon).
    pub lines: Vec<(f64, f64)>,
}

/// Load checkpoints and route lines from a `.kml` or `.kmz` file.
pub fn load_kmz<P: AsRef<Path>>(path: P) -> Result<KmzContent, KmzError> {
    let path = path.as_ref();
    let is_kml = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("kml"))
        .unwrap_or(false);

    let kml_data = if is_kml {
        KmlReader::<_, f64>::from_reader(BufReader::new(File::open(path)?)).read()?
    } else {
        let mut archive = zip::ZipArchive::new(File::open(path)?)?;
        let entry_name = archive
            .file_names()
            .find(|n| n.to_lowercase().ends_with(".kml"))
            .map(String::from)
            .ok_or(KmzError::NoKmlEntry)?;
        let mut bytes = Vec::new();
        archive.by_name(&entry_name)?.read_to_end(&mut bytes)?;
        KmlReader::<_, f64>::from_reader(Cursor::new(bytes)).read()?
    };

    let mut content = KmzContent::default();
    for node in flatten_kml(vec![kml_data]) {
        if let Kml::Placemark(p) = node {
            collect_placemark(&p, &mut content);
        }
    }
    Ok(content)
}

fn flatten_kml(kml: Vec<Kml>) -> Vec<Kml> {
    kml.into_iter()
        .flat_map(|k| match k {
            Kml::KmlDocument(d) => flatten_kml(d.elements),
            Kml::Document { attrs: _, elements } => flatten_kml(elements),
            Kml::Folder { attrs: _, elements } => flatten_kml(elements),
            k => vec![k],
        })
        .collect()
}

fn collect_placemark(placemark: &Placemark, content: &mut KmzContent) {
    if let Some(geometry) = &placemark.geometry {
        collect_geometry(geometry, placemark, content);
    }
}

fn collect_geometry(geometry: &Geometry, placemark: &Placemark, content: &mut KmzContent) {
    match geometry {
        Geometry::Point(point) => {
            content.checkpoints.push(Checkpoint {
                latitude: point.coord.y,
                longitude: point.coord.x,
                name: placemark.name.clone().unwrap_or_default().trim().to_string(),
                address: child_content(&placemark.children, "address").unwrap_or_default(),
                valor_centavos: extract_valor(placemark),
            });
        }
        Geometry::LineString(line) => {
            content
                .lines
                .extend(line.coords.iter().map(|c| (c.y, c.x)));
        }
        Geometry::MultiGeometry(multi) => {
            for g in &multi.geometries {
                collect_geometry(g, placemark, content);
            }
        }
        _ => {}
    }
}

/// "valor" from ExtendedData first, then from a `VALOR …` pattern in the
/// description.
fn extract_valor(placemark: &Placemark) -> Option<i64> {
    for data in extended_data_elements(&placemark.children) {
        let name = data.attrs.get("name").cloned().unwrap_or_default();
        if !name.trim().to_lowercase().contains("valor") {
            continue;
        }
        let raw = child_content(&data.children, "value").unwrap_or_default();
        if let Some(centavos) = normalize_money(&raw) {
            return Some(centavos);
        }
    }

    let description = placemark.description.as_deref().unwrap_or("");
    VALOR_RE
        .captures(description)
        .and_then(|c| normalize_money(c.get(1)?.as_str()))
}

fn extended_data_elements(children: &[Element]) -> Vec<&Element> {
    children
        .iter()
        .filter(|e| e.name == "ExtendedData")
        .flat_map(|e| e.children.iter().filter(|d| d.name == "Data"))
        .collect()
}

fn child_content(children: &[Element], name: &str) -> Option<String> {
    children
        .iter()
        .find(|e| e.name == name)
        .and_then(|e| e.content.clone())
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>CD Campinas</name>
      <description>Entrega - VALOR R$ 1.234,56</description>
      <Point><coordinates>-47.06,-22.90,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Rota</name>
      <LineString><coordinates>-47.0,-22.9,0 -47.1,-23.0,0</coordinates></LineString>
    </Placemark>
  </Document>
</kml>"#;

    #[test]
    fn test_parse_kml_points_and_lines() {
        let mut f = tempfile::Builder::new().suffix(".kml").tempfile().unwrap();
        f.write_all(SAMPLE_KML.as_bytes()).unwrap();

        let content = load_kmz(f.path()).unwrap();
        assert_eq!(content.checkpoints.len(), 1);
        let cp = &content.checkpoints[0];
        assert_eq!(cp.name, "CD Campinas");
        assert!((cp.latitude - -22.90).abs() < 1e-9);
        assert!((cp.longitude - -47.06).abs() < 1e-9);
        assert_eq!(cp.valor_centavos, Some(123_456));

        assert_eq!(content.lines.len(), 2);
        assert!((content.lines[0].0 - -22.9).abs() < 1e-9);
    }

    #[test]
    fn test_kmz_without_kml_member() {
        let f = tempfile::Builder::new().suffix(".kmz").tempfile().unwrap();
        {
            let mut writer = zip::ZipWriter::new(f.reopen().unwrap());
            writer
                .start_file("readme.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"nothing here").unwrap();
            writer.finish().unwrap();
        }
        let err = load_kmz(f.path()).unwrap_err();
        assert!(matches!(err, KmzError::NoKmlEntry));
    }

    #[test]
    fn test_kmz_archive_roundtrip() {
        let f = tempfile::Builder::new().suffix(".kmz").tempfile().unwrap();
        {
            let mut writer = zip::ZipWriter::new(f.reopen().unwrap());
            writer
                .start_file("doc.kml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(SAMPLE_KML.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        let content = load_kmz(f.path()).unwrap();
        assert_eq!(content.checkpoints.len(), 1);
    }
}
