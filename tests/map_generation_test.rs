//! End-to-end map generation: CSV in, self-contained HTML out.

use std::io::Write;

use incon_tools::infrastructure::sheet_loader::load_track_points;
use incon_tools::map::MapBuilder;
use incon_tools::palette::default_type_colors;
use incon_tools::track::{center_location, group_points, unique_categories};

const SHEET: &str = "\
Data/Hora,Latitude,Longitude,Evento,Ignição,Observações,Tipo,NOME_PESSOA
02/03/2024 08:00:00,-23.550000,-46.630000,Saída da base,LIGADA,,VEÍCULO 1,
02/03/2024 08:10:00,-23.551000,-46.631000,Em deslocamento,LIGADA,,VEÍCULO 1,
02/03/2024 08:10:30,-23.551000,-46.631000,Parada breve,DESLIGADA,ponto cego,VEÍCULO 1,
02/03/2024 08:20:00,-23.552000,-46.632000,Abordagem,DESLIGADA,,VEÍCULO 1,João Silva
02/03/2024 08:05:00,-23.560000,-46.640000,Acompanhamento,LIGADA,,ESCOLTA,
";

fn write_sheet() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(SHEET.as_bytes()).unwrap();
    f
}

fn build_html() -> String {
    let f = write_sheet();
    let points = load_track_points(f.path()).unwrap();
    let groups = group_points(&points);
    let categories = unique_categories(&groups);

    let mut builder = MapBuilder::new("rastreio", center_location(&points), 12);
    builder.add_vehicle_data(&groups, &default_type_colors());
    builder.add_filter_system(&categories);
    builder.finalize().render()
}

#[test]
fn test_html_is_self_contained_leaflet_page() {
    let html = build_html();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("unpkg.com/leaflet@1.9.4"));
    assert!(html.contains("var map_ops = L.map("));
    assert!(html.contains("window.map_ops = map_ops;"));
    assert!(html.contains("L.control.layers"));
}

#[test]
fn test_identical_coordinates_collapse_into_one_marker() {
    let f = write_sheet();
    let points = load_track_points(f.path()).unwrap();
    assert_eq!(points.len(), 5);

    let groups = group_points(&points);
    // the two 08:10 rows share coordinates and category
    assert_eq!(groups.len(), 4);
    let merged = groups
        .iter()
        .find(|g| g.timestamps.len() == 2)
        .expect("collapsed group");
    assert_eq!(merged.events, vec!["Em deslocamento", "Parada breve"]);
    // last row's ignition wins
    assert_eq!(merged.ignition, "DESLIGADA");
}

#[test]
fn test_categories_get_their_own_layers() {
    let html = build_html();
    assert!(html.contains("var fg_ve_culo_1 = L.featureGroup();"));
    assert!(html.contains("var fg_escolta = L.featureGroup();"));
    assert!(html.contains("Categoria: ESCOLTA"));
}

#[test]
fn test_named_point_breaks_trajectory() {
    let html = build_html();
    // VEÍCULO 1 has 3 markers: two unnamed then one named, so exactly
    // one trajectory segment survives
    assert_eq!(html.matches("isTrajeto: true").count(), 1);
    assert!(html.contains("João Silva"));
}

#[test]
fn test_filter_panel_present_with_max_category_total() {
    let html = build_html();
    assert!(html.contains("PAINEL DE FILTROS"));
    // VEÍCULO 1 collapses to 3 markers, ESCOLTA to 1: range runs to 3
    assert!(html.contains("id=\"endIdx\" value=\"3\""));
    assert!(html.contains("resetAllFilters"));
}

#[test]
fn test_checkpoint_system_always_injected() {
    let html = build_html();
    assert!(html.contains("window.createTempCheckpoint"));
    assert!(html.contains("window.initCheckpointSystem"));
}

#[test]
fn test_annotations_only_when_enabled() {
    let html = build_html();
    assert!(!html.contains("anotacoesMapa"));

    let f = write_sheet();
    let points = load_track_points(f.path()).unwrap();
    let groups = group_points(&points);
    let mut builder = MapBuilder::new("rastreio", center_location(&points), 12);
    builder.add_vehicle_data(&groups, &default_type_colors());
    builder.enable_annotations();
    let html = builder.finalize().render();
    assert!(html.contains("anotacoesMapa"));
}

#[test]
fn test_save_writes_file() {
    let f = write_sheet();
    let points = load_track_points(f.path()).unwrap();
    let groups = group_points(&points);

    let mut builder = MapBuilder::new("rastreio", center_location(&points), 12);
    builder.add_vehicle_data(&groups, &default_type_colors());
    let doc = builder.finalize();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mapa.html");
    doc.save(&out).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("var map_ops"));
}
