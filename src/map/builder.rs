//! Map assembly: feature groups, gradient markers, trajectory lines.

use std::collections::BTreeMap;

use crate::infrastructure::kmz_loader::KmzContent;
use crate::map::annotations::build_annotation_js;
use crate::map::checkpoints::build_checkpoint_js;
use crate::map::components::{
    has_displayable_name, kmz_marker_html, kmz_popup_html, vehicle_marker_html,
    vehicle_popup_html,
};
use crate::map::document::{js_string, FeatureGroup, MapDocument, MAP_VAR};
use crate::map::filters::{build_filter_html, build_filter_js};
use crate::palette::{marker_color, type_color, CHECKPOINT_COLORS};
use crate::types::{Checkpoint, TrackGroup};

pub struct MapBuilder {
    document: MapDocument,
    colors: BTreeMap<String, String>,
    /// Largest per-category point count; the range filter runs on
    /// per-category indices.
    total_markers: usize,
    annotations: bool,
}

impl MapBuilder {
    pub fn new(title: &str, center: (f64, f64), zoom: u8) -> Self {
        Self {
            document: MapDocument::new(title, center, zoom),
            colors: BTreeMap::new(),
            total_markers: 0,
            annotations: false,
        }
    }

    /// Add one feature group per category, markers colored along the group
    /// gradient and trajectory lines between consecutive unnamed points.
    pub fn add_vehicle_data(&mut self, groups: &[TrackGroup], colors: &BTreeMap<String, String>) {
        self.colors = colors.clone();

        // Partition by category, keeping the earliest-timestamp ordering
        // already present in `groups`.
        let mut order: Vec<String> = Vec::new();
        let mut by_category: BTreeMap<String, Vec<&TrackGroup>> = BTreeMap::new();
        for g in groups {
            if !by_category.contains_key(&g.category) {
                order.push(g.category.clone());
            }
            by_category.entry(g.category.clone()).or_default().push(g);
        }

        let mut used_names: Vec<String> = Vec::new();
        for category in order {
            let members = &by_category[&category];
            let base_color = type_color(&category, &self.colors).to_string();
            let mut statements = Vec::new();
            let var_name = group_var_name(&category, &used_names);
            used_names.push(var_name.clone());

            for (i, g) in members.iter().enumerate() {
                let icon_color = marker_color(&category, i, members.len(), &self.colors);
                let icon = js_string(&vehicle_marker_html(g, i, &icon_color));
                let popup = js_string(&vehicle_popup_html(g, i, &icon_color));
                statements.push(format!(
                    "L.marker([{lat:.6}, {lon:.6}], {{ icon: L.divIcon({{ className: '', \
                     iconSize: [35, 22], iconAnchor: [11, 11], html: {icon} }}) }})\
                     .bindPopup({popup}, {{ maxWidth: 300 }}).addTo({var_name});",
                    lat = g.latitude,
                    lon = g.longitude,
                ));
            }

            // Trajectory segments only between consecutive points where
            // neither endpoint carries a person name.
            for pair in members.windows(2) {
                if has_displayable_name(pair[0]) || has_displayable_name(pair[1]) {
                    continue;
                }
                statements.push(format!(
                    "L.polyline([[{:.6}, {:.6}], [{:.6}, {:.6}]], {{ color: '{base_color}', \
                     weight: 2, opacity: 0.8, isTrajeto: true, vehicleType: {vtype}, \
                     hasName: false }}).bindTooltip({tooltip}).addTo({var_name});",
                    pair[0].latitude,
                    pair[0].longitude,
                    pair[1].latitude,
                    pair[1].longitude,
                    vtype = js_string(&category.to_lowercase()),
                    tooltip = js_string(&format!("Trajeto: {category}")),
                ));
            }

            self.total_markers = self.total_markers.max(members.len());
            self.document.add_feature_group(FeatureGroup {
                var_name,
                label: format!("Categoria: {category}"),
                statements,
            });
        }
    }

    /// Overlay KMZ checkpoints (and their route lines) as their own layer.
    pub fn add_checkpoints(&mut self, content: &KmzContent) {
        if content.checkpoints.is_empty() && content.lines.is_empty() {
            return;
        }

        let var_name = "fg_kmz_checkpoints".to_string();
        let mut statements = Vec::new();

        for (i, cp) in content.checkpoints.iter().enumerate() {
            let number = i + 1;
            let color = CHECKPOINT_COLORS[i % CHECKPOINT_COLORS.len()];
            statements.push(checkpoint_statement(cp, number, color, &var_name));
        }

        if content.lines.len() > 1 {
            let coords: Vec<String> = content
                .lines
                .iter()
                .map(|(lat, lon)| format!("[{lat:.6}, {lon:.6}]"))
                .collect();
            statements.push(format!(
                "L.polyline([{}], {{ color: '#555555', weight: 2, opacity: 0.6, \
                 dashArray: '6 4' }}).addTo({var_name});",
                coords.join(", ")
            ));
        }

        self.document.add_feature_group(FeatureGroup {
            var_name,
            label: "Checkpoints (KMZ)".to_string(),
            statements,
        });
    }

    /// Attach the filter panel and its script.
    pub fn add_filter_system(&mut self, categories: &[String]) {
        let html = build_filter_html(categories, self.total_markers, &self.colors);
        self.document.add_html(html);
        self.document.add_script(build_filter_js(MAP_VAR, self.total_markers));
    }

    pub fn enable_annotations(&mut self) {
        self.annotations = true;
    }

    /// Inject the browser-side systems and hand back the finished document.
    pub fn finalize(mut self) -> MapDocument {
        self.document.add_script(build_checkpoint_js(MAP_VAR));
        if self.annotations {
            self.document.add_script(build_annotation_js(MAP_VAR));
        }
        self.document
    }
}

fn checkpoint_statement(cp: &Checkpoint, number: usize, color: &str, var_name: &str) -> String {
    let icon = js_string(&kmz_marker_html(cp, number, color));
    let popup = js_string(&kmz_popup_html(cp, number));
    format!(
        "L.marker([{lat:.6}, {lon:.6}], {{ icon: L.divIcon({{ className: '', \
         iconSize: [20, 20], iconAnchor: [10, 10], html: {icon} }}) }})\
         .bindPopup({popup}, {{ maxWidth: 200 }}).addTo({var_name});",
        lat = cp.latitude,
        lon = cp.longitude,
    )
}

/// JS identifier for a category's feature group. Sanitizing can map distinct
/// categories to the same identifier, so taken names get a numeric suffix.
fn group_var_name(category: &str, used: &[String]) -> String {
    let sanitized: String = category
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let base = format!("fg_{sanitized}");
    if !used.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
