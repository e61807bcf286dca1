//! Leaflet HTML document assembly.
//!
//! The generator emits a single self-contained page: Leaflet from a CDN, a
//! full-screen map div, one script block per injected component. Components
//! hand over opaque HTML/JS strings; this module only owns the skeleton and
//! the final serialization.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// JS variable name of the map object. Injected scripts reach it through
/// `window.<MAP_VAR>`.
pub const MAP_VAR: &str = "map_ops";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// A named overlay layer and the JS statements that populate it.
#[derive(Debug)]
pub struct FeatureGroup {
    /// JS variable name, e.g. `fg_veiculo_1`.
    pub var_name: String,
    /// Label shown in the layer control.
    pub label: String,
    /// Statements appended after the group is created; each may reference
    /// `var_name`.
    pub statements: Vec<String>,
}

/// In-memory map page under construction.
#[derive(Debug)]
pub struct MapDocument {
    title: String,
    center: (f64, f64),
    zoom: u8,
    html_blocks: Vec<String>,
    script_blocks: Vec<String>,
    groups: Vec<FeatureGroup>,
}

impl MapDocument {
    pub fn new(title: &str, center: (f64, f64), zoom: u8) -> Self {
        Self {
            title: title.to_string(),
            center,
            zoom,
            html_blocks: Vec::new(),
            script_blocks: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Inject a raw HTML block (panels, legends) into the page body.
    pub fn add_html(&mut self, block: String) {
        self.html_blocks.push(block);
    }

    /// Inject a raw `<script>` block, run after the map is initialized.
    pub fn add_script(&mut self, block: String) {
        self.script_blocks.push(block);
    }

    pub fn add_feature_group(&mut self, group: FeatureGroup) {
        self.groups.push(group);
    }

    /// Serialize the whole page.
    pub fn render(&self) -> String {
        let mut page = String::with_capacity(64 * 1024);

        page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        page.push_str("<meta charset=\"utf-8\">\n");
        page.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        page.push_str(&format!("<title>{}</title>\n", crate::text::html_escape(&self.title)));
        page.push_str(&format!("<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n"));
        page.push_str(&format!("<script src=\"{LEAFLET_JS}\"></script>\n"));
        page.push_str(
            "<style>html, body, #map { width: 100%; height: 100%; margin: 0; padding: 0; }</style>\n",
        );
        page.push_str("</head>\n<body>\n");

        for block in &self.html_blocks {
            page.push_str(block);
            page.push('\n');
        }

        page.push_str("<div id=\"map\"></div>\n");

        page.push_str("<script>\n");
        page.push_str(&format!(
            "var {MAP_VAR} = L.map('map').setView([{:.6}, {:.6}], {});\n",
            self.center.0, self.center.1, self.zoom
        ));
        page.push_str(&format!("window.{MAP_VAR} = {MAP_VAR};\n"));
        page.push_str(&format!(
            "L.tileLayer('{TILE_URL}', {{ maxZoom: 19, attribution: '{TILE_ATTRIBUTION}' }}).addTo({MAP_VAR});\n"
        ));
        page.push_str(&format!(
            "L.control.scale({{ position: 'topright' }}).addTo({MAP_VAR});\n"
        ));

        for group in &self.groups {
            page.push_str(&format!("var {} = L.featureGroup();\n", group.var_name));
            for stmt in &group.statements {
                page.push_str(stmt);
                page.push('\n');
            }
            page.push_str(&format!("{}.addTo({MAP_VAR});\n", group.var_name));
        }

        if !self.groups.is_empty() {
            let overlays: Vec<String> = self
                .groups
                .iter()
                .map(|g| format!("{}: {}", js_string(&g.label), g.var_name))
                .collect();
            page.push_str(&format!(
                "L.control.layers(null, {{ {} }}, {{ collapsed: false }}).addTo({MAP_VAR});\n",
                overlays.join(", ")
            ));
        }

        page.push_str("</script>\n");

        for block in &self.script_blocks {
            page.push_str(block);
            page.push('\n');
        }

        page.push_str("</body>\n</html>\n");
        page
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

/// Encode arbitrary text as a JS string literal (quotes included).
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_skeleton() {
        let doc = MapDocument::new("Mapa", (-23.55, -46.63), 12);
        let html = doc.render();
        assert!(html.contains("var map_ops = L.map('map').setView([-23.550000, -46.630000], 12);"));
        assert!(html.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(html.contains("<div id=\"map\">"));
    }

    #[test]
    fn test_feature_group_and_layer_control() {
        let mut doc = MapDocument::new("Mapa", (0.0, 0.0), 12);
        doc.add_feature_group(FeatureGroup {
            var_name: "fg_teste".to_string(),
            label: "Categoria: Teste".to_string(),
            statements: vec!["// marker here".to_string()],
        });
        let html = doc.render();
        assert!(html.contains("var fg_teste = L.featureGroup();"));
        assert!(html.contains("fg_teste.addTo(map_ops);"));
        assert!(html.contains("\"Categoria: Teste\": fg_teste"));
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }
}
