//! Marker and popup HTML fragments.

use crate::text::{html_escape, is_nonempty_obs, is_valid_name, normalize_string};
use crate::types::{Checkpoint, TrackGroup};

/// Compact circle marker that the filter JS can relabel between point
/// number, HH:MM, date+time and person name.
pub fn vehicle_marker_html(group: &TrackGroup, idx: usize, icon_color: &str) -> String {
    let number = idx + 1;
    let first = group.first_timestamp();
    let hora = first.format("%H:%M").to_string();
    let data_hora = first.format("%d/%m %H:%M").to_string();

    let has_name = group.has_valid_name();
    let nome = if has_name {
        html_escape(group.person_name.trim())
    } else {
        String::new()
    };

    let mut eventos: Vec<String> = group
        .events
        .iter()
        .map(|e| e.replace(['\'', '"'], ""))
        .collect();
    eventos.sort();
    eventos.dedup();
    let eventos = eventos.join(",").to_lowercase();

    format!(
        "<div class=\"marker-circle\" id=\"marker-{number}\" \
         data-idx=\"{number}\" \
         data-eventos=\"{eventos}\" \
         data-ignicao=\"{ignicao}\" \
         data-veiculo=\"{veiculo}\" \
         data-hasname=\"{has_name}\" \
         data-originalcolor=\"{icon_color}\" \
         style=\"background-color: {icon_color} !important; \
                 display: flex !important; justify-content: center !important; \
                 align-items: center !important; color: white !important; \
                 font-weight: bold !important; font-size: 10px !important; \
                 border: 2px solid white !important; \
                 box-shadow: 0 0 4px rgba(0,0,0,0.6) !important; \
                 white-space: nowrap !important; transition: all 0.2s ease; \
                 width: 22px; height: 22px; border-radius: 50%;\">\
         <span class=\"m-num\">{number}</span>\
         <span class=\"m-hora\" style=\"display:none;\">{hora}</span>\
         <span class=\"m-data-hora\" style=\"display:none;\">{data_hora}</span>\
         <span class=\"m-nome\" style=\"display:none;\">{nome}</span>\
         </div>",
        ignicao = group.ignition.to_lowercase(),
        veiculo = group.category.to_lowercase(),
    )
}

/// Popup with the group header, observation history and event list.
pub fn vehicle_popup_html(group: &TrackGroup, idx: usize, icon_color: &str) -> String {
    let ignicao = group.ignition.to_uppercase();

    let obs_items: Vec<String> = group
        .timestamps
        .iter()
        .zip(group.observations.iter())
        .filter(|(_, obs)| is_nonempty_obs(obs))
        .map(|(ts, obs)| {
            format!(
                "<li style='margin-bottom:2px;'>{} — {}</li>",
                ts.format("%d/%m/%Y %H:%M:%S"),
                html_escape(obs)
            )
        })
        .collect();

    let obs_section = if obs_items.is_empty() {
        String::new()
    } else {
        format!(
            "<div style='margin-top:8px;'><b>Obs:</b>\
             <ul style='padding-left:15px; margin:5px 0;'>{}</ul></div>\
             <hr style='margin:5px 0;'>",
            obs_items.join("")
        )
    };

    let event_items: String = group
        .timestamps
        .iter()
        .zip(group.events.iter())
        .map(|(ts, ev)| format!("<li>{}: {}</li>", ts.format("%H:%M:%S"), html_escape(ev)))
        .collect();

    format!(
        "<div style=\"font-family: Arial; font-size: 12px; width: 280px;\">\
         <h4 style=\"margin:0; color: {icon_color}\">Ponto #{number}</h4>\
         <hr style=\"margin: 5px 0;\">\
         <b>Veículo:</b> {categoria} | <b>Ignição:</b> {ignicao}<br>\
         <b>Lat/Lon:</b> {lat:.6}, {lon:.6}\
         <hr style=\"margin: 5px 0;\">\
         {obs_section}\
         <div style=\"max-height: 120px; overflow-y: auto;\">\
         <b>Eventos:</b>\
         <ul style=\"padding-left: 15px; margin: 5px 0;\">{event_items}</ul>\
         </div></div>",
        number = idx + 1,
        categoria = html_escape(&group.category),
        lat = group.latitude,
        lon = group.longitude,
    )
}

/// Compact KMZ checkpoint marker.
pub fn kmz_marker_html(checkpoint: &Checkpoint, number: usize, color: &str) -> String {
    let name = if checkpoint.name.is_empty() {
        format!("CP {number}")
    } else {
        checkpoint.name.clone()
    };
    let client_key = normalize_string(&name);

    format!(
        "<div class=\"kmz-checkpoint\" data-clientkey=\"{key}\" \
         style=\"background-color: {color} !important; border-radius: 50% !important; \
                 width: 20px !important; height: 20px !important; \
                 display: flex !important; justify-content: center !important; \
                 align-items: center !important; color: white !important; \
                 font-size: 9px !important; border: 1.5px solid white !important;\">\
         {number}</div>",
        key = html_escape(&client_key),
    )
}

pub fn kmz_popup_html(checkpoint: &Checkpoint, number: usize) -> String {
    let name = if checkpoint.name.is_empty() {
        format!("CP {number}")
    } else {
        checkpoint.name.clone()
    };

    let mut popup = format!("<b>Check:</b> {}", html_escape(&name));
    if !checkpoint.address.is_empty() {
        popup.push_str(&format!("<br><b>End.:</b> {}", html_escape(&checkpoint.address)));
    }
    if let Some(valor) = checkpoint.valor_formatted() {
        popup.push_str(&format!("<br><b>Valor:</b> {}", html_escape(&valor)));
    }
    popup
}

/// Invalid-name rule shared with the polyline logic.
pub fn has_displayable_name(group: &TrackGroup) -> bool {
    is_valid_name(&group.person_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn group() -> TrackGroup {
        TrackGroup {
            latitude: -23.55,
            longitude: -46.63,
            category: "VEÍCULO 1".to_string(),
            timestamps: vec![
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap().and_hms_opt(8, 5, 0).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap().and_hms_opt(8, 7, 0).unwrap(),
            ],
            events: vec!["Parada".to_string(), "Saída".to_string()],
            observations: vec![String::new(), "suspeita <aqui>".to_string()],
            ignition: "Ligada".to_string(),
            person_name: String::new(),
        }
    }

    #[test]
    fn test_marker_data_attributes() {
        let html = vehicle_marker_html(&group(), 0, "#0608c2");
        assert!(html.contains("data-idx=\"1\""));
        assert!(html.contains("data-veiculo=\"veículo 1\""));
        assert!(html.contains("data-ignicao=\"ligada\""));
        assert!(html.contains("data-hasname=\"false\""));
        assert!(html.contains("<span class=\"m-hora\" style=\"display:none;\">08:05</span>"));
        assert!(html.contains("<span class=\"m-nome\" style=\"display:none;\"></span>"));
    }

    #[test]
    fn test_marker_with_name() {
        let mut g = group();
        g.person_name = "Carlos Lima".to_string();
        let html = vehicle_marker_html(&g, 2, "#8f0606");
        assert!(html.contains("data-hasname=\"true\""));
        assert!(html.contains(">Carlos Lima</span>"));
    }

    #[test]
    fn test_popup_escapes_observations() {
        let html = vehicle_popup_html(&group(), 0, "#0608c2");
        assert!(html.contains("suspeita &lt;aqui&gt;"));
        assert!(html.contains("Ponto #1"));
        assert!(html.contains("08:05:00: Parada"));
        // empty observation is not listed
        assert_eq!(html.matches("<li style='margin-bottom:2px;'>").count(), 1);
    }

    #[test]
    fn test_kmz_marker_fallback_name() {
        let cp = Checkpoint {
            latitude: 0.0,
            longitude: 0.0,
            name: String::new(),
            address: String::new(),
            valor_centavos: Some(250_000),
        };
        let html = kmz_marker_html(&cp, 3, "#ff0000");
        assert!(html.contains("data-clientkey=\"cp 3\""));
        let popup = kmz_popup_html(&cp, 3);
        assert!(popup.contains("CP 3"));
        assert!(popup.contains("R$ 2.500,00"));
    }
}
