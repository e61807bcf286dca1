//! Grouping and summary queries over tracking points.

use std::collections::HashMap;

use crate::types::{TrackGroup, TrackPoint};

/// Collapse points by exact (latitude, longitude, category).
///
/// Input order is preserved inside each group; the groups themselves come
/// back sorted by their earliest timestamp. Callers are expected to pass
/// points already sorted by timestamp (the sheet loader does).
pub fn group_points(points: &[TrackPoint]) -> Vec<TrackGroup> {
    let mut index: HashMap<(u64, u64, String), usize> = HashMap::new();
    let mut groups: Vec<TrackGroup> = Vec::new();

    for p in points {
        let key = (p.latitude.to_bits(), p.longitude.to_bits(), p.category.clone());
        match index.get(&key) {
            Some(&i) => {
                let g = &mut groups[i];
                g.timestamps.push(p.timestamp);
                g.events.push(p.event.clone());
                g.observations.push(p.observation.clone());
                // Last row of the group wins for ignition state.
                g.ignition = p.ignition.clone();
            }
            None => {
                index.insert(key, groups.len());
                groups.push(TrackGroup {
                    latitude: p.latitude,
                    longitude: p.longitude,
                    category: p.category.clone(),
                    timestamps: vec![p.timestamp],
                    events: vec![p.event.clone()],
                    observations: vec![p.observation.clone()],
                    ignition: p.ignition.clone(),
                    person_name: p.person_name.clone(),
                });
            }
        }
    }

    groups.sort_by_key(|g| g.first_timestamp());
    groups
}

/// Distinct non-empty event labels, sorted.
pub fn unique_events(groups: &[TrackGroup]) -> Vec<String> {
    let mut events: Vec<String> = groups
        .iter()
        .flat_map(|g| g.events.iter())
        .filter(|e| !e.trim().is_empty())
        .cloned()
        .collect();
    events.sort();
    events.dedup();
    events
}

/// Distinct category labels, sorted.
pub fn unique_categories(groups: &[TrackGroup]) -> Vec<String> {
    let mut cats: Vec<String> = groups.iter().map(|g| g.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}

/// Mean coordinate of all raw points, used to center the map.
pub fn center_location(points: &[TrackPoint]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let lat: f64 = points.iter().map(|p| p.latitude).sum();
    let lon: f64 = points.iter().map(|p| p.longitude).sum();
    (lat / n, lon / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(ts_min: u32, lat: f64, lon: f64, event: &str, cat: &str) -> TrackPoint {
        TrackPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(8, ts_min, 0)
                .unwrap(),
            latitude: lat,
            longitude: lon,
            event: event.to_string(),
            ignition: "LIGADA".to_string(),
            observation: String::new(),
            category: cat.to_string(),
            person_name: String::new(),
        }
    }

    #[test]
    fn test_identical_key_collapses_preserving_order() {
        let points = vec![
            point(1, -23.5, -46.6, "Parada", "VEÍCULO 1"),
            point(2, -23.5, -46.6, "Saída", "VEÍCULO 1"),
        ];
        let groups = group_points(&points);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].events, vec!["Parada", "Saída"]);
        assert_eq!(groups[0].timestamps.len(), 2);
    }

    #[test]
    fn test_category_splits_groups_at_same_coordinate() {
        let points = vec![
            point(1, -23.5, -46.6, "Parada", "VEÍCULO 1"),
            point(2, -23.5, -46.6, "Parada", "ESCOLTA"),
        ];
        let groups = group_points(&points);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_groups_sorted_by_earliest_timestamp() {
        let points = vec![
            point(30, -1.0, -1.0, "B", "VEÍCULO 1"),
            point(10, -2.0, -2.0, "A", "VEÍCULO 1"),
        ];
        let groups = group_points(&points);
        assert_eq!(groups[0].events, vec!["A"]);
        assert_eq!(groups[1].events, vec!["B"]);
    }

    #[test]
    fn test_last_ignition_wins() {
        let mut a = point(1, -1.0, -1.0, "A", "VEÍCULO 1");
        a.ignition = "LIGADA".into();
        let mut b = point(2, -1.0, -1.0, "B", "VEÍCULO 1");
        b.ignition = "DESLIGADA".into();
        let groups = group_points(&[a, b]);
        assert_eq!(groups[0].ignition, "DESLIGADA");
    }

    #[test]
    fn test_unique_events_sorted_dedup() {
        let points = vec![
            point(1, -1.0, -1.0, "Parada", "X"),
            point(2, -2.0, -2.0, "Alerta", "X"),
            point(3, -3.0, -3.0, "Parada", "X"),
        ];
        let groups = group_points(&points);
        assert_eq!(unique_events(&groups), vec!["Alerta", "Parada"]);
    }

    #[test]
    fn test_center_of_empty_input() {
        assert_eq!(center_location(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_center_is_mean() {
        let points = vec![point(1, -10.0, -40.0, "A", "X"), point(2, -20.0, -50.0, "A", "X")];
        assert_eq!(center_location(&points), (-15.0, -45.0));
    }
}
