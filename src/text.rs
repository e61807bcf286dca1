//! String helpers shared by the map renderer and email bodies.

/// Escape the five HTML-special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Collapse runs of whitespace and lowercase. Used as a stable key for
/// matching checkpoint names coming from different sources.
pub fn normalize_string(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// True when an observation cell carries real content (spreadsheet exports
/// leave "nan"/"nat" literals behind for empty cells).
pub fn is_nonempty_obs(s: &str) -> bool {
    let t = s.trim();
    !t.is_empty() && !matches!(t.to_lowercase().as_str(), "nan" | "nat")
}

/// True when a person-name cell holds a usable name.
pub fn is_valid_name(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    !matches!(t.to_lowercase().as_str(), "nan" | "n/i" | "none" | "null" | "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("  Posto   BR  "), "posto br");
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("Maria Souza"));
        assert!(!is_valid_name("nan"));
        assert!(!is_valid_name("N/I"));
        assert!(!is_valid_name("  "));
        assert!(!is_valid_name("0"));
    }

    #[test]
    fn test_is_nonempty_obs() {
        assert!(is_nonempty_obs("parada longa"));
        assert!(!is_nonempty_obs("NaT"));
        assert!(!is_nonempty_obs(""));
    }
}
