//! Fixed 8-entry color palettes for SGR 30-37 and 40-47

/// Foreground colors indexed by `code - 30`
pub const FOREGROUND: [&str; 8] = [
    "#000000", // black
    "#dc2626", // red
    "#15803d", // green
    "#854d0e", // yellow (brown on a light background)
    "#1e40af", // blue
    "#86198f", // magenta
    "#0e7490", // cyan
    "#525252", // gray
];

/// Pastel background colors indexed by `code - 40`
pub const BACKGROUND: [&str; 8] = [
    "#d4d4d4", "#fecaca", "#bbf7d0", "#fef08a", "#bfdbfe", "#f5d0fe", "#cffafe", "#f5f5f5",
];

pub const BOLD: &str = "font-weight:bold;";

pub fn foreground_declaration(index: usize) -> Option<String> {
    FOREGROUND.get(index).map(|c| format!("color:{};", c))
}

pub fn background_declaration(index: usize) -> Option<String> {
    BACKGROUND.get(index).map(|c| format!("background-color:{};", c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations() {
        assert_eq!(foreground_declaration(1).as_deref(), Some("color:#dc2626;"));
        assert_eq!(
            background_declaration(7).as_deref(),
            Some("background-color:#f5f5f5;")
        );
        assert!(foreground_declaration(8).is_none());
    }
}
