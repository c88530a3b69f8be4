use std::path::{Path, PathBuf};

/// Convert a hex string like "#RRGGBB", "RRGGBB" or "RRGGBBAA" into (r, g, b, a).
/// A missing alpha component defaults to fully opaque.
pub fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8, u8), String> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 && hex.len() != 8 {
        return Err("Hex color must be 6 (RRGGBB) or 8 (RRGGBBAA) characters long".to_string());
    }

    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| "Invalid red value")?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| "Invalid green value")?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| "Invalid blue value")?;
    let a = if hex.len() == 8 {
        u8::from_str_radix(&hex[6..8], 16).map_err(|_| "Invalid alpha value")?
    } else {
        255
    };

    Ok((r, g, b, a))
}

/// Derived output location: an `Output` folder next to the input, file named
/// `<stem>_<RRGGBBAA>.png`. `copy` values of 2 and above append a numeric
/// suffix, used when two items of the same run derive the same name.
pub fn derive_output_path(input: &Path, hex: &str, copy: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let file_name = if copy < 2 {
        format!("{stem}_{hex}.png")
    } else {
        format!("{stem}_{hex}_{copy}.png")
    };

    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("Output")
        .join(file_name)
}

pub fn resolve_full_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();

    // Expand ~ on Unix-like systems
    #[cfg(unix)]
    if let Some(path_str) = path.to_str() {
        if path_str == "~" || path_str.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                let stripped = path_str.trim_start_matches("~/");
                p = home.join(stripped);
            }
        }
    }

    // Convert to absolute if it's not already
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex_as_opaque() {
        assert_eq!(parse_hex_color("FF8000"), Ok((255, 128, 0, 255)));
    }

    #[test]
    fn parses_eight_digit_hex_with_alpha() {
        assert_eq!(parse_hex_color("FF000080"), Ok((255, 0, 0, 128)));
    }

    #[test]
    fn accepts_leading_hash() {
        assert_eq!(parse_hex_color("#12345678"), Ok((0x12, 0x34, 0x56, 0x78)));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(parse_hex_color("FFF").is_err());
        assert!(parse_hex_color("FF0000FF00").is_err());
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(parse_hex_color("GG0000").is_err());
        assert!(parse_hex_color("FF0000ZZ").is_err());
    }

    #[test]
    fn output_path_lands_in_sibling_output_folder() {
        let out = derive_output_path(Path::new("assets/cat.png"), "FF0000FF", 1);
        assert_eq!(out, Path::new("assets/Output/cat_FF0000FF.png"));
    }

    #[test]
    fn output_path_copy_suffix() {
        let out = derive_output_path(Path::new("assets/cat.tif"), "FF0000FF", 2);
        assert_eq!(out, Path::new("assets/Output/cat_FF0000FF_2.png"));
    }

    #[test]
    fn bare_file_name_gets_relative_output_folder() {
        let out = derive_output_path(Path::new("cat.png"), "FFFFFFFF", 1);
        assert_eq!(out, Path::new("Output/cat_FFFFFFFF.png"));
    }

    #[test]
    fn absolute_paths_resolve_to_themselves() {
        let p = Path::new("/tmp/sprites/cat.png");
        assert_eq!(resolve_full_path(p), p);
    }
}
