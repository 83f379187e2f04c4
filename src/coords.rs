//! Parsing for the `±lat±lon` coordinate pair used by IAMAT/AT/WHATSAT.
//!
//! The wire format concatenates two signed decimals with no separator:
//! `+34.068930-118.445127`. The latitude sign is always the first byte;
//! the longitude begins at the next `+` or `-` encountered after it.

/// Split `±lat±lon` into its two signed-decimal substrings, preserving
/// the original sign characters verbatim. Returns `None` if there is no
/// second sign to split on (not a well-formed coordinate pair).
pub fn split(coords: &str) -> Option<(&str, &str)> {
    if coords.is_empty() {
        return None;
    }
    let split_at = coords
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)?;
    Some((&coords[..split_at], &coords[split_at..]))
}

/// Parse and range-validate a coordinate pair. Latitude must lie in
/// `[-90, 90]`, longitude in `[-180, 180]` (spec.md §4.2).
pub fn parse(coords: &str) -> Option<(f64, f64)> {
    let (lat_str, lon_str) = split(coords)?;
    let lat: f64 = lat_str.parse().ok()?;
    let lon: f64 = lon_str.parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some((lat, lon))
}

pub fn is_valid(coords: &str) -> bool {
    parse(coords).is_some()
}

/// Render a signed-decimal component the way the oracle expects it: the
/// leading `+` of a non-negative value is dropped, `-` is kept.
pub fn strip_positive_sign(component: &str) -> &str {
    component.strip_prefix('+').unwrap_or(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_standard_pair() {
        let (lat, lon) = split("+34.068930-118.445127").unwrap();
        assert_eq!(lat, "+34.068930");
        assert_eq!(lon, "-118.445127");
    }

    #[test]
    fn splits_both_positive() {
        let (lat, lon) = split("+34.0+118.0").unwrap();
        assert_eq!(lat, "+34.0");
        assert_eq!(lon, "+118.0");
    }

    #[test]
    fn rejects_single_sign() {
        assert!(split("+34.068930").is_none());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(!is_valid("+91.0+0.0"));
        assert!(!is_valid("+0.0-181.0"));
    }

    #[test]
    fn accepts_boundary_values() {
        assert!(is_valid("+90.0+180.0"));
        assert!(is_valid("-90.0-180.0"));
    }

    #[test]
    fn strips_leading_plus_only() {
        assert_eq!(strip_positive_sign("+34.068930"), "34.068930");
        assert_eq!(strip_positive_sign("-118.445127"), "-118.445127");
    }
}
