//! Client for the places-of-interest oracle used by WHATSAT (spec.md
//! §4.7). Mirrors `send_request` from `original_source/server.py`: build
//! the query params, fetch, truncate `results` to `bound`, and pretty-
//! print the JSON body.

use crate::coords;
use crate::error::{GeofloodError, Result};
use crate::topology::OracleConfig;
use serde_json::Value;

/// Query the oracle for places within `radius_km` of `coords`, returning
/// the response body with `results` truncated to at most `bound`
/// entries and pretty-printed (spec.md §4.7).
pub async fn nearby_places(
    client: &reqwest::Client,
    oracle: &OracleConfig,
    coords: &str,
    radius_km: f64,
    bound: u32,
) -> Result<String> {
    let (lat, lon) = self::coords::split(coords).unwrap_or(("0", "0"));
    let lat = self::coords::strip_positive_sign(lat);
    let lon = self::coords::strip_positive_sign(lon);
    let radius_m = radius_km * 1000.0;

    let response = client
        .get(oracle.base_url.as_str())
        .query(&[
            ("location", format!("{lat},{lon}")),
            ("radius", radius_m.to_string()),
            ("key", oracle.api_key.clone()),
        ])
        .send()
        .await?;
    let response = response.error_for_status().map_err(GeofloodError::Oracle)?;

    let mut body: Value = response.json().await?;
    if let Some(results) = body.get_mut("results").and_then(Value::as_array_mut) {
        results.truncate(bound as usize);
    }
    serde_json::to_string_pretty(&body).map_err(GeofloodError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_results_to_bound() {
        let mut body: Value = serde_json::json!({
            "results": [{"name": "a"}, {"name": "b"}, {"name": "c"}],
            "status": "OK",
        });
        if let Some(results) = body.get_mut("results").and_then(Value::as_array_mut) {
            results.truncate(2);
        }
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bound_larger_than_results_keeps_all() {
        let mut body: Value = serde_json::json!({"results": [{"name": "a"}]});
        if let Some(results) = body.get_mut("results").and_then(Value::as_array_mut) {
            results.truncate(20);
        }
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
    }
}
