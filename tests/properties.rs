//! Property-based tests for spec.md §8's invariants 1, 3, 4, 5.
//! (Invariant 2, flood termination, is covered at the unit level in
//! `src/flood.rs` and exercised end-to-end by `tests/integration.rs`'s
//! S6 scenario against a deliberately unreachable neighbor.)

use geoflood::registry::{ClientRegistry, LocationRecord};
use geoflood::message::{self, Command};
use geoflood::coords;
use proptest::prelude::*;

fn record_with_timestamp(ts: f64) -> LocationRecord {
    LocationRecord::new("Ashby", "+0.0", "kiwi", "+1.0+1.0", format!("{ts}"))
}

proptest! {
    /// Invariant 1 (monotonicity): after applying a sequence of
    /// timestamped admissions for one client, the stored timestamp is
    /// the maximum of the sequence.
    #[test]
    fn monotonicity_holds_over_arbitrary_sequences(
        timestamps in prop::collection::vec(1.0f64..1_000_000.0, 1..30)
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let registry = ClientRegistry::new();
            for &ts in &timestamps {
                registry.update(record_with_timestamp(ts)).await;
            }
            let max = timestamps.iter().cloned().fold(f64::MIN, f64::max);
            let stored = registry.get("kiwi").await.unwrap();
            prop_assert_eq!(stored.timestamp_value().unwrap(), max);
            Ok(())
        })?;
    }

    /// Invariant 3 (idempotence): re-submitting the same timestamp twice
    /// leaves the registry exactly as the first submission did.
    #[test]
    fn idempotent_resubmission_causes_no_change(ts in 1.0f64..1_000_000.0) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let registry = ClientRegistry::new();
            let first = registry.update(record_with_timestamp(ts)).await;
            let second = registry.update(record_with_timestamp(ts)).await;
            prop_assert!(first.accepted());
            prop_assert!(!second.accepted());
            prop_assert_eq!(
                registry.get("kiwi").await.unwrap().client_timestamp,
                format!("{ts}")
            );
            Ok(())
        })?;
    }

    /// Invariant 4 (reply shape): every line that isn't a recognized
    /// verb is rejected with exactly `? <line>\n`, never a panic or a
    /// partial match.
    #[test]
    fn unrecognized_verb_is_always_rejected_verbatim(
        verb in "[A-Za-z]{1,10}",
        rest in "[a-zA-Z0-9 .+-]{0,40}"
    ) {
        prop_assume!(!["IAMAT", "WHATSAT", "AT"].contains(&verb.as_str()));
        let line = format!("{verb} {rest}");
        let err = message::parse(&line).unwrap_err();
        prop_assert_eq!(err.reply(), format!("? {line}\n"));
    }

    /// Invariant 5 (coordinate round-trip): a validly formatted signed
    /// lat/lon pair splits back into the two components that produced
    /// it.
    #[test]
    fn coordinate_split_round_trips(
        lat in -90.0f64..90.0,
        lon in -180.0f64..180.0,
    ) {
        let pair = format!("{lat:+}{lon:+}");
        let (lat_str, lon_str) = coords::split(&pair).unwrap();
        prop_assert_eq!(lat_str.parse::<f64>().unwrap(), lat);
        prop_assert_eq!(lon_str.parse::<f64>().unwrap(), lon);
        prop_assert!(coords::is_valid(&pair));
    }
}

#[test]
fn valid_iamat_always_parses_to_a_single_command() {
    let cmd = message::parse("IAMAT kiwi +34.0-118.0 100").unwrap();
    assert!(matches!(cmd, Command::Iamat { .. }));
}
