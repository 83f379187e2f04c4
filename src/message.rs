//! Message parser and validator (spec.md §4.2): decodes one framed line
//! into a [`Command`], or reports it as [`Rejected`] so the caller can
//! reply with `? <original line>\n` and keep the connection open.

use crate::coords;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Iamat {
        client_id: String,
        coords: String,
        timestamp: String,
    },
    Whatsat {
        client_id: String,
        radius_km: f64,
        bound: u32,
    },
    At {
        origin_server: String,
        time_skew: String,
        client_id: String,
        coords: String,
        client_timestamp: String,
        trail: Vec<String>,
    },
}

/// A line that failed validation. Carries the original text verbatim so
/// the caller can echo it in the `?` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub original_line: String,
}

impl Rejected {
    fn new(line: &str) -> Self {
        Rejected {
            original_line: line.to_string(),
        }
    }

    /// The `? <original line>\n` reply text (spec.md §4.2).
    pub fn reply(&self) -> String {
        format!("? {}\n", self.original_line)
    }
}

/// Parse one line. `WHATSAT`'s "client_id must exist in the registry"
/// rule is deliberately not checked here — the parser has no registry
/// access — it is enforced by the WHATSAT handler (spec.md §4.7, S5).
pub fn parse(line: &str) -> Result<Command, Rejected> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, args)) = tokens.split_first() else {
        return Err(Rejected::new(line));
    };

    match cmd {
        "IAMAT" => parse_iamat(line, args),
        "WHATSAT" => parse_whatsat(line, args),
        "AT" => parse_at(line, args),
        _ => Err(Rejected::new(line)),
    }
}

fn parse_iamat(line: &str, args: &[&str]) -> Result<Command, Rejected> {
    let [client_id, coords_str, timestamp] = args else {
        return Err(Rejected::new(line));
    };

    if !coords::is_valid(coords_str) {
        return Err(Rejected::new(line));
    }
    let ts: f64 = timestamp.parse().map_err(|_| Rejected::new(line))?;
    if !ts.is_finite() {
        return Err(Rejected::new(line));
    }

    Ok(Command::Iamat {
        client_id: client_id.to_string(),
        coords: coords_str.to_string(),
        timestamp: timestamp.to_string(),
    })
}

fn parse_whatsat(line: &str, args: &[&str]) -> Result<Command, Rejected> {
    let [client_id, radius_str, bound_str] = args else {
        return Err(Rejected::new(line));
    };

    let radius_km: f64 = radius_str.parse().map_err(|_| Rejected::new(line))?;
    if !(0.0..=50.0).contains(&radius_km) {
        return Err(Rejected::new(line));
    }
    let bound: u32 = bound_str.parse().map_err(|_| Rejected::new(line))?;
    if bound > 20 {
        return Err(Rejected::new(line));
    }

    Ok(Command::Whatsat {
        client_id: client_id.to_string(),
        radius_km,
        bound,
    })
}

fn parse_at(line: &str, args: &[&str]) -> Result<Command, Rejected> {
    if args.len() < 5 {
        return Err(Rejected::new(line));
    }
    Ok(Command::At {
        origin_server: args[0].to_string(),
        time_skew: args[1].to_string(),
        client_id: args[2].to_string(),
        coords: args[3].to_string(),
        client_timestamp: args[4].to_string(),
        trail: args[5..].iter().map(|s| s.to_string()).collect(),
    })
}
