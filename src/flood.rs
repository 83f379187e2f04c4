//! One-hop outbound propagation of an admitted [`LocationRecord`] to
//! neighboring servers (spec.md §4.3 step 4, §4.4).
//!
//! Each neighbor gets a short-lived TCP connection carrying one `AT`
//! line with the sender's name appended to the trail; the neighbor's
//! own flood call will skip any server name already present in that
//! trail, which is what keeps propagation from looping forever on a
//! topology with cycles.

use crate::registry::LocationRecord;
use crate::topology::Topology;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info};

/// Render the wire form of a propagated record, with `trail` appended
/// after the five fixed fields (spec.md §4.4).
pub fn to_flood_line(record: &LocationRecord, trail: &[String]) -> String {
    let mut line = record.to_wire();
    for hop in trail {
        line.push(' ');
        line.push_str(hop);
    }
    line.push('\n');
    line
}

/// Send `record` to every neighbor of `from_server` not already named in
/// `trail`. Each dial runs independently and its failure is logged, not
/// propagated — one unreachable neighbor never blocks delivery to the
/// others, nor the reply already sent to the originating client
/// (spec.md §4.4, §5).
pub async fn flood(topology: &Topology, from_server: &str, record: &LocationRecord, trail: &[String]) {
    let line = to_flood_line(record, trail);
    for neighbor in topology.neighbors(from_server) {
        if trail.iter().any(|hop| hop == neighbor) {
            continue;
        }
        let Some(port) = topology.port(neighbor) else {
            continue;
        };
        let line = line.clone();
        let neighbor = neighbor.clone();
        tokio::spawn(async move {
            if let Err(e) = dial_and_send(port, &line).await {
                if e.kind() == std::io::ErrorKind::ConnectionRefused {
                    error!(%neighbor, "could not connect to neighboring server, it is down/not up yet");
                } else {
                    error!(%neighbor, error = %e, "flood delivery failed");
                }
                return;
            }
            info!(%neighbor, "propagated updated location");
        });
    }
}

async fn dial_and_send(port: u16, line: &str) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await?;
    stream.write_all(line.as_bytes()).await?;
    stream.shutdown().await?;
    let mut ack = Vec::new();
    let _ = stream.read_to_end(&mut ack).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LocationRecord {
        LocationRecord::new("Ashby", "+0.5", "kiwi", "+34.0-118.0", "100")
    }

    #[test]
    fn flood_line_appends_trail_in_order() {
        let line = to_flood_line(&record(), &["Ashby".to_string(), "Barrow".to_string()]);
        assert_eq!(line, "AT Ashby +0.5 kiwi +34.0-118.0 100 Ashby Barrow\n");
    }

    #[test]
    fn flood_line_with_empty_trail_has_no_extra_tokens() {
        let line = to_flood_line(&record(), &[]);
        assert_eq!(line, "AT Ashby +0.5 kiwi +34.0-118.0 100\n");
    }
}
