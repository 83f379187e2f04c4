//! Per-server listener and connection dispatch (spec.md §4, §5).
//!
//! One [`Server`] owns a name, the shared [`Topology`], and a private
//! [`ClientRegistry`]. It accepts connections, reads lines off each one
//! with [`framing::LineReader`], dispatches through [`message::parse`],
//! and replies in place. Nothing here blocks on a neighbor: flooding is
//! fire-and-forget (see [`crate::flood`]).

use crate::error::{GeofloodError, Result};
use crate::flood;
use crate::framing::LineReader;
use crate::message::{self, Command};
use crate::oracle;
use crate::registry::{ClientRegistry, LocationRecord};
use crate::time;
use crate::topology::Topology;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

pub struct Server {
    name: String,
    topology: Arc<Topology>,
    registry: ClientRegistry,
    http: reqwest::Client,
}

impl Server {
    pub fn new(name: String, topology: Arc<Topology>) -> Self {
        Self {
            name,
            topology,
            registry: ClientRegistry::new(),
            http: reqwest::Client::new(),
        }
    }

    /// Bind this server's configured port and serve connections until
    /// cancelled. There is no graceful drain (spec.md §5): dropping the
    /// future tears down in-flight connections immediately.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let port = self
            .topology
            .port(&self.name)
            .ok_or_else(|| GeofloodError::UnknownServer(self.name.clone()))?;
        let addr = std::net::SocketAddr::from((std::net::Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GeofloodError::Listen { addr, source })?;
        info!(server = %self.name, port, "listening");

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .map_err(|source| GeofloodError::Listen { addr, source })?;
            info!(%peer, "new incoming connection");
            let this = Arc::clone(&self);
            tokio::spawn(async move {
                this.handle_connection(stream).await;
            });
        }
    }

    async fn handle_connection(self: Arc<Self>, stream: TcpStream) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = LineReader::new(read_half);
        loop {
            let line = match reader.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "connection read error");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let reply = self.handle_line(&line).await;
            if write_half.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
        }
    }

    /// Process one framed line and produce the full reply text.
    async fn handle_line(&self, line: &str) -> String {
        match message::parse(line) {
            Err(rejected) => rejected.reply(),
            Ok(Command::Iamat {
                client_id,
                coords,
                timestamp,
            }) => self.handle_iamat(line, client_id, coords, timestamp).await,
            Ok(Command::Whatsat {
                client_id,
                radius_km,
                bound,
            }) => self.handle_whatsat(line, client_id, radius_km, bound).await,
            Ok(Command::At {
                origin_server,
                time_skew,
                client_id,
                coords,
                client_timestamp,
                trail,
            }) => {
                self.handle_at(origin_server, time_skew, client_id, coords, client_timestamp, trail)
                    .await
            }
        }
    }

    async fn handle_iamat(&self, original_line: &str, client_id: String, coords: String, timestamp: String) -> String {
        let ts_value: f64 = timestamp.parse().unwrap_or(0.0);
        let skew = time::format_signed(time::now_epoch_seconds() - ts_value);
        let candidate = LocationRecord::new(&self.name, skew, client_id, coords, timestamp);

        let outcome = self.registry.update(candidate).await;
        // Only an unparsable client_timestamp reaches Invalid, and
        // message::parse already rejected that before we got here; kept
        // as a defensive fallback rather than an unreachable!().
        let Some(live) = outcome.live() else {
            return format!("? {original_line}\n");
        };
        let reply = format!("{}\n", live.to_wire());

        if outcome.accepted() {
            let topology = Arc::clone(&self.topology);
            let name = self.name.clone();
            let record = live.clone();
            tokio::spawn(async move {
                flood::flood(&topology, &name, &record, &[name.clone()]).await;
            });
        }
        reply
    }

    async fn handle_whatsat(&self, original_line: &str, client_id: String, radius_km: f64, bound: u32) -> String {
        let Some(live) = self.registry.get(&client_id).await else {
            return format!("? {original_line}\n");
        };

        match oracle::nearby_places(&self.http, &self.topology.oracle, &live.coords, radius_km, bound).await {
            Ok(places) => format!("{}\n{}\n\n", live.to_wire(), places),
            Err(e) => {
                // spec.md §7: oracle failure gets no reply at all, not a
                // `?` rejection — the connection just stays open.
                warn!(error = %e, line = %original_line, "oracle request failed, sending no reply");
                String::new()
            }
        }
    }

    async fn handle_at(
        &self,
        origin_server: String,
        time_skew: String,
        client_id: String,
        coords: String,
        client_timestamp: String,
        trail: Vec<String>,
    ) -> String {
        let candidate = LocationRecord::new(origin_server, time_skew, client_id.clone(), coords, client_timestamp);
        self.registry.update(candidate.clone()).await;

        let mut forwarded_trail = trail;
        forwarded_trail.push(self.name.clone());
        let topology = Arc::clone(&self.topology);
        let name = self.name.clone();
        tokio::spawn(async move {
            flood::flood(&topology, &name, &candidate, &forwarded_trail).await;
        });

        format!("{} received updated location for {}\n", self.name, client_id)
    }
}
