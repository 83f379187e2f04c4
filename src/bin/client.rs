//! Demo line client: connects to one server and pipes stdin lines to it,
//! printing whatever comes back. Not part of the wire protocol contract
//! — a debugging aid in the idiom of a `cat commands.txt | client
//! <server-name>` smoke test.

use clap::Parser;
use geoflood::Topology;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(name = "geoflood-client", about = "Send commands to a geoflood server")]
struct Args {
    /// Name of the server to connect to.
    server_name: String,

    /// Path to a JSON topology document, matching the one the server
    /// was started with.
    #[arg(long)]
    topology: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let topology = match &args.topology {
        Some(path) => Topology::load(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
        None => Topology::embedded_default(),
    };

    let Some(port) = topology.port(&args.server_name) else {
        let names: Vec<&str> = topology.names().collect();
        eprintln!(
            "error: invalid server name {:?}.\nValid names: {}",
            args.server_name,
            names.join(", ")
        );
        std::process::exit(1);
    };

    let stream = TcpStream::connect(("127.0.0.1", port)).await?;
    let (read_half, mut write_half) = stream.into_split();

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    while let Some(line) = lines.next_line().await? {
        write_half.write_all(line.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }
    write_half.shutdown().await?;

    let mut reply = String::new();
    BufReader::new(read_half).read_to_string(&mut reply).await?;
    print!("{reply}");
    Ok(())
}
