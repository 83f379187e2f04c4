//! Entry point: parse CLI args, load the topology, validate the server
//! name against it, wire up logging, and run the listener until
//! cancelled (spec.md §5, §6).

use clap::Parser;
use geoflood::cli::Args;
use geoflood::{Server, Topology};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

fn init_logging(server_name: &str, log_path: &std::path::Path, verbosity: u8) {
    let default_directive = match verbosity {
        0 => "geoflood=info",
        1 => "geoflood=debug",
        _ => "geoflood=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file_layer = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || file.try_clone().expect("clone log file handle")),
        ),
        Err(e) => {
            eprintln!("warning: could not open log file {}: {e}", log_path.display());
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!(server = %server_name, "logging initialized");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let topology = match &args.topology {
        Some(path) => Topology::load(path),
        None => Ok(Topology::embedded_default()),
    };
    let topology = match topology {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if !topology.contains(&args.server_name) {
        let names: Vec<&str> = topology.names().collect();
        eprintln!(
            "error: invalid server name {:?}.\nValid names: {}",
            args.server_name,
            names.join(", ")
        );
        std::process::exit(1);
    }

    let log_path = args
        .log_dir
        .as_ref()
        .map(|dir| dir.join(format!("{}.log", args.server_name.to_lowercase())))
        .or_else(|| topology.log_path(&args.server_name).map(Path::to_path_buf))
        .unwrap_or_else(|| std::path::PathBuf::from(format!("./{}.log", args.server_name)));

    init_logging(&args.server_name, &log_path, args.verbose);

    let topology = Arc::new(topology);
    let server = Arc::new(Server::new(args.server_name.clone(), Arc::clone(&topology)));

    info!(server = %args.server_name, "starting up");
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!(error = %e, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received interrupt, shutting down without draining connections");
        }
    }
}
