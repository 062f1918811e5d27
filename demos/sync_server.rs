//! Playback sync relay server
//!
//! Run with: cargo run --example sync_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example sync_server                    # binds to 0.0.0.0:3010
//!   cargo run --example sync_server localhost          # binds to 127.0.0.1:3010
//!   cargo run --example sync_server 127.0.0.1:3011     # binds to 127.0.0.1:3011
//!
//! ## Talking to it
//!
//! With wscat:
//!   wscat -c ws://localhost:3010
//!   > {"event":"join","data":{"room":"movie-night"}}
//!   > {"event":"play","data":{"videoSrc":"intro.mp4","progress":0,"playing":true}}
//!
//! Open a second wscat, join the same room, and watch the events arrive.
//! A late joiner is greeted with a `src` event carrying the room's
//! last-known playback state.

use std::net::SocketAddr;

use roomcast::{RelayServer, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:3010
/// - "localhost:3011" -> 127.0.0.1:3011
/// - "127.0.0.1" -> 127.0.0.1:3010
/// - "0.0.0.0:3010" -> 0.0.0.0:3010
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 3010;

    // Replace "localhost" with "127.0.0.1"
    let normalized = arg.replace("localhost", "127.0.0.1");

    // Try parsing as SocketAddr first (includes port)
    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Try parsing as IP address without port
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: sync_server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:3010)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  sync_server                     # binds to 0.0.0.0:3010");
    eprintln!("  sync_server localhost           # binds to 127.0.0.1:3010");
    eprintln!("  sync_server localhost:3011      # binds to 127.0.0.1:3011");
    eprintln!("  sync_server 0.0.0.0:4000        # binds to 0.0.0.0:4000");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:3010".parse().unwrap(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomcast=debug".parse()?)
                .add_directive("sync_server=debug".parse()?),
        )
        .init();

    let config = ServerConfig {
        bind_addr,
        ..ServerConfig::default()
    };

    println!("Starting playback sync relay on {}", config.bind_addr);
    println!();
    println!("=== Join a room ===");
    println!("wscat -c ws://localhost:{}", config.bind_addr.port());
    println!("> {{\"event\":\"join\",\"data\":{{\"room\":\"movie-night\"}}}}");
    println!();
    println!("=== Drive playback ===");
    println!("> {{\"event\":\"play\",\"data\":{{\"videoSrc\":\"intro.mp4\",\"progress\":0,\"playing\":true}}}}");
    println!("> {{\"event\":\"seek\",\"data\":{{\"videoSrc\":\"intro.mp4\",\"progress\":42.5,\"playing\":true}}}}");
    println!();

    let server = RelayServer::new(config);

    // Run until Ctrl+C
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    let snap = server.stats().snapshot();
    println!(
        "Served {} connections, {} events routed, {} frames broadcast ({} dropped)",
        snap.connections_total, snap.events_received, snap.frames_broadcast, snap.frames_dropped
    );

    Ok(())
}
