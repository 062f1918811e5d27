//! Demo room peer
//!
//! Connects to a running relay, joins a room, prints everything the room
//! broadcasts, and drives a short scripted playback session.
//!
//! Run with: cargo run --example watch_peer [URL] [ROOM]
//!
//! Examples:
//!   cargo run --example watch_peer                                   # ws://127.0.0.1:3010, room "demo"
//!   cargo run --example watch_peer ws://127.0.0.1:3010 movie-night
//!
//! Start `sync_server` first, then run two copies of this peer against the
//! same room and watch the playback events cross over.

use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use roomcast::{Envelope, EventKind, RoomState};

type WsSink = SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

async fn send(sink: &mut WsSink, envelope: &Envelope) -> Result<(), Box<dyn std::error::Error>> {
    sink.send(Message::text(envelope.to_frame())).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let url = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "ws://127.0.0.1:3010".to_string());
    let room = args.get(2).cloned().unwrap_or_else(|| "demo".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("watch_peer=debug".parse()?),
        )
        .init();

    println!("Connecting to {} (room: {})", url, room);
    let (ws, _) = connect_async(url.as_str()).await?;
    let (mut sink, mut stream) = ws.split();

    // Reader task: print every event the room broadcasts
    let reader = tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    eprintln!("Read failed: {}", e);
                    break;
                }
            };
            let Message::Text(text) = message else {
                continue;
            };
            let Ok(envelope) = Envelope::parse(text.as_str()) else {
                continue;
            };

            match &envelope.data {
                Some(data) => match RoomState::from_value(data) {
                    Some(state) => println!("<- {}: {}", envelope.event, state),
                    None => println!("<- {}: {}", envelope.event, data),
                },
                None => println!("<- {}", envelope.event),
            }
        }
    });

    let join = Envelope::new(EventKind::Join.name(), serde_json::json!({ "room": room }));
    send(&mut sink, &join).await?;
    println!("-> join: {}", room);

    tokio::time::sleep(Duration::from_secs(1)).await;

    // Scripted playback: start, jump ahead, pause
    let steps = [
        (EventKind::Play, 0.0, true),
        (EventKind::Seek, 42.5, true),
        (EventKind::Pause, 42.5, false),
    ];
    for (kind, progress, playing) in steps {
        let state = RoomState {
            video_src: "intro.mp4".to_string(),
            progress,
            playing,
        };
        let envelope = Envelope::new(kind.name(), state.to_value());
        send(&mut sink, &envelope).await?;
        println!("-> {}: {}", kind, state);
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    println!("Script done, watching the room (Ctrl+C to quit)");
    tokio::signal::ctrl_c().await?;

    let bye = Envelope::bare(EventKind::Disconnect.name());
    let _ = send(&mut sink, &bye).await;
    let _ = sink.close().await;
    reader.abort();

    Ok(())
}
