//! Connects to a game server, logs in, asks for the lobby and the chat
//! channels, and prints everything the server pushes until Ctrl-C.
//!
//! ```text
//! lobby-cli <host:port | ws://url> [name] [password] [--config client.json]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); `RUST_LOG=trace`
//! shows every line on the wire.

use spellwire::prelude::*;
use tracing_subscriber::EnvFilter;

struct Args {
    addr: String,
    name: Option<String>,
    password: Option<String>,
    config_path: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = Some(args.next().ok_or("--config needs a path")?);
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();
    let addr = positional
        .next()
        .ok_or("usage: lobby-cli <host:port | ws://url> [name] [password] [--config file]")?;
    Ok(Args {
        addr,
        name: positional.next(),
        password: positional.next(),
        config_path,
    })
}

fn load_config(args: &Args) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ClientConfig::default(),
    };
    if let Some(name) = &args.name {
        config.player_name = name.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    if config.player_name.is_empty() {
        config.player_name = "guest".to_string();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let config = load_config(&args)?;
    tracing::info!(addr = %args.addr, player = %config.player_name, "connecting");

    let builder = Client::builder().config(config);
    let Client {
        handle,
        mut events,
        mut task,
    } = if args.addr.starts_with("ws://") || args.addr.starts_with("wss://") {
        builder.connect_websocket(&args.addr).await?
    } else {
        builder.connect_tcp(&args.addr).await?
    };

    // Ask for the lobby once we're logged in.
    let lobby = handle.clone();
    tokio::spawn(async move {
        if lobby.wait_for_status(ConnectionStatus::Idle).await.is_ok() {
            let games = lobby.list_games();
            let channels = lobby.chat_list_channels();
            for pending in [games, channels] {
                match pending.wait().await {
                    Ok(done) => {
                        tracing::info!(msg_id = %done.id, outcome = %done.outcome, "request done");
                    }
                    Err(e) => tracing::warn!(error = %e, "request failed"),
                }
            }
        }
    });

    loop {
        tokio::select! {
            Some(event) = events.session.recv() => match event {
                SessionEvent::GameListed(game) => println!(
                    "game #{:<4} {:<30} {}/{} players, by {}{}",
                    game.game_id,
                    game.description,
                    game.player_count,
                    game.max_players,
                    game.creator,
                    if game.has_password { " [password]" } else { "" },
                ),
                SessionEvent::Welcome { message } => println!("server: {message}"),
                other => println!("session: {other:?}"),
            },
            Some(event) = events.chat.recv() => {
                println!("chat {:?}: {}", event.kind, event.data.join(" | "));
            }
            Some(event) = events.game.recv() => {
                println!(
                    "game {:?} from {} ({}): {}",
                    event.kind,
                    event.player_name,
                    event.player_id,
                    event.data.join(" | ")
                );
            }
            _ = tokio::signal::ctrl_c() => {
                handle.disconnect();
            }
            result = &mut task => {
                match result? {
                    Ok(()) => println!("disconnected"),
                    Err(e) => println!("session ended: {e}"),
                }
                break;
            }
        }
    }
    Ok(())
}
