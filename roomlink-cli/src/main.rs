use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use roomlink::RoomId;
use roomlink::client::media::SyntheticDevices;
use roomlink::client::{ClientConfig, DEFAULT_SIGNALING_URL, MeshClient, MeshEvent};
use roomlink::model::IceServerConfig;
use roomlink::server::{DEFAULT_PORT, ServerConfig, serve};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomlink")]
#[command(about = "Room-based mesh signaling for direct peer media sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// STUN/TURN url advertised to clients. Repeatable; defaults to public STUN.
        #[arg(long = "ice-server")]
        ice_servers: Vec<String>,
    },

    /// Join a room as a headless participant and print what happens.
    Join {
        #[arg(long, default_value = DEFAULT_SIGNALING_URL)]
        url: String,

        /// Room to join; a fresh one is generated when omitted.
        #[arg(short, long)]
        room: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// Seconds a link may spend negotiating. 0 waits forever.
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Send silent synthetic audio and video instead of only receiving.
        #[arg(long)]
        synthetic_media: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Commands::Serve {
            host,
            port,
            ice_servers,
        } => {
            let mut config = ServerConfig {
                host,
                port,
                ..Default::default()
            };
            if !ice_servers.is_empty() {
                config.ice_servers = vec![IceServerConfig::stun(ice_servers)];
            }

            println!(
                "{} {}",
                "📡 Signaling server on".green().bold(),
                config.bind_addr().to_string().bold()
            );
            serve(config).await
        }

        Commands::Join {
            url,
            room,
            name,
            timeout,
            synthetic_media,
        } => {
            let room_id = match room {
                Some(room) => RoomId::new(room).context("Room id must not be blank")?,
                None => RoomId::generate(),
            };
            let name = match name {
                Some(name) => name,
                None => Input::new()
                    .with_prompt("Display name")
                    .interact_text()
                    .context("No display name given")?,
            };
            let config = ClientConfig {
                signaling_url: url,
                negotiation_timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
                ..Default::default()
            };
            join(config, room_id, name, synthetic_media).await
        }
    }
}

async fn join(config: ClientConfig, room_id: RoomId, name: String, synthetic_media: bool) -> Result<()> {
    let devices = Arc::new(SyntheticDevices {
        audio: synthetic_media,
        video: synthetic_media,
    });
    info!("Connecting to {}", config.signaling_url);
    let (client, mut events) = MeshClient::connect(config, devices).await?;
    client.join(room_id.clone(), name).await?;

    println!("{} {}", "🚪 Joining".cyan(), room_id.to_string().bold());
    println!(
        "{}",
        "Type to chat. /mic on|off, /cam on|off, /leave to quit.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => print_event(&event),
                None => {
                    println!("{}", "Signaling connection lost".red().bold());
                    break;
                }
            },

            line = lines.next_line() => match line? {
                Some(line) if line.trim() == "/leave" => break,
                Some(line) if line.trim().is_empty() => {}
                Some(line) if line.starts_with("/mic ") || line.starts_with("/cam ") => {
                    let (command, state) = line.trim().split_at(4);
                    let enabled = state.trim() == "on";
                    if command == "/mic" {
                        client.set_microphone_enabled(enabled).await?;
                    } else {
                        client.set_camera_enabled(enabled).await?;
                    }
                }
                Some(line) => client.send_chat(line).await?,
                None => break,
            },
        }
    }

    debug!("Leaving {}", room_id);
    client.leave().await?;
    println!("{}", "👋 Left the room".green());
    Ok(())
}

fn print_event(event: &MeshEvent) {
    match event {
        MeshEvent::Joined { room_id, self_id } => {
            let me = self_id.map(|id| id.to_string()).unwrap_or_else(|| "?".into());
            println!("{} {} as {}", "✅ Joined".green().bold(), room_id, me.dimmed());
        }
        MeshEvent::PeerJoined { id, name } => {
            println!("{} {} {}", "➕".green(), name.bold(), id.to_string().dimmed());
        }
        MeshEvent::PeerLeft { id } => println!("{} {}", "➖ Left:".yellow(), id),
        MeshEvent::PeerConnected { id } => println!("{} {}", "🔗 Connected:".cyan(), id),
        MeshEvent::PeerFailed { id, reason } => {
            println!("{} {} ({})", "❌ Failed:".red().bold(), id, reason)
        }
        MeshEvent::RemoteTrackAvailable { id, track } => {
            println!("{} {:?} from {}", "🎞  Track:".cyan(), track.kind, id)
        }
        MeshEvent::LocalTrackSubstituted(kind) => println!("{} {:?}", "🔁 Now sending".cyan(), kind),
        MeshEvent::LocalTrackEnabled { source, enabled } => {
            let state = if *enabled { "on".green() } else { "off".red() };
            println!("{} {:?} {}", "🎚  Local".cyan(), source, state)
        }
        MeshEvent::MediaDegraded(mode) => println!("{} {:?}", "⚠️  Media:".yellow(), mode),
        MeshEvent::ChatMessage {
            user_name,
            message,
            time,
        } => println!("[{}] {}: {}", time.dimmed(), user_name.bold(), message),
    }
}
