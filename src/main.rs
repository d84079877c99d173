use std::io::{Error, ErrorKind};
use std::sync::{Arc, Mutex};
use clap::{Parser, Subcommand};
use log::{info, error};
use tokio::net::{TcpListener, TcpStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::protocol::Message;
use economy_engine::board::{GameState, Player, SCARCE_SUPPLY, STARTING_COINS};
use economy_engine::driver::{
    self_play, SearchConfig, DEFAULT_HORIZON_DEPTH, DEFAULT_TURN_CAP,
};
use economy_engine::session::{respond_blocking, GameSession};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Let the engine play both sides and log every turn
    Play {
        #[arg(long, default_value_t = DEFAULT_HORIZON_DEPTH)]
        depth: u32,
        #[arg(long, default_value_t = DEFAULT_TURN_CAP)]
        turn_cap: u32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        point_lead: i32,
        #[arg(long, default_value_t = STARTING_COINS)]
        coins_p1: u32,
        #[arg(long, default_value_t = STARTING_COINS)]
        coins_p2: u32,
        #[arg(long, default_value_t = SCARCE_SUPPLY)]
        scarce_left: u32,
        /// Player 2 makes the first move
        #[arg(long)]
        player2_first: bool,
    },
    /// Play against websocket clients
    Serve {
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long, default_value_t = 999)]
        port: u16,
        #[arg(long, default_value_t = DEFAULT_HORIZON_DEPTH)]
        depth: u32,
        #[arg(long, default_value_t = DEFAULT_TURN_CAP)]
        turn_cap: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    let level: log::Level = args.log_level.parse()
        .map_err(|e| Error::new(ErrorKind::InvalidInput, format!("{}: {}", e, args.log_level)))?;
    simple_logger::init_with_level(level)
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    match args.command {
        Command::Play {
            depth,
            turn_cap,
            point_lead,
            coins_p1,
            coins_p2,
            scarce_left,
            player2_first,
        } => {
            let config = SearchConfig { horizon_depth: depth, turn_cap };
            let start = GameState::with(point_lead, coins_p1, coins_p2, scarce_left);
            let first = if player2_first { Player::Two } else { Player::One };
            let record = self_play(start, first, &config);
            info!(
                "Result: {} after {} turns, final position {:?}",
                record.end.as_str(),
                record.turns.len(),
                record.final_state
            );
            Ok(())
        }
        Command::Serve { host, port, depth, turn_cap } => {
            let config = SearchConfig { horizon_depth: depth, turn_cap };
            serve(format!("{}:{}", host, port), config).await
        }
    }
}

async fn serve(address: String, config: SearchConfig) -> Result<(), Error> {
    let listener = TcpListener::bind(address.clone()).await?;
    info!("Listening on: {} with {:?}", address, config);

    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(async move {
            if let Err(e) = accept_connection(stream, config).await {
                error!("Connection failed: {:?}", e);
            }
        });
    }

    Ok(())
}

async fn accept_connection(stream: TcpStream, config: SearchConfig) -> Result<(), Error> {
    let addr = stream.peer_addr()?;
    info!("Peer address: {}", addr);

    let ws_stream = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| Error::new(ErrorKind::ConnectionAborted, e))?;
    info!("New WebSocket connection: {}", addr);

    let (mut write, mut read) = ws_stream.split();

    let session = Arc::new(Mutex::new(GameSession::new(config)));

    while let Some(raw_message) = read.next().await {
        match raw_message {
            Ok(text_message) => {
                if !text_message.is_text() && !text_message.is_binary() { continue; }
                match serde_json::from_slice::<Value>(&text_message.into_data()) {
                    Ok(data) => {
                        info!("Received: {}", data);
                        let response = respond_blocking(Arc::clone(&session), data).await;
                        let response_str = response.to_string();
                        if let Err(e) = write.send(Message::text(response_str.clone())).await {
                            error!("Failed to send message {}: {:?}", response_str, e);
                            break;
                        }
                        info!("Sent: {}", response_str);
                    },
                    Err(e) => { error!("Error parsing JSON: {:?}", e); }
                }
            }
            Err(e) => { error!("Error reading websocket message: {:?}", e); }
        }
    }

    info!("Connection closed: {}", addr);
    Ok(())
}
