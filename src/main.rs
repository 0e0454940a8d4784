use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use battleships::ui::{format_coord, parse_coord, render_session};
use battleships::{
    init_logging, EventLog, FileEventLog, GameApi, GameService, GameStatus, InMemoryEventLog,
    ServerConfig, SessionId, ShotOutcome, Skeleton, Stub, TcpTransport, DEFAULT_TIMEOUT,
    MAX_FRAME_SIZE,
};
use clap::{Parser, Subcommand};
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve games over TCP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
        /// Keep one event log file per session in this directory instead of in memory.
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Network read/write timeout in seconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,
    },
    /// Play against a server.
    Play {
        #[arg(long, default_value = "127.0.0.1:3000")]
        connect: SocketAddr,
        /// Resume an existing session instead of creating one.
        #[arg(long)]
        session: Option<SessionId>,
    },
    /// Play in this process without a server.
    Local {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long)]
        session: Option<SessionId>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            data_dir,
            seed,
            timeout,
        } => {
            let config = ServerConfig {
                bind,
                data_dir,
                seed,
                timeout: std::time::Duration::from_secs(timeout),
                max_frame_size: MAX_FRAME_SIZE,
            };
            match &config.data_dir {
                Some(dir) => {
                    let log = FileEventLog::open(dir).await?;
                    serve(service(log, config.seed), &config).await?;
                }
                None => serve(service(InMemoryEventLog::new(), config.seed), &config).await?,
            }
        }
        Commands::Play { connect, session } => {
            println!("Connecting to {}...", connect);
            let stub = Stub::new(TcpTransport::connect(connect).await?);
            run_cli(&stub, session).await?;
        }
        Commands::Local {
            data_dir,
            seed,
            session,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            match data_dir {
                Some(dir) => {
                    let log = FileEventLog::open(dir).await?;
                    run_cli(&service(log, seed), session).await?;
                }
                None => run_cli(&service(InMemoryEventLog::new(), seed), session).await?,
            }
        }
    }
    Ok(())
}

fn service<L: EventLog>(log: L, seed: Option<u64>) -> GameService<L> {
    match seed {
        Some(s) => GameService::with_seed(log, s),
        None => GameService::from_entropy(log),
    }
}

async fn serve<L: EventLog + 'static>(
    service: GameService<L>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let service = Arc::new(service);
    let listener = TcpListener::bind(config.bind).await?;
    info!("listening on {}", config.bind);
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("client connected from {}", addr);
        let transport = TcpTransport::with_config(stream, config.timeout, config.max_frame_size);
        let mut skeleton = Skeleton::new(Arc::clone(&service), transport);
        tokio::spawn(async move {
            match skeleton.run().await {
                Ok(()) => info!("client {} disconnected", addr),
                Err(e) => error!("connection {} ended with an error: {}", addr, e),
            }
        });
    }
}

fn report(outcome: &ShotOutcome) {
    match &outcome.destroyed {
        Some(ship) => println!("You sank a {}!", ship.class().name()),
        None if outcome.hit => println!("Hit!"),
        None => println!("Miss."),
    }
    if let Some(reply) = &outcome.computer_move {
        let verdict = match &reply.destroyed {
            Some(ship) => format!("and sank your {}", ship.class().name()),
            None if reply.hit => "and hit".to_string(),
            None => "and missed".to_string(),
        };
        println!("Computer fired at {} {}.", format_coord(reply.cell), verdict);
    }
}

async fn run_cli<A: GameApi>(api: &A, resume: Option<SessionId>) -> anyhow::Result<()> {
    let id = match resume {
        Some(id) => id,
        None => api.create_session().await?.id,
    };
    println!("Session {}", id);
    let mut view = api.get_session(id).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n{}", render_session(&view));
        if view.status.is_over() {
            break;
        }
        print!("Your shot (e.g. B7, q to quit): ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let Some(cell) = parse_coord(line) else {
            println!("Invalid coordinate");
            continue;
        };
        match api.shoot(id, cell).await {
            Ok(outcome) => report(&outcome),
            Err(e) => println!("Error: {}", e),
        }
        view = api.get_session(id).await?;
    }

    match view.status {
        GameStatus::Won => println!("You have sunk all enemy ships!"),
        GameStatus::Lost => println!("The computer has sunk your fleet."),
        GameStatus::InProgress => println!("Resume later with --session {}", id),
    }
    Ok(())
}
