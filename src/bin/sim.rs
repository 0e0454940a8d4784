use battleships::{Cell, GameService, GameStatus, InMemoryEventLog, BOARD_SIZE};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde_json::json;

/// Play whole sessions with a random shooter standing in for the player and
/// print a JSON summary.
#[derive(Parser)]
struct Args {
    /// Seed for the service (fleets and computer shots).
    service_seed: u64,
    /// Seed for the simulated player's shots.
    player_seed: u64,
    #[arg(long, default_value_t = 1)]
    games: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let service = GameService::with_seed(InMemoryEventLog::new(), args.service_seed);
    let mut rng = SmallRng::seed_from_u64(args.player_seed);

    let mut player_wins = 0u32;
    let mut computer_wins = 0u32;
    let mut rounds = Vec::new();

    for _ in 0..args.games {
        let id = service.create_session().await?.id;
        let mut untried: Vec<Cell> = (0..BOARD_SIZE)
            .flat_map(|y| (0..BOARD_SIZE).map(move |x| Cell::new(x, y)))
            .collect();
        let mut count = 0u32;
        let status = loop {
            let cell = *untried
                .choose(&mut rng)
                .ok_or_else(|| anyhow::anyhow!("player ran out of cells"))?;
            untried.retain(|c| *c != cell);
            let outcome = service.shoot(id, cell).await?;
            count += 1;
            if outcome.status.is_over() {
                break outcome.status;
            }
        };
        match status {
            GameStatus::Won => player_wins += 1,
            GameStatus::Lost => computer_wins += 1,
            GameStatus::InProgress => {}
        }
        rounds.push(count);
    }

    let mean_rounds = if rounds.is_empty() {
        0.0
    } else {
        rounds.iter().map(|&r| r as f64).sum::<f64>() / rounds.len() as f64
    };
    let winner = match (player_wins, computer_wins) {
        (p, c) if p > c => Some("player"),
        (p, c) if c > p => Some("computer"),
        _ => None,
    };

    let result = json!({
        "games": args.games,
        "player_wins": player_wins,
        "computer_wins": computer_wins,
        "rounds": rounds,
        "mean_rounds": mean_rounds,
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
