use crate::ship::ShipClass;

pub const BOARD_SIZE: i32 = 10;
/// Number of squares on a board.
pub const GRID_CELLS: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

pub const NUM_SHIPS: usize = 3;
/// Fleet placed on every board, in placement order.
pub const FLEET: [ShipClass; NUM_SHIPS] = [
    ShipClass::Destroyer,
    ShipClass::Destroyer,
    ShipClass::Battleship,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 4 + 4 + 5;

#[cfg(feature = "std")]
pub use server::{ServerConfig, DEFAULT_TIMEOUT, MAX_FRAME_SIZE};

#[cfg(feature = "std")]
mod server {
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Default timeout for a single network read or write.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum frame size accepted from the network or read back from a log file.
    pub const MAX_FRAME_SIZE: u32 = 1_000_000;

    /// Runtime settings for the game server.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Address the TCP listener binds to.
        pub bind: SocketAddr,
        /// Directory holding one event log file per session. `None` keeps
        /// every log in memory for the lifetime of the process.
        pub data_dir: Option<PathBuf>,
        /// Fixed seed for reproducible games.
        pub seed: Option<u64>,
        pub timeout: Duration,
        pub max_frame_size: u32,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
                data_dir: None,
                seed: None,
                timeout: DEFAULT_TIMEOUT,
                max_frame_size: MAX_FRAME_SIZE,
            }
        }
    }
}
