#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod board;
mod cell;
mod cell_set;
mod common;
mod config;
mod ship;

#[cfg(feature = "std")]
pub mod domain;
#[cfg(feature = "std")]
pub mod event;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod service;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod skeleton;
#[cfg(feature = "std")]
pub mod store;
#[cfg(feature = "std")]
pub mod stub;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use ai::*;
pub use board::*;
pub use cell::*;
pub use cell_set::CellSet;
pub use common::*;
pub use config::*;
pub use ship::*;

#[cfg(feature = "std")]
pub use domain::*;
#[cfg(feature = "std")]
pub use event::{Event, EventPayload, EventRecord, SessionId, Side};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use protocol::{GameApi, Message, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use service::{GameError, GameService};
#[cfg(feature = "std")]
pub use session::{Session, SessionError, Volley};
#[cfg(feature = "std")]
pub use skeleton::Skeleton;
#[cfg(feature = "std")]
pub use store::{EventLog, FileEventLog, InMemoryEventLog, LogError};
#[cfg(feature = "std")]
pub use stub::Stub;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
