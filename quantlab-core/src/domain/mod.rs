//! Domain types — bars, signals, positions, portfolio, trades.

mod bar;
mod portfolio;
mod position;
mod signal;
mod trade;

pub use bar::Bar;
pub use portfolio::{EquityPoint, Portfolio};
pub use position::Position;
pub use signal::{Action, Signal};
pub use trade::Trade;
