//! Rolling indicator primitives consumed by the strategies.
//!
//! Everything here is streaming: values are pushed one bar at a time and
//! statistics are only defined once the window is full. Window statistics
//! are recomputed over the buffered window on demand, so there is no
//! accumulated floating-point drift versus a from-scratch recomputation
//! (property-tested in `rolling.rs`).

mod ema;
mod rolling;
mod rsi;

pub use ema::StreamingEma;
pub use rolling::RollingWindow;
pub use rsi::StreamingRsi;
