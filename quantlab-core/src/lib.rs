//! QuantLab Core — backtesting engine internals.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, signals, positions, portfolio, trades)
//! - Rolling-window indicator primitives (SMA, EMA, RSI, stddev, extremes)
//! - Six strategy variants behind a uniform streaming `Strategy` trait
//! - Portfolio simulator with configurable fill policy
//! - Price-series and sentiment provider traits (CSV, in-memory, synthetic)
//! - Error taxonomy shared with the runner crate

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod sim;
pub mod strategies;
