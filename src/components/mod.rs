//! Reusable view components.

pub mod trade_network;
