//! Domain types and the ports through which the host platform is reached.

pub mod calculator;
pub mod cart;
pub mod fee_rule;
pub mod invoice;
pub mod ports;
pub mod settings;
