//! Domain types and the ports the checkout flow talks through.

pub mod enrollment;
pub mod money;
pub mod payment;
pub mod ports;
pub mod session;
pub mod user;
