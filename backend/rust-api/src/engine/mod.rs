//! Adaptive hint engine core: the hint-level state machine, the stuck
//! detector and the append-only session ledger. Everything here is pure
//! given its inputs; I/O stays in the service layer.

pub mod ledger;
pub mod level;
pub mod stuck;
