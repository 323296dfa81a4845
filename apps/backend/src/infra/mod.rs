//! Infrastructure layer: in-process storage and state assembly.

pub mod docstore;
pub mod state;
pub mod txn;
