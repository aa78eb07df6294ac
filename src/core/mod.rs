//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The `LedgerStore` abstraction and the `atomically` helper
//! - `account_manager` - Account creation, lookup and balance mutation
//! - `engine` - Entry and transfer lifecycle orchestration

pub mod account_manager;
pub mod engine;
pub mod traits;

pub use account_manager::AccountManager;
pub use engine::LedgerEngine;
pub use traits::{atomically, LedgerStore};
