//! sea-orm models for the tables owned by the inventory application.
//!
//! Table and column names follow the writer's camel-cased schema; Rust field
//! names are snake_case and mapped through `column_name`.

pub mod codes;

pub mod audit_session;
pub mod count_session;
pub mod pending_transaction;
pub mod product;
pub mod team;
pub mod transaction;
pub mod user;
pub mod warehouse;

pub use codes::{SessionStatus, TransactionType, UserRole};
