//! Application layer: command handlers (lifecycle engine) and query
//! handlers (lookup service).

pub mod command_handlers;
pub mod query_handlers;
