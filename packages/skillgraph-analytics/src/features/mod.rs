//! Feature modules

pub mod query_engine;
