//! sqlgate - run SQL statements against an embedded SQLite engine over HTTP
//!
//! Request flow: the gateway decodes `{"sql": ...}`, the engine adapter runs
//! it as an exec or a query (timing, counting and logging the call), and the
//! gateway answers with a fixed JSON envelope.

pub mod cli;
pub mod core;
pub mod engine;
pub mod http_server;
pub mod observability;
