//! Feature aggregation and the reply graph derived from a message table.

pub mod features;
pub mod reply_graph;
