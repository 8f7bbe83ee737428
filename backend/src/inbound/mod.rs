//! Inbound adapters that translate external requests into domain use cases
//! while keeping framework details at the edge.

pub mod http;
