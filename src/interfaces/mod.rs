//! Inbound adapters: the HTTP webhook binding and the CSV seed reader.

pub mod csv;
pub mod http;
