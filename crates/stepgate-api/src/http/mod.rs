//! HTTP handlers and routing.

pub mod decision;
pub mod monitoring;
pub mod notify;
pub mod routes;
