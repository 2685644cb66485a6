//! AI recruitment screening core: schema validation of AI payloads, weighted
//! candidate scoring, the analysis-service client, the session state store,
//! and the sequential screening pipeline that ties them together.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod validation;
