pub mod cli;
pub mod client;
pub mod conf;
pub mod enrichment;
pub mod event;
pub mod hub;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod shutdown;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
