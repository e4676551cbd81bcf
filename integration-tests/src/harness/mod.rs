mod config;
mod geo;
pub mod server;
pub mod stream;
pub mod tracing;

pub use geo::FixtureResolver;
pub use server::TestServer;
pub use stream::ViewerStream;
pub use self::tracing::{CapturedEvent, init_test_tracing};
