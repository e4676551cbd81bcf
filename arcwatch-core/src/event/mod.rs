mod message;
mod types;

#[cfg(test)]
mod tests;

pub use message::*;
pub use types::*;
