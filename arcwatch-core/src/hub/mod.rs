mod guard;
mod handle;
mod manager;

#[cfg(test)]
mod tests;

pub use guard::SubscriberGuard;
pub use handle::{SendOutcome, SubscriberHandle, SubscriberId};
pub use manager::{BroadcastHub, DEFAULT_SEND_BUFFER, PublishReport, Subscription};
