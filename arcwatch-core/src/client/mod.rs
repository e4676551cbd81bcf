//! Viewer side of the stream: decouples message arrival from rendering.
//!
//! [`ViewerClient`] pushes decoded messages through a [`QueueWriter`]; the
//! render loop calls [`ClientEventQueue::drain`] once per tick and draws the
//! resulting [`DisplaySet`].

mod connect;
mod display;
mod queue;


pub use connect::{ClientError, ViewerClient};
pub use display::{ArcColor, ArcSegment, DisplayEntry, DisplaySet, RingPoint};
pub use queue::{ClientEventQueue, QueueWriter};

pub const DEFAULT_DISPLAY_CAPACITY: usize = 100;
