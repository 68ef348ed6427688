//! Action queue and room lifecycle.
//!
//! Each room runs one tokio task that owns its `GameFlow`. Submissions are
//! queued on a bounded mpsc channel and applied strictly in arrival order;
//! replies travel back on oneshot channels. Rooms share nothing, so any
//! number of them progress in parallel.

mod bots;
pub mod broadcast;
pub mod events;
mod handle;
pub mod registry;
mod task;

#[cfg(test)]
mod tests_rooms;

pub use broadcast::{BroadcastError, Broadcaster, ChannelBroadcaster, MemoryBroadcaster};
pub use events::{EventPublisher, MemoryPublisher, TracingPublisher};
pub use handle::{RoomHandle, RoomStatus};
pub use registry::{RoomRegistry, RoomSpec, SeatSpec};
