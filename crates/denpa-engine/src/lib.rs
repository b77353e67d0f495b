pub mod handle;
pub mod protocol;
pub mod store;
mod worker;

pub use handle::EngineHandle;
pub use protocol::{EngineCommand, EngineEvent, NotificationType};
pub use store::{CountdownEntry, CountdownStore};
pub use worker::TICK_INTERVAL;
