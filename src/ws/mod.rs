pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod hub;
pub mod registry;
pub mod rooms;
pub mod session;

pub use error::HubError;
pub use hub::{Hub, HubStats};
pub use session::{ArchiveLimits, StartPolicy};
