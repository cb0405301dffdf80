pub mod ids;
pub mod session;
pub mod messages;
pub mod health;
pub mod diagnostics;
pub mod participants;
pub mod error;

pub use ids::*;
pub use session::*;
pub use messages::*;
pub use health::*;
pub use diagnostics::*;
pub use participants::*;
pub use error::*;
