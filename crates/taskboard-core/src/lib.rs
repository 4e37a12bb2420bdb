pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, NotificationConfig};
pub use error::TaskboardError;
pub use result::TaskboardResult;
pub use traits::{PositionRepository, Repository};
