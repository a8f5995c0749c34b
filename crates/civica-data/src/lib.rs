// Operations
mod operations;
pub use operations::*;

// Models
mod members;
pub use members::*;

mod events;
pub use events::*;

mod attendance;
pub use attendance::*;

mod donations;
pub use donations::*;

mod subscriptions;
pub use subscriptions::*;

mod news;
pub use news::*;
