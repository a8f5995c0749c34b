mod members;
pub use members::Members;

mod events;
pub use events::Events;

mod attendance;
pub use attendance::Attendance;

mod donations;
pub use donations::Donations;

mod subscriptions;
pub use subscriptions::Subscriptions;

mod news;
pub use news::News;

mod stats;
pub use stats::ShowStats;
