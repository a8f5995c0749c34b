pub mod attendance;
pub mod billing;
pub mod calendar;
pub mod datetime;
pub mod donations;
pub mod lifecycle;
pub mod registration;
