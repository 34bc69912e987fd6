pub mod notification_service;
pub mod poll_service;

pub use notification_service::{DisabledNotifier, NotificationService, Notifier};
pub use poll_service::{CycleError, CycleReport, DeliveryMode, PollService};
