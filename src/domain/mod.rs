pub mod entry;
pub mod notification;

pub use entry::Entry;
pub use notification::{Notification, EMPTY_BODY};
