//! View components for the application.

mod header;
mod message_search;
mod physician_search;

pub use header::view_header;
pub use message_search::view_message_search;
pub use physician_search::view_physician_search;
