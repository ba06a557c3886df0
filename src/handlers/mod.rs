pub mod create;
pub mod get;
pub mod health;
pub mod http;

pub use create::create_note;
pub use get::get_note;
pub use health::health_handler;
pub use http::{fallback_handler, note_item_handler, notes_handler};
