pub mod color;
mod display_name;
mod file_size;

pub use display_name::{DisplayNameStore, DEFAULT_TTL_DAYS};
pub use file_size::format_size;
