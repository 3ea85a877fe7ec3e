pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::QuillConfig;
pub use error::{QuillError, Result};
pub use events::DictationEvent;
pub use types::*;
