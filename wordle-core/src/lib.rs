pub mod config;
pub mod engine;
pub mod events;
pub mod grader;
pub mod progress;
pub mod record;
pub mod selector;
pub mod session;
pub mod store;
pub mod word;

// Re-export main components
pub use config::*;
pub use engine::*;
pub use events::*;
pub use grader::*;
pub use progress::*;
pub use record::*;
pub use selector::*;
pub use session::*;
pub use store::*;
pub use word::*;
