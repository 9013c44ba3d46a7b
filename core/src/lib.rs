pub mod catalog;
pub mod context;
pub mod progression;
pub mod service;
pub mod store;
pub mod timegate;

// Re-exports for convenience
pub use context::AppConfig;
pub use service::{NewGoalRequest, NewTaskRequest, SessionHandle, Snapshot, TaskPatch};
pub use store::ProfileStore;
