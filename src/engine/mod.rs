pub mod animation_loop;
pub mod assets;
pub mod camera;
pub mod camera_rig;
pub mod capability;
pub mod cli;
pub mod command_queue;
pub mod config;
pub mod console;
pub mod preferences;
pub mod quality;
pub mod runtime;
pub mod scene;
pub mod user_input;
pub mod windowing;
pub mod worker;

pub use runtime::SceneRuntime;

use std::path::PathBuf;

/// Engine-level error type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("event loop unavailable: {0}")]
    EventLoop(String),

    #[error("window creation failed: {0}")]
    Window(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("asset '{name}' failed: {reason}")]
    Asset { name: String, reason: String },

    #[error("render worker could not start: {0}")]
    Worker(String),

    #[error("render worker stopped unexpectedly")]
    WorkerPanicked,
}

pub type EngineResult<T> = Result<T, EngineError>;
