#![warn(clippy::all, rust_2018_idioms)]

pub mod capability;
pub mod clipboard;
pub mod codec;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod item;
pub mod ops;
pub mod raster;
pub mod render;
pub mod scene;
pub mod session;
pub mod tools;

pub use capability::{Capabilities, ColorConversion};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use command::{Command, CommandContext, CommandHistory};
pub use config::EditorConfig;
pub use document::{Document, DocumentSnapshot};
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler, StatusLog};
pub use item::MovableItem;
pub use ops::{AdjustmentParams, TransformKind};
pub use raster::{PixelRect, RasterImage};
pub use scene::{HandleKind, Scene, SceneState, Selection};
pub use session::{EditorSession, NewImageParams, ResizeParams};
pub use tools::Tool;
