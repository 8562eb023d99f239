//! FieldSketch Core Library
//!
//! Platform-agnostic drawing model for FieldSketch field annotation: shapes,
//! layered projects, undo history, viewport math and drawing tools. Painting
//! goes through the [`Surface`] trait so hosts can plug in any 2D backend.

pub mod canvas;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod history;
pub mod input;
pub mod project;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod surface;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, CanvasConfig, CanvasError};
pub use frame::FrameScheduler;
pub use grid::{Grid, GridLines};
pub use history::{Command, CommandError, History, HistoryConfig};
pub use input::{DrawSample, InputEvent, PointerKind};
pub use project::{Layer, LayerId, Project, ProjectError, ProjectRecord, SkippedObject};
pub use selection::{Handle, HandleKind, ObjectRef, Selection};
pub use shapes::{Drawable, Shape, ShapeId, ShapeStyle};
pub use storage::{AutoSave, AutoSaveConfig, MemoryStorage, Storage, StorageError};
pub use surface::{EstimatedMetrics, ImageHandle, RecordingSurface, Surface, TextMeasurer};
pub use tools::{ToolKind, ToolManager, ToolSettings};
pub use viewport::Viewport;
