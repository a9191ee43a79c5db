#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod import;
pub mod input;
pub mod panels;
pub mod plan;
pub mod renderer;
pub mod state;
pub mod tools;
pub mod util;
pub mod viewport;

pub use app::FloorplanApp;
pub use command::{Command, History};
pub use config::{EditorConfig, ImportConfig};
pub use plan::{Corner, FloorPlan, Opening, Point, Room, Scale, Unit, Wall};
pub use renderer::Renderer;
pub use state::EditorState;
pub use tools::{EditorMode, Tool, ToolType};
pub use viewport::Viewport;
