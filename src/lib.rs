pub mod cli;
pub mod config;
pub mod export;
pub mod mesh;
pub mod scene_graph;

pub use config::ExportConfig;
pub use export::{export_geometry, write_geometry, ExportSummary, SceneSource};
pub use mesh::Mesh;
pub use scene_graph::Scene;
