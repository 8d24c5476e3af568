use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::ExportConfig;
use crate::export::{self, ExportSummary};
use crate::scene_graph::Scene;

pub const GEOM_EXTENSION: &str = "geom";

#[derive(Parser, Debug)]
#[command(name = "geom-export")]
#[command(version, about = "Export selected scene meshes to a .geom triangle file")]
pub struct Cli {
    /// Scene to export (.gltf or .glb).
    pub input: PathBuf,

    /// Output file. Defaults to the input path with a .geom extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export only the named objects (repeatable).
    #[arg(short, long = "select", value_name = "NAME", conflicts_with = "all")]
    pub select: Vec<String>,

    /// Export every object.
    #[arg(short, long)]
    pub all: bool,

    /// Index of the scene to export instead of the default one.
    #[arg(long)]
    pub scene: Option<usize>,

    /// Fractional digits written for every float.
    #[arg(long, default_value_t = ExportConfig::default().precision)]
    pub precision: usize,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            precision: self.precision,
        }
    }
}

/// `scene.gltf` -> `scene.geom`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(GEOM_EXTENSION)
}

/// Applies the command line selection to the scene. Without `--all` or
/// `--select`, the selection stored in the file is kept.
pub fn apply_selection(scene: &mut Scene, cli: &Cli) {
    if cli.all {
        scene.select_all();
    } else if !cli.select.is_empty() {
        for name in scene.select_by_names(&cli.select) {
            log::warn!("No object named {} in the scene", name);
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<ExportSummary> {
    let mut scene = Scene::from_gltf_file(&cli.input, cli.scene)?;
    apply_selection(&mut scene, &cli);

    if scene.selected_objects().next().is_none() {
        log::warn!("No objects selected, the output file will be empty");
    }

    export::export_geometry(&scene, &cli.output_path(), &cli.export_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::Object3D;

    #[test]
    fn output_defaults_to_geom_next_to_input() {
        let cli = Cli::parse_from(["geom-export", "scenes/teapot.gltf"]);
        assert_eq!(cli.output_path(), PathBuf::from("scenes/teapot.geom"));

        let cli = Cli::parse_from(["geom-export", "teapot"]);
        assert_eq!(cli.output_path(), PathBuf::from("teapot.geom"));
    }

    #[test]
    fn explicit_output_and_precision() {
        let cli = Cli::parse_from([
            "geom-export",
            "teapot.glb",
            "-o",
            "out/trace.geom",
            "--precision",
            "3",
        ]);
        assert_eq!(cli.output_path(), PathBuf::from("out/trace.geom"));
        assert_eq!(cli.export_config().precision, 3);
        assert_eq!(Cli::parse_from(["geom-export", "a.gltf"]).precision, 6);
    }

    #[test]
    fn select_and_all_conflict() {
        let result = Cli::try_parse_from(["geom-export", "a.gltf", "--all", "--select", "Cube"]);
        assert!(result.is_err());
    }

    #[test]
    fn selection_flags_override_file_selection() {
        let mut scene = Scene::new();
        scene.add_object(Object3D::new("Cube").selected(true));
        scene.add_object(Object3D::new("Lamp"));

        let keep = Cli::parse_from(["geom-export", "a.gltf"]);
        apply_selection(&mut scene, &keep);
        assert_eq!(scene.selected_objects().count(), 1);

        let named = Cli::parse_from(["geom-export", "a.gltf", "-s", "Lamp"]);
        apply_selection(&mut scene, &named);
        let (_, selected) = scene.selected_objects().next().unwrap();
        assert_eq!(selected.name, "Lamp");
        assert_eq!(scene.selected_objects().count(), 1);

        let all = Cli::parse_from(["geom-export", "a.gltf", "--all"]);
        apply_selection(&mut scene, &all);
        assert_eq!(scene.selected_objects().count(), 2);
    }
}
