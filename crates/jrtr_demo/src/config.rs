//! Demo runner configuration: JSON file plus command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use jrtr_renderer::RenderConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Which demo to run: cube, house, textured, bezier or robot
    pub demo: String,
    pub width: u32,
    pub height: u32,
    /// Number of frames to render
    pub frames: u32,
    /// Simulated seconds between frames
    pub frame_time: f32,
    /// Directory the PNG frames are written to
    pub output_dir: PathBuf,
    /// Optional image used instead of the built-in procedural textures
    pub texture: Option<PathBuf>,
    pub render: RenderConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: "cube".to_string(),
            width: 500,
            height: 500,
            frames: 1,
            frame_time: 1.0 / 30.0,
            output_dir: PathBuf::from("frames"),
            texture: None,
            render: RenderConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build the configuration from command-line arguments (without the
    /// program name). `--config` is applied first, other flags override it.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = match flag_value(args, "--config") {
            Some(path) => Self::load(Path::new(path))?,
            None => Self::default(),
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .map(String::as_str)
                    .with_context(|| format!("{name} needs a value"))
            };
            match arg.as_str() {
                "--config" => {
                    value("--config")?;
                }
                "--frames" => {
                    config.frames = value("--frames")?.parse().context("--frames")?;
                }
                "--size" => {
                    let (w, h) = parse_size(value("--size")?)?;
                    config.width = w;
                    config.height = h;
                }
                "--out" => config.output_dir = PathBuf::from(value("--out")?),
                "--texture" => config.texture = Some(PathBuf::from(value("--texture")?)),
                "--parallel" => config.render.parallel = true,
                "--no-cull" => config.render.cull_back_faces = false,
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                demo => config.demo = demo.to_string(),
            }
        }

        Ok(config)
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_size(text: &str) -> Result<(u32, u32)> {
    let (w, h) = text
        .split_once('x')
        .with_context(|| format!("size '{text}' is not WIDTHxHEIGHT"))?;
    Ok((
        w.trim().parse().context("size width")?,
        h.trim().parse().context("size height")?,
    ))
}
