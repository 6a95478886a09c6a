//! Application context and the frame loop that drives a demo.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jrtr_core::{SceneManager, Texture, TextureCache};
use jrtr_renderer::{FrameStats, Rasterizer};

use crate::config::DemoConfig;

/// Everything a demo may touch, passed explicitly to every callback.
pub struct AppContext {
    pub rasterizer: Rasterizer,
    pub textures: TextureCache,
    /// Image to use in place of a demo's procedural texture
    pub texture_override: Option<PathBuf>,
    /// Seconds of simulated time since `init`
    pub time: f32,
    /// Index of the frame being produced
    pub frame: u32,
}

impl AppContext {
    pub fn new(config: &DemoConfig) -> Result<Self> {
        let rasterizer = Rasterizer::with_size(config.width, config.height, config.render.clone())
            .context("creating rasterizer")?;
        Ok(Self {
            rasterizer,
            textures: TextureCache::new(),
            texture_override: config.texture.clone(),
            time: 0.0,
            frame: 0,
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.rasterizer.width() as f32 / self.rasterizer.height() as f32
    }

    /// The override image if one is configured, otherwise the procedural
    /// texture built by `fallback` and cached under `name`.
    pub fn texture_or(
        &mut self,
        name: &str,
        fallback: impl FnOnce() -> jrtr_core::TextureResult<Texture>,
    ) -> Result<std::sync::Arc<Texture>> {
        if let Some(path) = &self.texture_override {
            let key = path.to_string_lossy().to_string();
            return self
                .textures
                .load(&key)
                .with_context(|| format!("loading texture {}", path.display()));
        }
        if let Some(texture) = self.textures.get(name) {
            return Ok(texture);
        }
        let texture = fallback().with_context(|| format!("building texture {name}"))?;
        Ok(self.textures.insert(name, texture))
    }
}

/// A demo application: set up once, then advanced and drawn every frame.
pub trait Demo {
    fn name(&self) -> &'static str;

    /// Build the scene. Called once before the first frame.
    fn init(&mut self, ctx: &mut AppContext) -> Result<()>;

    /// Advance the animation by `dt` seconds.
    fn update(&mut self, ctx: &mut AppContext, dt: f32);

    /// The scene drawn by the default `render`.
    fn scene(&self) -> &dyn SceneManager;

    fn render(&mut self, ctx: &mut AppContext) -> Result<FrameStats> {
        ctx.rasterizer
            .render_scene(self.scene())
            .with_context(|| format!("rendering {} frame {}", self.name(), ctx.frame))
    }
}

/// Path of frame `frame` of `demo` inside `dir`.
pub fn frame_path(dir: &Path, demo: &str, frame: u32) -> PathBuf {
    dir.join(format!("{demo}_{frame:04}.png"))
}

/// Run `demo` for `frames` frames, writing each one as a PNG into
/// `output_dir`. Returns the written paths.
pub fn run(
    demo: &mut dyn Demo,
    ctx: &mut AppContext,
    frames: u32,
    frame_time: f32,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    demo.init(ctx)?;
    log::info!("Initialized demo '{}'", demo.name());

    let mut written = Vec::with_capacity(frames as usize);
    for frame in 0..frames {
        ctx.frame = frame;
        if frame > 0 {
            ctx.time += frame_time;
            demo.update(ctx, frame_time);
        }

        let stats = demo.render(ctx)?;
        let path = frame_path(output_dir, demo.name(), frame);
        ctx.rasterizer
            .color_buffer()
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        log::info!(
            "Frame {} -> {} ({} triangles, {} pixels)",
            frame,
            path.display(),
            stats.submitted,
            stats.pixels_written
        );
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrtr_core::SimpleSceneManager;

    struct Empty {
        scene: SimpleSceneManager,
        updates: u32,
    }

    impl Demo for Empty {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn init(&mut self, _ctx: &mut AppContext) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _ctx: &mut AppContext, _dt: f32) {
            self.updates += 1;
        }

        fn scene(&self) -> &dyn SceneManager {
            &self.scene
        }
    }

    fn small_config() -> DemoConfig {
        DemoConfig {
            width: 8,
            height: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_path() {
        assert_eq!(
            frame_path(Path::new("out"), "cube", 7),
            PathBuf::from("out/cube_0007.png")
        );
    }

    #[test]
    fn test_run_writes_frames_and_updates() {
        let dir = std::env::temp_dir().join("jrtr_demo_run_test");
        let mut ctx = AppContext::new(&small_config()).unwrap();
        let mut demo = Empty {
            scene: SimpleSceneManager::new(),
            updates: 0,
        };

        let paths = run(&mut demo, &mut ctx, 3, 0.5, &dir).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists()));
        assert_eq!(demo.updates, 2);
        assert!((ctx.time - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_texture_fallback_is_cached() {
        let mut ctx = AppContext::new(&small_config()).unwrap();
        let a = ctx
            .texture_or("solid", || Ok(Texture::solid_color([1, 2, 3])))
            .unwrap();
        let b = ctx
            .texture_or("solid", || panic!("fallback must not run twice"))
            .unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_invalid_size_is_error() {
        let config = DemoConfig {
            width: 0,
            ..Default::default()
        };
        assert!(AppContext::new(&config).is_err());
    }
}
