//! The bundled demo scenes.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use anyhow::{bail, Result};
use jrtr_core::{
    shapes, GraphSceneManager, Light, Material, NodeId, SceneManager, Shape, SimpleSceneManager,
    Texture, TextureFilter,
};
use jrtr_math::{Camera, Mat4, Vec3};

use crate::app::{AppContext, Demo};

pub const DEMO_NAMES: [&str; 5] = ["cube", "house", "textured", "bezier", "robot"];

/// Instantiate a demo by name.
pub fn create(name: &str) -> Result<Box<dyn Demo>> {
    Ok(match name {
        "cube" => Box::new(CubeDemo::default()),
        "house" => Box::new(HouseDemo::default()),
        "textured" => Box::new(TexturedDemo::default()),
        "bezier" => Box::new(BezierDemo::default()),
        "robot" => Box::new(RobotDemo::default()),
        other => bail!("unknown demo '{other}', expected one of {DEMO_NAMES:?}"),
    })
}

fn checker(cells: u32) -> jrtr_core::TextureResult<Texture> {
    Texture::checkerboard(cells * 8, cells * 8, 8, [230, 230, 230], [40, 60, 160])
}

/// A vertex-colored cube tumbling in front of the camera.
#[derive(Default)]
pub struct CubeDemo {
    scene: SimpleSceneManager,
    cube: usize,
    angle: f32,
}

impl CubeDemo {
    fn world(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle) * Mat4::from_rotation_x(self.angle * 0.5)
    }
}

impl Demo for CubeDemo {
    fn name(&self) -> &'static str {
        "cube"
    }

    fn init(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.scene.frustum.set_aspect_ratio(ctx.aspect_ratio());
        self.scene.camera = Camera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        let cube = Shape::new("cube", shapes::cube(1.0)?, Material::default());
        self.angle = 0.5;
        self.cube = self.scene.add_shape(Arc::new(cube), self.world());
        Ok(())
    }

    fn update(&mut self, _ctx: &mut AppContext, dt: f32) {
        self.angle = (self.angle + dt * 1.2) % TAU;
        self.scene.set_transform(self.cube, self.world());
    }

    fn scene(&self) -> &dyn SceneManager {
        &self.scene
    }
}

/// Procedural atlas matching the house texture coordinates: walls bottom
/// left, roof below them, grass on the right.
fn house_atlas() -> jrtr_core::TextureResult<Texture> {
    const SIZE: u32 = 256;
    Texture::from_fn(SIZE, SIZE, |x, y| {
        let u = x as f32 / SIZE as f32;
        let v = y as f32 / SIZE as f32;
        if u >= 0.47 {
            if (x / 16 + y / 16) % 2 == 0 {
                [70, 150, 60]
            } else {
                [60, 130, 50]
            }
        } else if v >= 0.45 {
            // bricks with an offset every other course
            let course = y / 8;
            let shift = if course % 2 == 0 { 0 } else { 8 };
            if y % 8 == 0 || (x + shift) % 16 == 0 {
                [200, 200, 190]
            } else {
                [170, 70, 50]
            }
        } else if y % 10 < 2 {
            [90, 30, 30]
        } else {
            [150, 40, 40]
        }
    })
}

/// The textured house on its lawn, with the camera orbiting it.
#[derive(Default)]
pub struct HouseDemo {
    scene: SimpleSceneManager,
    orbit: f32,
}

impl HouseDemo {
    fn place_camera(&mut self) {
        let eye = Vec3::new(40.0 * self.orbit.sin(), 14.0, 40.0 * self.orbit.cos());
        self.scene.camera = Camera::new(eye, Vec3::new(0.0, 2.0, 0.0));
    }
}

impl Demo for HouseDemo {
    fn name(&self) -> &'static str {
        "house"
    }

    fn init(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.scene.frustum.set_aspect_ratio(ctx.aspect_ratio());
        let texture = ctx.texture_or("house", house_atlas)?;
        let material = Material::textured("house", texture, TextureFilter::Bilinear);
        let house = Shape::new("house", shapes::house()?, material);
        self.scene.add_shape(Arc::new(house), Mat4::IDENTITY);
        self.scene.add_light(Light::point(Vec3::new(0.0, 30.0, 10.0)));
        self.orbit = 0.3;
        self.place_camera();
        Ok(())
    }

    fn update(&mut self, _ctx: &mut AppContext, dt: f32) {
        self.orbit = (self.orbit + dt * 0.5) % TAU;
        self.place_camera();
    }

    fn scene(&self) -> &dyn SceneManager {
        &self.scene
    }
}

/// Two spinning cubes sharing one checkerboard, one sampled nearest and
/// one bilinear.
#[derive(Default)]
pub struct TexturedDemo {
    scene: SimpleSceneManager,
    cubes: [usize; 2],
    angle: f32,
}

const TEXTURED_OFFSETS: [f32; 2] = [-1.7, 1.7];

impl TexturedDemo {
    fn world(&self, i: usize) -> Mat4 {
        Mat4::from_translation(Vec3::new(TEXTURED_OFFSETS[i], 0.0, 0.0))
            * Mat4::from_rotation_y(self.angle)
            * Mat4::from_rotation_x(0.4)
    }
}

impl Demo for TexturedDemo {
    fn name(&self) -> &'static str {
        "textured"
    }

    fn init(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.scene.frustum.set_aspect_ratio(ctx.aspect_ratio());
        self.scene.camera = Camera::new(Vec3::new(0.0, 1.0, 7.0), Vec3::ZERO);
        let texture = ctx.texture_or("checker", || {
            Texture::checkerboard(4, 4, 1, [240, 200, 40], [30, 30, 30])
        })?;
        let data = Arc::new(shapes::cube(1.0)?);

        self.angle = 0.6;
        for (i, filter) in [TextureFilter::Nearest, TextureFilter::Bilinear]
            .into_iter()
            .enumerate()
        {
            let shape = Shape {
                name: format!("cube_{filter:?}").to_lowercase(),
                vertex_data: data.clone(),
                material: Arc::new(Material::textured("checker", texture.clone(), filter)),
            };
            self.cubes[i] = self.scene.add_shape(Arc::new(shape), self.world(i));
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut AppContext, dt: f32) {
        self.angle = (self.angle + dt * 0.8) % TAU;
        for i in 0..2 {
            self.scene.set_transform(self.cubes[i], self.world(i));
        }
    }

    fn scene(&self) -> &dyn SceneManager {
        &self.scene
    }
}

/// Control points of a two-segment vase profile in the xz plane.
const VASE_PROFILE: [[f32; 3]; 7] = [
    [1.0, 0.0, -2.0],
    [2.2, 0.0, -1.2],
    [0.4, 0.0, -0.4],
    [0.6, 0.0, 0.2],
    [0.8, 0.0, 0.8],
    [1.6, 0.0, 1.2],
    [1.2, 0.0, 2.0],
];

/// A Bezier vase and a striped cylinder, both standing upright and turning.
#[derive(Default)]
pub struct BezierDemo {
    scene: SimpleSceneManager,
    vase: usize,
    cylinder: usize,
    angle: f32,
}

impl BezierDemo {
    fn upright(&self, x: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
            * Mat4::from_rotation_y(self.angle)
            * Mat4::from_rotation_x(-FRAC_PI_2)
    }
}

impl Demo for BezierDemo {
    fn name(&self) -> &'static str {
        "bezier"
    }

    fn init(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.scene.frustum.set_aspect_ratio(ctx.aspect_ratio());
        self.scene.camera = Camera::new(Vec3::new(0.0, 2.0, 9.0), Vec3::ZERO);

        let texture = ctx.texture_or("vase", || checker(4))?;
        let points: Vec<Vec3> = VASE_PROFILE.iter().map(|p| Vec3::from_array(*p)).collect();
        let vase = Shape::new(
            "vase",
            shapes::bezier_revolution(2, &points, 12, 32)?,
            Material::textured("vase", texture, TextureFilter::Bilinear),
        );
        let cylinder = Shape::new(
            "cylinder",
            shapes::cylinder(24, 0.8, 1.5)?,
            Material::default(),
        );

        self.vase = self.scene.add_shape(Arc::new(vase), self.upright(-1.8));
        self.cylinder = self.scene.add_shape(Arc::new(cylinder), self.upright(1.8));
        Ok(())
    }

    fn update(&mut self, _ctx: &mut AppContext, dt: f32) {
        self.angle = (self.angle + dt) % TAU;
        self.scene.set_transform(self.vase, self.upright(-1.8));
        self.scene.set_transform(self.cylinder, self.upright(1.8));
    }

    fn scene(&self) -> &dyn SceneManager {
        &self.scene
    }
}

/// A jointed robot built as a scene graph; limbs swing around their
/// shoulder and hip joints.
#[derive(Default)]
pub struct RobotDemo {
    scene: GraphSceneManager,
    root: Option<NodeId>,
    /// Shoulder and hip joints with their rest transform and swing sign
    joints: Vec<(NodeId, Mat4, f32)>,
    time: f32,
}

impl RobotDemo {
    fn swing(&self) -> f32 {
        (self.time * 3.0).sin() * 0.6
    }

    fn pose(&mut self) -> Result<()> {
        let swing = self.swing();
        for &(joint, rest, sign) in &self.joints {
            self.scene
                .graph
                .set_local_transform(joint, rest * Mat4::from_rotation_x(sign * swing))?;
        }
        if let Some(root) = self.root {
            self.scene
                .graph
                .set_local_transform(root, Mat4::from_rotation_y(self.time * 0.7 + 0.4))?;
        }
        Ok(())
    }
}

impl Demo for RobotDemo {
    fn name(&self) -> &'static str {
        "robot"
    }

    fn init(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.scene.frustum.set_aspect_ratio(ctx.aspect_ratio());
        self.scene.camera = Camera::new(Vec3::new(0.0, 1.0, 12.0), Vec3::new(0.0, 0.0, 0.0));

        let block = Arc::new(Shape::new("block", shapes::cube(1.0)?, Material::default()));
        let limb = Arc::new(Shape::new(
            "limb",
            shapes::cylinder(16, 0.3, 1.0)?,
            Material::default(),
        ));
        let graph = &mut self.scene.graph;

        let root = graph.add_group("robot", Mat4::IDENTITY);
        let sun = graph.add_light(
            "sun",
            Mat4::IDENTITY,
            Light::directional(Vec3::new(0.0, -1.0, -1.0)),
        );
        graph.add_child(root, sun)?;

        let torso = graph.add_shape(
            "torso",
            Mat4::from_scale(Vec3::new(1.0, 1.5, 0.5)),
            block.clone(),
        );
        let head = graph.add_shape(
            "head",
            Mat4::from_translation(Vec3::new(0.0, 2.1, 0.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            block,
        );
        graph.add_child(root, torso)?;
        graph.add_child(root, head)?;

        // Limbs hang from their joint along -y
        let hanging =
            Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)) * Mat4::from_rotation_x(FRAC_PI_2);
        let joints = [
            ("left_shoulder", Vec3::new(-1.35, 1.3, 0.0), 1.0),
            ("right_shoulder", Vec3::new(1.35, 1.3, 0.0), -1.0),
            ("left_hip", Vec3::new(-0.5, -1.5, 0.0), -1.0),
            ("right_hip", Vec3::new(0.5, -1.5, 0.0), 1.0),
        ];
        for (name, offset, sign) in joints {
            let rest = Mat4::from_translation(offset);
            let joint = graph.add_group(name, rest);
            let part = graph.add_shape(format!("{name}_limb"), hanging, limb.clone());
            graph.add_child(joint, part)?;
            graph.add_child(root, joint)?;
            self.joints.push((joint, rest, sign));
        }

        self.scene.set_root(root)?;
        self.root = Some(root);
        self.pose()
    }

    fn update(&mut self, _ctx: &mut AppContext, dt: f32) {
        self.time += dt;
        if let Err(err) = self.pose() {
            log::warn!("robot pose failed: {err}");
        }
    }

    fn scene(&self) -> &dyn SceneManager {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;

    fn context() -> AppContext {
        let config = DemoConfig {
            width: 48,
            height: 40,
            ..Default::default()
        };
        AppContext::new(&config).unwrap()
    }

    #[test]
    fn test_every_demo_draws_something() {
        for name in DEMO_NAMES {
            let mut ctx = context();
            let mut demo = create(name).unwrap();
            assert_eq!(demo.name(), name);
            demo.init(&mut ctx).unwrap();
            demo.update(&mut ctx, 0.1);
            let stats = demo.render(&mut ctx).unwrap();
            assert!(stats.submitted > 0, "{name} submitted nothing");
            assert!(stats.pixels_written > 0, "{name} drew nothing");
        }
    }

    #[test]
    fn test_unknown_demo() {
        assert!(create("teapot").is_err());
    }

    #[test]
    fn test_robot_flatten_counts() {
        let mut ctx = context();
        let mut robot = RobotDemo::default();
        robot.init(&mut ctx).unwrap();
        let flat = robot.scene().flatten().unwrap();
        // torso, head and four limbs
        assert_eq!(flat.items.len(), 6);
        assert_eq!(flat.lights.len(), 1);
    }

    #[test]
    fn test_robot_limbs_swing() {
        let mut ctx = context();
        let mut robot = RobotDemo::default();
        robot.init(&mut ctx).unwrap();
        let joint = robot.joints[0].0;
        let before = robot.scene.graph.node(joint).unwrap().local_transform();
        robot.update(&mut ctx, 0.25);
        let after = robot.scene.graph.node(joint).unwrap().local_transform();
        assert_ne!(before, after);
    }

    #[test]
    fn test_house_atlas_regions() {
        let atlas = house_atlas().unwrap();
        // grass on the right half
        assert!(atlas.texel(200, 10)[1] > 100);
        // brick red in the wall region
        assert_eq!(atlas.texel(3, 201), [170, 70, 50]);
    }
}
