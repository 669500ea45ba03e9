//! Progressive renderer.
//!
//! Owns everything a pass needs: the scene, camera, canvas, integrator,
//! one render context per worker and the worker pool. Each call to
//! [`Renderer::render_next_image`] runs one full pass over the image and
//! folds it into the canvas.

use std::time::Instant;

use chroma_core::SceneDescription;
use chroma_math::Vec3;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::band::{generate_bands, Band};
use crate::camera::Camera;
use crate::canvas::{store_sample, Canvas};
use crate::context::RenderContext;
use crate::error::{ChromaResult, SceneError};
use crate::integrator::{self, Integrator, PassInput};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::sink::Frame;
use crate::statistics::PassReport;

pub struct Renderer {
    settings: Settings,
    scene: Scene,
    camera: Camera,
    canvas: Canvas,
    integrator: Box<dyn Integrator>,
    contexts: Vec<RenderContext>,
    bands: Vec<Band>,
    pool: ThreadPool,
    /// Passes since the last flush
    frame_index: u64,
}

impl Renderer {
    /// Build a renderer for an imported scene.
    pub fn new(description: &SceneDescription, settings: Settings) -> ChromaResult<Self> {
        settings.validate()?;
        let scene = Scene::from_description(description, settings.acceleration_structure)?;
        let camera = Camera::new(&description.camera, settings.width, settings.height)?;
        Self::with_scene(scene, camera, settings)
    }

    pub fn with_scene(mut scene: Scene, mut camera: Camera, settings: Settings) -> ChromaResult<Self> {
        settings.validate()?;
        scene.rebuild_acceleration_structure(settings.acceleration_structure);
        camera.recalibrate_sensor(settings.width, settings.height);

        let renderer = Self {
            pool: build_pool(settings.thread_count)?,
            canvas: Canvas::new(settings.width, settings.height),
            integrator: integrator::create(&settings),
            contexts: create_contexts(&settings),
            bands: generate_bands(settings.height, settings.thread_count),
            frame_index: 0,
            settings,
            scene,
            camera,
        };

        log::info!(
            "Renderer ready: {}x{} {} with {} workers",
            renderer.settings.width,
            renderer.settings.height,
            renderer.settings.mode,
            renderer.settings.thread_count
        );
        Ok(renderer)
    }

    /// Apply new settings.
    ///
    /// The acceleration structure is rebuilt only when its type changed and
    /// the worker pool only when the thread count changed. The image is
    /// flushed.
    pub fn reinitialize(&mut self, settings: Settings) -> ChromaResult<()> {
        settings.validate()?;

        if settings.thread_count != self.settings.thread_count {
            self.pool = build_pool(settings.thread_count)?;
        }
        if (settings.width, settings.height) != (self.settings.width, self.settings.height) {
            self.canvas = Canvas::new(settings.width, settings.height);
            self.camera.recalibrate_sensor(settings.width, settings.height);
        }
        self.scene
            .rebuild_acceleration_structure(settings.acceleration_structure);

        self.integrator = integrator::create(&settings);
        self.contexts = create_contexts(&settings);
        self.bands = generate_bands(settings.height, settings.thread_count);
        self.settings = settings;
        self.flush();

        log::debug!("Renderer reinitialized: {:?}", self.settings);
        Ok(())
    }

    /// Swap in a new scene and camera from imported records.
    pub fn replace_scene(&mut self, description: &SceneDescription) -> ChromaResult<()> {
        let scene = Scene::from_description(description, self.settings.acceleration_structure)?;
        let camera = Camera::new(&description.camera, self.settings.width, self.settings.height)?;
        self.scene = scene;
        self.camera = camera;
        self.flush();
        Ok(())
    }

    /// Drop the accumulated image and restart the random streams.
    pub fn flush(&mut self) {
        self.canvas.clear();
        self.frame_index = 0;
        for ctx in &mut self.contexts {
            ctx.reseed(self.settings.seed);
        }
    }

    /// Render one pass over every pixel.
    pub fn render_next_image(&mut self) -> PassReport {
        let start = Instant::now();
        self.frame_index += 1;

        let frame_index = self.frame_index;
        let width = self.settings.width;
        let height = self.settings.height;
        let track_l1 = self.settings.compute_l1_norm;
        let accumulate = self.integrator.accumulates();
        let band_len = self.bands.first().map_or(1, |b| b.pixel_count(width));

        let Self {
            ref scene,
            ref camera,
            ref mut canvas,
            ref integrator,
            ref mut contexts,
            ref bands,
            ref pool,
            ..
        } = *self;

        let input = PassInput {
            scene,
            camera,
            width,
            height,
            frame_index,
        };
        let integrator = integrator.as_ref();

        // Every band slice belongs to exactly one worker and context
        let (rays, change) = pool.install(|| {
            canvas
                .pixels_mut()
                .par_chunks_mut(band_len)
                .zip(contexts.par_iter_mut())
                .zip(bands.par_iter())
                .map(|((pixels, ctx), band)| {
                    let mut change = 0.0f64;
                    for (i, slot) in pixels.iter_mut().enumerate() {
                        let x = (i % width as usize) as u32;
                        let y = band.y + (i / width as usize) as u32;
                        let sample = integrator.sample(x, y, &input, ctx);
                        let delta = store_sample(slot, sample, frame_index, accumulate);
                        if track_l1 {
                            change += f64::from(delta);
                        }
                    }
                    (ctx.take_ray_count(), change)
                })
                .reduce(|| (0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
        });

        let channels = self.settings.pixel_count() as f64 * 3.0;
        let report = PassReport {
            frame_index,
            rays,
            duration: start.elapsed(),
            l1_norm: track_l1.then(|| (change / channels) as f32),
        };
        log::trace!("Pass {} done: {} rays in {:?}", frame_index, rays, report.duration);
        report
    }

    pub fn snapshot(&self) -> Frame {
        self.canvas.snapshot()
    }

    pub fn validate_scene(&self) -> Result<(), SceneError> {
        self.scene.validate()
    }

    /// Move the camera. The caller decides when to flush.
    pub fn move_camera(&mut self, translation: Vec3, rotation: Vec3) {
        self.camera.move_by(translation, rotation);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset_to_initial();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("chroma-worker-{i}"))
        .build()
}

fn create_contexts(settings: &Settings) -> Vec<RenderContext> {
    (0..settings.thread_count)
        .map(|worker| RenderContext::new(settings.seed, worker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_factory::cornell_box_scene;
    use crate::settings::{AccelerationStructureType, RenderMode};

    fn settings(mode: RenderMode) -> Settings {
        Settings::new(64, 64, mode)
            .with_thread_count(4)
            .with_max_ray_depth(3)
            .with_seed(Settings::DEFAULT_SEED)
    }

    #[test]
    fn test_cornell_box_is_deterministic() {
        let _ = env_logger::builder().is_test(true).try_init();

        let description = cornell_box_scene();
        let render = || {
            let mut renderer = Renderer::new(&description, settings(RenderMode::MonteCarloPathTracer)).unwrap();
            let report = renderer.render_next_image();
            assert!(report.rays >= 64 * 64);
            renderer.snapshot()
        };

        let first = render();
        let second = render();
        assert_eq!(first, second);
        assert!(first.pixels.iter().any(|&b| b > 0));
    }

    #[test]
    fn test_flush_restarts_sequence() {
        let description = cornell_box_scene();
        let mut renderer = Renderer::new(&description, settings(RenderMode::MonteCarloPathTracer)).unwrap();
        renderer.render_next_image();
        let first = renderer.snapshot();

        renderer.render_next_image();
        assert_eq!(renderer.frame_index(), 2);

        renderer.flush();
        assert_eq!(renderer.frame_index(), 0);
        assert!(renderer.canvas().pixels().iter().all(|c| *c == Vec3::ZERO));

        renderer.render_next_image();
        assert_eq!(renderer.snapshot(), first);
    }

    #[test]
    fn test_list_and_bvh_see_the_same_surfaces() {
        let description = cornell_box_scene();
        let list = Scene::from_description(&description, AccelerationStructureType::List).unwrap();
        let bvh = Scene::from_description(&description, AccelerationStructureType::Bvh).unwrap();
        let camera = Camera::new(&description.camera, 64, 64).unwrap();

        for y in 0..64 {
            for x in 0..64 {
                let ray = camera.get_ray(x, y);
                match (list.intersect(&ray), bvh.intersect(&ray)) {
                    (None, None) => {}
                    (Some(a), Some(b)) => {
                        // Seam rays may pick either triangle, but at the same distance
                        let tolerance = 1e-3 * a.distance.max(1.0);
                        assert!(
                            (a.distance - b.distance).abs() <= tolerance,
                            "pixel ({x}, {y}): {} vs {}",
                            a.distance,
                            b.distance
                        );
                    }
                    (a, b) => panic!(
                        "pixel ({x}, {y}): list {:?} vs bvh {:?}",
                        a.map(|h| h.distance),
                        b.map(|h| h.distance)
                    ),
                }
            }
        }
    }

    #[test]
    fn test_color_cube_overwrites() {
        let description = cornell_box_scene();
        let mut renderer = Renderer::new(&description, settings(RenderMode::ColorCube)).unwrap();
        renderer.render_next_image();
        let first = renderer.snapshot();
        renderer.render_next_image();
        assert_eq!(renderer.snapshot(), first);
        assert_eq!(first.pixel(63, 0)[0], 255);
        assert_eq!(first.pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_l1_norm_tracks_change() {
        let description = cornell_box_scene();
        let mut renderer =
            Renderer::new(&description, settings(RenderMode::Avg).with_l1_norm(true)).unwrap();
        let first = renderer.render_next_image().l1_norm.unwrap();
        let mut last = first;
        for _ in 0..15 {
            last = renderer.render_next_image().l1_norm.unwrap();
        }
        assert!(last < first * 0.2, "{last} vs {first}");
    }

    #[test]
    fn test_reinitialize() {
        let description = cornell_box_scene();
        let mut renderer = Renderer::new(&description, settings(RenderMode::Simple)).unwrap();
        renderer.render_next_image();

        let bigger = settings(RenderMode::Simple)
            .with_thread_count(2)
            .with_acceleration_structure(AccelerationStructureType::List);
        let bigger = Settings {
            width: 32,
            height: 16,
            ..bigger
        };
        renderer.reinitialize(bigger).unwrap();
        assert_eq!(renderer.frame_index(), 0);
        assert_eq!(renderer.scene().acceleration_structure(), AccelerationStructureType::List);
        assert_eq!(renderer.camera().resolution(), (32, 16));

        renderer.render_next_image();
        assert_eq!(renderer.snapshot().pixels.len(), 32 * 16 * 3);

        let invalid = settings(RenderMode::Simple).with_max_ray_depth(0);
        assert!(renderer.reinitialize(invalid).is_err());
        assert_eq!(renderer.settings().width, 32);
    }
}
