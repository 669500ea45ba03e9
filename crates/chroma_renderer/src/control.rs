//! Control surface and render loop.
//!
//! [`ChromaCore`] owns a dedicated control thread that waits for a start
//! signal and then drives [`Renderer::render_next_image`] until it is
//! stopped, interrupted, or the single pass of a non-continuous run is
//! done. The renderer sits behind a mutex held for one pass, so every
//! mutation from the front end lands between passes.
//!
//! The render state is only changed under its own lock. `start` queues a
//! signal only on the Waiting to Rendering transition, and the loop decides
//! whether to go on under the same lock, so a `stop` followed by `start`
//! can never be lost between the two.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chroma_core::SceneDescription;
use chroma_math::Vec3;

use crate::error::{ChromaResult, SceneError};
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::sink::Frame;
use crate::statistics::{Statistics, StatisticsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Waiting,
    Rendering,
}

enum Signal {
    Start,
    Shutdown,
}

struct Shared {
    renderer: Mutex<Renderer>,
    statistics: Statistics,
    /// Last published snapshot
    frame: RwLock<Frame>,
    state: Mutex<RenderState>,
    /// Scene check of the current scene, refreshed whenever it is replaced
    scene_check: Mutex<Result<(), SceneError>>,
    /// Ends the current run after the pass in flight
    break_loop: AtomicBool,
    interrupted: AtomicBool,
    needs_flush: AtomicBool,
    /// A frame was published since the last `current_frame`
    changed: AtomicBool,
    progress: Mutex<()>,
    progress_signal: Condvar,
}

impl Shared {
    fn renderer(&self) -> MutexGuard<'_, Renderer> {
        lock(&self.renderer)
    }

    fn state(&self) -> MutexGuard<'_, RenderState> {
        lock(&self.state)
    }

    fn publish(&self, frame: Frame) {
        *self.frame.write().unwrap_or_else(PoisonError::into_inner) = frame;
        self.changed.store(true, Ordering::Release);
    }

    fn notify_progress(&self) {
        let _guard = lock(&self.progress);
        self.progress_signal.notify_all();
    }
}

pub struct ChromaCore {
    shared: Arc<Shared>,
    signals: Sender<Signal>,
    handle: Option<JoinHandle<()>>,
}

impl ChromaCore {
    pub fn new(description: &SceneDescription, settings: Settings) -> ChromaResult<Self> {
        let renderer = Renderer::new(description, settings)?;
        Self::with_renderer(renderer)
    }

    pub fn with_renderer(renderer: Renderer) -> ChromaResult<Self> {
        let frame = renderer.snapshot();
        let scene_check = renderer.validate_scene();
        let shared = Arc::new(Shared {
            renderer: Mutex::new(renderer),
            statistics: Statistics::new(),
            frame: RwLock::new(frame),
            state: Mutex::new(RenderState::Waiting),
            scene_check: Mutex::new(scene_check),
            break_loop: AtomicBool::new(false),
            interrupted: AtomicBool::new(false),
            needs_flush: AtomicBool::new(false),
            changed: AtomicBool::new(false),
            progress: Mutex::new(()),
            progress_signal: Condvar::new(),
        });

        let (signals, receiver) = channel();
        let loop_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("chroma-render".into())
            .spawn(move || render_loop(&loop_shared, &receiver))?;

        Ok(Self {
            shared,
            signals,
            handle: Some(handle),
        })
    }

    /// Start rendering.
    ///
    /// A scene without light sources is refused and the loop stays waiting.
    /// Calling this while a run is in flight cancels a pending [`stop`]
    /// and otherwise changes nothing.
    ///
    /// [`stop`]: ChromaCore::stop
    pub fn start(&self) -> Result<(), SceneError> {
        if let Err(err) = lock(&self.shared.scene_check).clone() {
            log::error!("Refusing to start rendering: {}", err);
            return Err(err);
        }

        let mut state = self.shared.state();
        self.shared.break_loop.store(false, Ordering::Release);
        if *state == RenderState::Rendering {
            log::debug!("Already rendering, keeping the current run");
            return Ok(());
        }

        *state = RenderState::Rendering;
        if self.signals.send(Signal::Start).is_err() {
            *state = RenderState::Waiting;
            log::warn!("Render loop is gone, start ignored");
        }
        Ok(())
    }

    /// Leave the continuous loop after the current pass. The image is kept.
    pub fn stop(&self) {
        let _state = self.shared.state();
        self.shared.break_loop.store(true, Ordering::Release);
    }

    /// Apply new settings and flush the image.
    pub fn reinitialize(&self, settings: Settings) -> ChromaResult<()> {
        let mut renderer = self.shared.renderer();
        renderer.reinitialize(settings)?;
        self.after_flush(&renderer);
        Ok(())
    }

    /// Replace the rendered scene and camera.
    pub fn replace_scene(&self, description: &SceneDescription) -> ChromaResult<()> {
        let mut renderer = self.shared.renderer();
        renderer.replace_scene(description)?;
        *lock(&self.shared.scene_check) = renderer.validate_scene();
        self.after_flush(&renderer);
        Ok(())
    }

    /// Drop the accumulated image before the next pass.
    pub fn flush_on_next_image(&self) {
        self.shared.needs_flush.store(true, Ordering::Release);
    }

    /// Latest published frame. Clears the change flag.
    pub fn current_frame(&self) -> Frame {
        self.shared.changed.store(false, Ordering::Release);
        self.shared
            .frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_changes(&self) -> bool {
        self.shared.changed.load(Ordering::Acquire)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.shared.statistics.snapshot()
    }

    pub fn settings(&self) -> Settings {
        self.shared.renderer().settings().clone()
    }

    /// Move the camera relative to its current pose. The image is flushed
    /// before the next pass.
    pub fn move_camera(&self, translation: Vec3, rotation: Vec3) {
        self.shared.renderer().move_camera(translation, rotation);
        self.flush_on_next_image();
    }

    pub fn reset_camera(&self) {
        self.shared.renderer().reset_camera();
        self.flush_on_next_image();
    }

    pub fn state(&self) -> RenderState {
        *self.shared.state()
    }

    /// Block until at least `frames` passes have completed since the last
    /// flush, or the timeout expires. Returns whether the count was reached.
    pub fn wait_for_frames(&self, frames: u64, timeout: Duration) -> bool {
        let guard = lock(&self.shared.progress);
        let (_guard, _) = self
            .shared
            .progress_signal
            .wait_timeout_while(guard, timeout, |_| self.shared.statistics.frames() < frames)
            .unwrap_or_else(PoisonError::into_inner);
        self.shared.statistics.frames() >= frames
    }

    /// End the render loop after the current pass and join its thread.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.shared.interrupted.store(true, Ordering::Release);
        self.shared.break_loop.store(true, Ordering::Release);
        // The loop may already be gone; joining is all that matters
        let _ = self.signals.send(Signal::Shutdown);
        if handle.join().is_err() {
            log::error!("Render thread panicked");
        }
        *self.shared.state() = RenderState::Waiting;
        log::debug!("Render loop shut down");
    }

    /// Runs with the renderer lock held, so no pass result of the old
    /// configuration can be published or counted afterwards.
    fn after_flush(&self, renderer: &Renderer) {
        self.shared.needs_flush.store(false, Ordering::Release);
        self.shared.statistics.reset();
        self.shared.publish(renderer.snapshot());
    }
}

impl Drop for ChromaCore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn render_loop(shared: &Shared, signals: &Receiver<Signal>) {
    log::debug!("Render loop: waiting");
    while let Ok(Signal::Start) = signals.recv() {
        if shared.interrupted.load(Ordering::Acquire) {
            break;
        }
        if let Err(err) = shared.renderer().validate_scene() {
            log::error!("Render loop: {}", err);
            *shared.state() = RenderState::Waiting;
            continue;
        }

        log::debug!("Render loop: rendering");
        loop {
            let continuous = {
                let mut renderer = shared.renderer();
                if shared.needs_flush.swap(false, Ordering::AcqRel) {
                    renderer.flush();
                    shared.statistics.reset();
                }
                let report = renderer.render_next_image();
                // Publish before releasing the renderer so a concurrent
                // flush always wins over this pass
                shared.publish(renderer.snapshot());
                shared.statistics.record(&report);
                renderer.settings().continuous
            };
            shared.notify_progress();

            let mut state = shared.state();
            let go_on = continuous
                && !shared.break_loop.load(Ordering::Acquire)
                && !shared.interrupted.load(Ordering::Acquire);
            if !go_on {
                *state = RenderState::Waiting;
                break;
            }
        }
        log::debug!("Render loop: waiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_factory::cornell_box_scene;
    use crate::settings::RenderMode;
    use chroma_core::{CameraDescriptor, GeometryRecord, MaterialRecord};
    use std::time::Instant;

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn settings() -> Settings {
        Settings::new(32, 32, RenderMode::MonteCarloPathTracer)
            .with_thread_count(2)
            .with_max_ray_depth(2)
            .with_continuous(false)
    }

    fn continuous_settings() -> Settings {
        settings().with_continuous(true)
    }

    fn wait_until_waiting(core: &ChromaCore) -> bool {
        let deadline = Instant::now() + TIMEOUT;
        while core.state() == RenderState::Rendering {
            if Instant::now() > deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }

    #[test]
    fn test_scene_without_lights_refuses_start() {
        let _ = env_logger::builder().is_test(true).try_init();

        let camera = CameraDescriptor::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, Vec3::NEG_Z, 0.035);
        let mut description = SceneDescription::new("dark", camera);
        let grey = description.add_material(MaterialRecord::diffuse("grey", Vec3::splat(0.5)));
        description.add_geometry(GeometryRecord::Triangle {
            p0: Vec3::new(-1.0, -1.0, 0.0),
            p1: Vec3::new(1.0, -1.0, 0.0),
            p2: Vec3::new(0.0, 1.0, 0.0),
            material: grey,
        });

        let core = ChromaCore::new(&description, settings()).unwrap();
        assert_eq!(core.start(), Err(SceneError::NoLightSources));
        assert_eq!(core.state(), RenderState::Waiting);
        assert!(!core.wait_for_frames(1, Duration::from_millis(50)));
        assert!(!core.has_changes());
        assert_eq!(core.current_frame(), Frame::blank(32, 32));
    }

    #[test]
    fn test_single_pass_when_not_continuous() {
        let core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();
        core.start().unwrap();

        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));

        let stats = core.statistics();
        assert_eq!(stats.frames, 1);
        assert!(stats.rays >= 32 * 32);

        assert!(core.has_changes());
        let frame = core.current_frame();
        assert!(!core.has_changes());
        assert!(frame.pixels.iter().any(|&b| b > 0));
    }

    #[test]
    fn test_stop_keeps_image() {
        let core = ChromaCore::new(&cornell_box_scene(), continuous_settings()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(3, TIMEOUT));

        core.stop();
        assert!(wait_until_waiting(&core));
        let frames = core.statistics().frames;
        let frame = core.current_frame();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(core.statistics().frames, frames);
        assert_eq!(core.current_frame(), frame);
        assert!(frame.pixels.iter().any(|&b| b > 0));
    }

    #[test]
    fn test_reinitialize_publishes_blank_frame() {
        let core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));

        let smaller = Settings {
            width: 16,
            height: 8,
            ..settings()
        };
        core.reinitialize(smaller).unwrap();
        assert_eq!(core.statistics().frames, 0);
        assert_eq!(core.current_frame(), Frame::blank(16, 8));
        assert_eq!(core.settings().width, 16);
    }

    #[test]
    fn test_camera_move_flushes_before_next_pass() {
        let core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));

        core.move_camera(Vec3::new(0.0, 0.0, -0.5), Vec3::ZERO);
        assert!(core.shared.needs_flush.load(Ordering::Acquire));
        core.start().unwrap();

        let deadline = Instant::now() + TIMEOUT;
        while core.shared.needs_flush.load(Ordering::Acquire) {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));

        // The flush reset the counters, so this is the first pass again
        assert_eq!(core.statistics().frames, 1);
        assert_eq!(core.shared.renderer().frame_index(), 1);
    }

    #[test]
    fn test_start_right_after_stop_keeps_rendering() {
        let core = ChromaCore::new(&cornell_box_scene(), continuous_settings()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(2, TIMEOUT));

        let frames = {
            // No pass can finish while the renderer is held
            let renderer = core.shared.renderer();
            core.stop();
            core.start().unwrap();
            renderer.frame_index()
        };

        assert!(core.wait_for_frames(frames + 3, TIMEOUT));
        assert_eq!(core.state(), RenderState::Rendering);

        core.stop();
        assert!(wait_until_waiting(&core));
    }

    #[test]
    fn test_repeated_start_queues_one_run() {
        let core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();
        {
            let _renderer = core.shared.renderer();
            core.start().unwrap();
            core.start().unwrap();
            core.start().unwrap();
            assert_eq!(core.state(), RenderState::Rendering);
        }

        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(core.state(), RenderState::Waiting);
        assert_eq!(core.statistics().frames, 1);
    }

    #[test]
    fn test_reinitialize_while_rendering_drops_stale_passes() {
        let core = ChromaCore::new(&cornell_box_scene(), continuous_settings()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(1, TIMEOUT));

        for round in 0..12u32 {
            let size = if round % 2 == 0 { 16 } else { 24 };
            let next = Settings {
                width: size,
                height: size,
                ..continuous_settings()
            };
            core.reinitialize(next).unwrap();
            assert_eq!(core.current_frame().width, size);

            thread::sleep(Duration::from_millis(2));
            let renderer = core.shared.renderer();
            assert_eq!(core.statistics().frames, renderer.frame_index());
            assert_eq!(core.current_frame(), renderer.snapshot());
        }

        core.stop();
        assert!(wait_until_waiting(&core));
    }

    #[test]
    fn test_replace_scene_refreshes_start_check() {
        let core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();

        let camera = CameraDescriptor::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, Vec3::NEG_Z, 0.035);
        let mut dark = SceneDescription::new("dark", camera);
        let grey = dark.add_material(MaterialRecord::diffuse("grey", Vec3::splat(0.5)));
        dark.add_geometry(GeometryRecord::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
            material: grey,
        });

        core.replace_scene(&dark).unwrap();
        assert_eq!(core.start(), Err(SceneError::NoLightSources));

        core.replace_scene(&cornell_box_scene()).unwrap();
        core.start().unwrap();
        assert!(core.wait_for_frames(1, TIMEOUT));
        assert!(wait_until_waiting(&core));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut core = ChromaCore::new(&cornell_box_scene(), settings()).unwrap();
        core.shutdown();
        core.shutdown();
        assert_eq!(core.state(), RenderState::Waiting);
    }
}
