//! Blaster Range -- host loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Each `RedrawRequested`:
//!
//!   1. measures the frame (`FrameTimer`) and converts it to a frame-relative delta
//!   2. routes keyboard shortcuts and queued pointer presses into the scene manager
//!   3. ticks the active scene with the capped delta
//!   4. clears the surface, paints the scene view and debug window with egui
//!   5. applies the button actions egui reported for this frame
//!
//! Gameplay timing itself is wall-clock driven inside the session; the frame
//! delta only moves targets.

mod config;
#[cfg(test)]
mod replay;
mod scene;
mod scene_manager;
mod scenes;
mod session;
mod spawn;
mod target;
mod weapons;

use std::path::Path;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use br_core::input::{InputState, Key, MouseBtn, PointerDown};
use br_core::resources::{load_catalog_from_path, ResourceCatalog};
use br_core::time::{FrameTimer, SystemClock};
use br_core::viewport::SharedViewport;
use br_platform::window::PlatformConfig;
use br_render::{GpuContext, RANGE_CLEAR_COLOR};
use br_ui::{DebugStats, RangeOverlay};

use config::load_config_or_default;
use scene::{SceneAction, SceneEnv, SceneError, SceneParams, SceneRegistry};
use scene_manager::SceneManager;
use session::SessionState;
use weapons::load_weapons_or_builtin;

const CONFIG_PATH: &str = "assets/config/game.json";
const WEAPONS_PATH: &str = "assets/data/weapons.json";
const MANIFEST_PATH: &str = "assets/manifest.json";
const START_SCENE: &str = "intro";

/// Everything that needs the window and GPU. Built in `resumed`.
struct RangeState {
    window: Arc<Window>,
    gpu: GpuContext,
    frame_timer: FrameTimer,
    input: InputState,
    viewport: SharedViewport,
    overlay: RangeOverlay,
    /// Same catalog the scenes query, kept here for texture uploads.
    catalog: ResourceCatalog,
    manager: SceneManager,
}

impl RangeState {
    fn new(window: Arc<Window>) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let overlay = RangeOverlay::new(&gpu.device, gpu.surface_format, &window);

        let config = load_config_or_default(Path::new(CONFIG_PATH));
        let weapons = load_weapons_or_builtin(Path::new(WEAPONS_PATH));
        let catalog = load_catalog_or_empty(Path::new(MANIFEST_PATH));
        log::info!(
            "Content: {} weapons, {} resources",
            weapons.len(),
            catalog.len()
        );

        let viewport = SharedViewport::new(gpu.size.0 as f32, gpu.size.1 as f32);
        let frame_timer = FrameTimer::new(
            f64::from(config.session.nominal_fps),
            f64::from(config.session.max_frame_delta),
        );
        let env = SceneEnv {
            viewport: Box::new(viewport.clone()),
            resources: Box::new(catalog.clone()),
            clock: Box::new(SystemClock::new()),
            weapons,
            config,
        };
        let mut manager = SceneManager::new(env, SceneRegistry::standard());
        manager
            .change_scene(START_SCENE, SceneParams::none())
            .map_err(|e| format!("Failed to open the first scene: {e}"))?;

        Ok(Self {
            window,
            gpu,
            frame_timer,
            input: InputState::new(),
            viewport,
            overlay,
            catalog,
            manager,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.viewport.set(width as f32, height as f32);
            self.manager.on_viewport_resize();
            log::info!("Resized to {}x{}", width, height);
        }
    }

    fn frame(&mut self) -> Result<(), SceneError> {
        let dt = self.frame_timer.begin_frame() as f32;

        if self.input.is_just_pressed(Key::F3) {
            self.overlay.toggle_debug();
        }
        for (key, action) in KEY_ACTIONS {
            if self.input.is_just_pressed(*key) {
                self.manager.trigger(*action)?;
            }
        }
        let presses: Vec<PointerDown> = self.input.drain_pointer_downs().collect();
        for press in presses {
            self.manager.pointer_down(press.x, press.y)?;
        }
        self.input.end_frame();

        self.manager.tick(dt)?;

        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return Ok(());
        }
        let Some((output, view)) = self.gpu.begin_frame() else {
            return Ok(());
        };

        let scene_view = self.manager.view();
        let stats = self.debug_stats();
        let prepared = self
            .overlay
            .prepare(&self.window, scene_view.as_ref(), &self.catalog, &stats);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let mut encoder = self.gpu.create_encoder();
        self.gpu.clear(&mut encoder, &view, RANGE_CLEAR_COLOR);
        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &prepared,
            &screen_descriptor,
        );
        self.overlay
            .paint(&mut encoder, &view, &prepared, &screen_descriptor);
        self.gpu.submit(encoder, output);
        self.overlay.cleanup(&prepared);

        // Clicks land after the frame that showed the button.
        for action in &prepared.actions {
            self.manager.trigger(*action)?;
        }
        if prepared.debug.end_session {
            self.manager.trigger(SceneAction::EndSession)?;
        }
        Ok(())
    }

    fn debug_stats(&self) -> DebugStats {
        let report = self.manager.session_report();
        let session_lines = report
            .map(|report| {
                vec![
                    format!("Session: {}", report.state.label()),
                    format!("Score: {}", report.stats.score),
                    format!("Remaining: {:.1} s", report.stats.remaining_ms / 1000.0),
                    format!("Live targets: {}", report.stats.live_targets),
                    format!(
                        "Spawned / hit / culled: {} / {} / {}",
                        report.stats.spawned, report.stats.hits, report.stats.culled
                    ),
                ]
            })
            .unwrap_or_default();
        DebugStats {
            fps: self.frame_timer.smoothed_fps,
            frame_time_ms: self.frame_timer.smoothed_frame_time_ms,
            frame_count: self.frame_timer.frame_count,
            scene_label: self
                .manager
                .active_key()
                .map_or_else(|| "-".to_string(), |key| key.to_string()),
            transitions: self.manager.transition_count(),
            session_lines,
            session_running: report.is_some_and(|r| r.state == SessionState::Running),
        }
    }
}

const KEY_ACTIONS: &[(Key, SceneAction)] = &[
    (Key::Escape, SceneAction::Back),
    (Key::Left, SceneAction::Previous),
    (Key::Right, SceneAction::Next),
    (Key::Enter, SceneAction::SelectCurrent),
    (Key::Space, SceneAction::SelectCurrent),
];

struct App {
    config: PlatformConfig,
    state: Option<RangeState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = br_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        match RangeState::new(window) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.manager.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                state.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        // Presses egui takes (buttons, debug window) never reach the play field.
                        ElementState::Pressed if !egui_consumed => state.input.mouse_down(btn),
                        ElementState::Pressed => {}
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = state.frame() {
                    log::error!("Fatal scene error: {err}");
                    state.manager.shutdown();
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn load_catalog_or_empty(path: &Path) -> ResourceCatalog {
    if !path.exists() {
        log::warn!(
            "Resource manifest '{}' not found, running without images",
            path.display()
        );
        return ResourceCatalog::new();
    }
    load_catalog_from_path(path).unwrap_or_else(|err| {
        log::error!("{err}; running without images");
        ResourceCatalog::new()
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Blaster Range starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
