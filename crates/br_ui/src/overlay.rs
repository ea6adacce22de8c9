//! egui integration: the scene view and the debug window share one egui
//! context and one renderer.
//!
//! egui needs a split render because `egui_wgpu::Renderer::render()` wants a
//! `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run the UI, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a pass made with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use winit::window::Window;

use br_core::resources::ResourceCatalog;
use br_core::view::SceneView;

use crate::debug_panel::{show_debug_window, DebugActions, DebugStats};
use crate::painter::paint_scene;
use crate::textures::TextureCache;

pub struct PreparedFrame<A> {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub actions: Vec<A>,
    pub debug: DebugActions,
}

pub struct RangeOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    textures: TextureCache,
    pub debug_visible: bool,
}

impl RangeOverlay {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            textures: TextureCache::new(),
            debug_visible: false,
        }
    }

    /// Feeds a window event to egui. Returns true when egui wants it for
    /// itself (a press on a button, typing into a widget).
    pub fn handle_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_winit_state.on_window_event(window, event).consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!("Debug overlay: {}", if self.debug_visible { "ON" } else { "OFF" });
    }

    pub fn prepare<A: Clone>(
        &mut self,
        window: &Window,
        view: Option<&SceneView<A>>,
        catalog: &ResourceCatalog,
        stats: &DebugStats,
    ) -> PreparedFrame<A> {
        let mut actions = Vec::new();
        let mut debug = DebugActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let textures = &mut self.textures;
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(view) = view {
                actions = paint_scene(ctx, view, textures, catalog);
            }
            if debug_visible {
                debug = show_debug_window(ctx, stats);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        PreparedFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            actions,
            debug,
        }
    }

    /// Upload textures and update buffers. Call before creating the egui pass.
    pub fn upload<A>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &PreparedFrame<A>,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(device, queue, encoder, &frame.primitives, screen_descriptor);
    }

    /// Records the egui pass on top of whatever `view` already holds.
    pub fn paint<A>(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &PreparedFrame<A>,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        self.egui_renderer
            .render(&mut pass, &frame.primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after submitting.
    pub fn cleanup<A>(&mut self, frame: &PreparedFrame<A>) {
        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
