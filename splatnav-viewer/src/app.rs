//! Windowed viewer application
//!
//! Owns the event loop and wires window input, the flight camera, the
//! navigation engine and the egui panels together. Per frame: input is
//! applied to the camera, the navigator ticks and writes the
//! authoritative pose, then scene and UI are drawn in one submit.

use std::sync::Arc;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use nalgebra::Point3;
use splatnav_core::{CameraPose, Error, Result};
use splatnav_nav::Navigator;

use crate::camera::{FlightInput, FlyCamera};
use crate::panels::{draw_panels, PanelState};
use crate::renderer::{path_overlay_vertices, RenderConfig, SceneRenderer, SceneVertex};

/// Multiplier mapping one wheel line to wheel pixels
const WHEEL_LINE_PIXELS: f32 = 40.0;

/// The interactive viewer application.
pub struct ViewerApp {
    navigator: Navigator,
    scene_points: Vec<SceneVertex>,
    panel_state: PanelState,
    input: FlightInput,
    title: String,
}

impl ViewerApp {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator,
            scene_points: Vec::new(),
            panel_state: PanelState::default(),
            input: FlightInput::default(),
            title: "splatnav viewer".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the point cloud drawn behind the path overlay
    pub fn set_scene_points(&mut self, points: &[Point3<f32>], color: [f32; 3]) {
        self.scene_points = points
            .iter()
            .map(|p| SceneVertex::new(p, color))
            .collect();
        log::info!("scene set with {} points", self.scene_points.len());
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Run the viewer until the window closes.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("failed to create window: {}", e)))?,
        );

        let mut renderer =
            pollster::block_on(SceneRenderer::new(window.clone(), RenderConfig::default()))?;

        let size = window.inner_size();
        let mut camera = FlyCamera::new(
            CameraPose::identity(),
            size.width as f32 / size.height.max(1) as f32,
        );

        let egui_ctx = egui::Context::default();
        let mut egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
        );
        let mut egui_renderer = egui_wgpu::Renderer::new(
            &renderer.gpu.device,
            renderer.surface_config.format,
            None,
            1,
        );

        let mut mouse_look = false;
        let mut last_cursor: Option<PhysicalPosition<f64>> = None;

        log::info!("viewer initialized");

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { event, .. } => {
                        let response = egui_state.on_window_event(&window, &event);
                        if response.repaint {
                            window.request_redraw();
                        }
                        if response.consumed {
                            return;
                        }

                        match event {
                            WindowEvent::CloseRequested => target.exit(),
                            WindowEvent::Resized(new_size) => {
                                renderer.resize(new_size);
                                camera.aspect_ratio =
                                    new_size.width as f32 / new_size.height.max(1) as f32;
                            }
                            WindowEvent::MouseInput { state, button, .. } => {
                                if button == MouseButton::Right {
                                    mouse_look = state == ElementState::Pressed;
                                }
                            }
                            WindowEvent::CursorMoved { position, .. } => {
                                if mouse_look {
                                    if let Some(last) = last_cursor {
                                        self.input.look_delta.0 +=
                                            (position.x - last.x) as f32;
                                        self.input.look_delta.1 +=
                                            (position.y - last.y) as f32;
                                    }
                                }
                                last_cursor = Some(position);
                            }
                            WindowEvent::MouseWheel { delta, .. } => {
                                let delta_y = match delta {
                                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PIXELS,
                                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                                };
                                self.navigator.handle_wheel(delta_y, &camera);
                            }
                            WindowEvent::KeyboardInput { event, .. } => {
                                let pressed = event.state == ElementState::Pressed;
                                match event.physical_key {
                                    PhysicalKey::Code(KeyCode::KeyW) => {
                                        self.input.forward = pressed
                                    }
                                    PhysicalKey::Code(KeyCode::KeyS) => {
                                        self.input.backward = pressed
                                    }
                                    PhysicalKey::Code(KeyCode::KeyA) => self.input.left = pressed,
                                    PhysicalKey::Code(KeyCode::KeyD) => self.input.right = pressed,
                                    PhysicalKey::Code(KeyCode::KeyE) => self.input.up = pressed,
                                    PhysicalKey::Code(KeyCode::KeyQ) => self.input.down = pressed,
                                    PhysicalKey::Code(KeyCode::KeyM) => {
                                        if pressed {
                                            self.navigator.cycle_mode();
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            WindowEvent::RedrawRequested => {
                                // Flight input first: moving the camera by
                                // hand engages free-fly for this frame.
                                if camera.apply_input(&mut self.input, self.navigator.settings())
                                {
                                    self.navigator.set_free_fly(true);
                                }

                                let fired = self.navigator.tick(&mut camera);
                                for hit in &fired {
                                    log::info!(
                                        "interaction '{}' fired at waypoint {:?}",
                                        hit.interaction.name,
                                        hit.waypoint
                                    );
                                }

                                // UI frame
                                let raw_input = egui_state.take_egui_input(&window);
                                let full_output = egui_ctx.run(raw_input, |ctx| {
                                    draw_panels(
                                        ctx,
                                        &mut self.navigator,
                                        &camera,
                                        &mut self.panel_state,
                                    );
                                });
                                egui_state.handle_platform_output(
                                    &window,
                                    full_output.platform_output,
                                );
                                let paint_jobs = egui_ctx
                                    .tessellate(full_output.shapes, full_output.pixels_per_point);
                                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                                    size_in_pixels: [
                                        renderer.surface_config.width,
                                        renderer.surface_config.height,
                                    ],
                                    pixels_per_point: full_output.pixels_per_point,
                                };
                                for (id, delta) in &full_output.textures_delta.set {
                                    egui_renderer.update_texture(
                                        &renderer.gpu.device,
                                        &renderer.gpu.queue,
                                        *id,
                                        delta,
                                    );
                                }

                                // Scene geometry for this frame
                                let waypoint_positions: Vec<Point3<f32>> = self
                                    .navigator
                                    .store()
                                    .iter()
                                    .map(|w| w.pose.position)
                                    .collect();
                                let overlay = path_overlay_vertices(
                                    self.navigator.path().points(),
                                    &waypoint_positions,
                                    &renderer.config,
                                );

                                renderer.update_camera(
                                    camera.view_matrix(),
                                    camera.projection_matrix(),
                                    camera.pose.position.coords,
                                );

                                let egui_renderer_ref = &mut egui_renderer;
                                let paint_jobs_ref = &paint_jobs;
                                let screen_ref = &screen_descriptor;
                                let result = renderer.render(
                                    &self.scene_points,
                                    &overlay,
                                    move |gpu, encoder, view| {
                                        let _ = egui_renderer_ref.update_buffers(
                                            &gpu.device,
                                            &gpu.queue,
                                            encoder,
                                            paint_jobs_ref,
                                            screen_ref,
                                        );
                                        let mut pass = encoder.begin_render_pass(
                                            &wgpu::RenderPassDescriptor {
                                                label: Some("ui pass"),
                                                color_attachments: &[Some(
                                                    wgpu::RenderPassColorAttachment {
                                                        view,
                                                        resolve_target: None,
                                                        ops: wgpu::Operations {
                                                            load: wgpu::LoadOp::Load,
                                                            store: wgpu::StoreOp::Store,
                                                        },
                                                    },
                                                )],
                                                depth_stencil_attachment: None,
                                                timestamp_writes: None,
                                                occlusion_query_set: None,
                                            },
                                        );
                                        egui_renderer_ref.render(
                                            &mut pass,
                                            paint_jobs_ref,
                                            screen_ref,
                                        );
                                    },
                                );
                                if let Err(e) = result {
                                    log::error!("render error: {}", e);
                                }

                                for id in &full_output.textures_delta.free {
                                    egui_renderer.free_texture(id);
                                }

                                window.request_redraw();
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("event loop error: {}", e)))?;

        Ok(())
    }
}
