//! Simulation builder and runner

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::canvas::DrawList;
use crate::color::Color;
use crate::config::EffectConfig;
use crate::error::SimulationError;
use crate::gpu::GpuState;
use crate::input::{Input, InputAction};
use crate::raster::{FontRasterizer, GlyphRasterizer};
use crate::state::{RebuildCallback, SimulationState};
use crate::time::{AnimationControl, FrameClock};

#[cfg(feature = "egui")]
use crate::gpu::egui_integration::EguiIntegration;
#[cfg(feature = "egui")]
use crate::panel::{ControlPanel, PanelAction};

/// The particle text effect.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// Simulation::new()
///     .with_text("rust")
///     .with_color(Color::rgb(0xf7, 0x4c, 0x00))
///     .on_rebuild(|count| println!("{count} particles"))
///     .run()?;
/// ```
pub struct Simulation {
    config: EffectConfig,
    rasterizer: Option<Box<dyn GlyphRasterizer>>,
    control: AnimationControl,
    on_rebuild: Option<RebuildCallback>,
}

impl Simulation {
    /// Create a simulation with the default config.
    pub fn new() -> Self {
        Self {
            config: EffectConfig::default(),
            rasterizer: None,
            control: AnimationControl::new(),
            on_rebuild: None,
        }
    }

    /// Create a simulation from a JSON config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        Ok(Self::new().with_config(EffectConfig::load(path)?))
    }

    /// Replace the whole config.
    pub fn with_config(mut self, config: EffectConfig) -> Self {
        self.config = config;
        self
    }

    /// Text shown at startup. Uppercased before rendering.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.config.text = text.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.config.color = color;
        self
    }

    /// Make particle attributes reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Render with this font file instead of the system sans-serif.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font = Some(path.into());
        self
    }

    /// Use a custom rasterizer. Overrides the font setting.
    pub fn with_rasterizer(mut self, rasterizer: impl GlyphRasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    /// Called with the particle count after every rebuild.
    pub fn on_rebuild<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_rebuild = Some(Box::new(callback));
        self
    }

    /// A handle that starts and stops the animation from any thread.
    pub fn control(&self) -> AnimationControl {
        self.control.clone()
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Run the simulation. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        let rasterizer = match self.rasterizer {
            Some(rasterizer) => rasterizer,
            None => Box::new(FontRasterizer::new(self.config.font.as_deref())?),
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config, rasterizer, self.control, self.on_rebuild);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Waiting for the window: everything `SimulationState` is built from.
struct Pending {
    config: EffectConfig,
    rasterizer: Box<dyn GlyphRasterizer>,
    on_rebuild: Option<RebuildCallback>,
}

struct App {
    pending: Option<Pending>,
    control: AnimationControl,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    state: Option<SimulationState>,
    input: Input,
    clock: FrameClock,
    draw_list: DrawList,
    was_running: bool,
    title_dirty: bool,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    #[cfg(feature = "egui")]
    panel: ControlPanel,
    error: Option<SimulationError>,
}

impl App {
    fn new(
        config: EffectConfig,
        rasterizer: Box<dyn GlyphRasterizer>,
        control: AnimationControl,
        on_rebuild: Option<RebuildCallback>,
    ) -> Self {
        let mut input = Input::new(config.touch_input);
        input.set_draft(&config.text);

        Self {
            input,
            #[cfg(feature = "egui")]
            panel: ControlPanel::new(&config.text, config.color),
            pending: Some(Pending {
                config,
                rasterizer,
                on_rebuild,
            }),
            was_running: control.is_running(),
            control,
            window: None,
            gpu_state: None,
            state: None,
            clock: FrameClock::new(),
            draw_list: DrawList::new(),
            title_dirty: true,
            #[cfg(feature = "egui")]
            egui: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let window_attrs = Window::default_attributes()
            .with_title("textdust")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        let scale_factor = window.scale_factor();
        self.input.set_scale_factor(scale_factor);
        let (width, height) = logical_size(window.inner_size(), scale_factor);

        let mut state = SimulationState::new(pending.config, pending.rasterizer, width, height);
        if let Some(callback) = pending.on_rebuild {
            state.set_on_rebuild(callback);
        }

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(
                gpu_state.device(),
                gpu_state.format(),
                &window,
            ));
        }

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.state = Some(state);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SimulationError) {
        tracing::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::PointerMoved(position) => {
                if let Some(state) = &mut self.state {
                    state.pointer_moved(position);
                }
            }
            InputAction::PointerReleased => {
                if let Some(state) = &mut self.state {
                    state.pointer_released();
                }
            }
            InputAction::Submit(text) => {
                if self.state.as_mut().is_some_and(|state| state.submit_text(&text)) {
                    self.title_dirty = true;
                }
            }
            InputAction::DraftChanged => {
                #[cfg(feature = "egui")]
                self.panel.set_text(self.input.draft());
            }
            InputAction::TogglePause => {
                let running = self.control.toggle();
                tracing::info!("{}", if running { "Resumed" } else { "Paused" });
                self.title_dirty = true;
            }
        }
    }

    #[cfg(feature = "egui")]
    fn apply_panel(&mut self, action: PanelAction) {
        match action {
            PanelAction::Edit(text) => self.input.set_draft(&text),
            PanelAction::Submit(text) => {
                self.input.set_draft(&text);
                if let Some(state) = &mut self.state {
                    state.submit_text(&text);
                    self.title_dirty = true;
                }
            }
            PanelAction::SetColor(color) => {
                if let Some(state) = &mut self.state {
                    state.set_color(color);
                    self.title_dirty = true;
                }
            }
        }
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.resize(size);
        }
        let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        self.input.set_scale_factor(scale_factor);
        if let Some(state) = &mut self.state {
            let (width, height) = logical_size(size, scale_factor);
            if state.viewport() != (width, height) {
                state.resize(width, height);
                self.title_dirty = true;
            } else {
                // The trail texture was recreated empty.
                state.invalidate();
            }
        }
    }

    fn update_title(&mut self) {
        let (Some(window), Some(state)) = (&self.window, &self.state) else {
            return;
        };
        let paused = if self.control.is_running() { "" } else { " [paused]" };
        window.set_title(&format!(
            "textdust - {} - {} particles - {:.0} fps{}",
            state.text(),
            state.particle_count(),
            self.clock.fps(),
            paused
        ));
        self.title_dirty = false;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let running = self.control.is_running();
        if running && !self.was_running {
            self.clock.resume();
            self.title_dirty = true;
        }
        self.was_running = running;

        self.draw_list.reset();
        if running {
            if let Some(state) = &mut self.state {
                state.tick(&mut self.draw_list);
            }
            if self.clock.tick() {
                self.title_dirty = true;
            }
        } else if let Some(state) = self.state.as_mut().filter(|s| s.needs_repaint()) {
            state.paint_still(&mut self.draw_list);
        }

        #[cfg(feature = "egui")]
        let egui_output = match (&mut self.egui, &self.window, &self.state) {
            (Some(egui), Some(window), Some(state)) => {
                let panel = &mut self.panel;
                let count = state.particle_count();
                let mut action = None;
                let output = egui.run(window, |ctx| {
                    action = panel.show(ctx, count, !running);
                });
                Some((output, action))
            }
            _ => None,
        };
        #[cfg(feature = "egui")]
        let egui_output = egui_output.map(|(output, action)| {
            if let Some(action) = action {
                self.apply_panel(action);
            }
            output
        });

        if self.title_dirty {
            self.update_title();
        }

        let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) else {
            return;
        };
        let size = window.inner_size();
        let logical = size.to_logical::<f32>(window.scale_factor());

        match gpu_state.begin_frame() {
            Ok(mut frame) => {
                gpu_state.draw(&mut frame, &self.draw_list, [logical.width, logical.height]);

                #[cfg(feature = "egui")]
                {
                    if let (Some(egui), Some(output)) = (&mut self.egui, egui_output) {
                        egui.paint(
                            gpu_state.device(),
                            gpu_state.queue(),
                            &mut frame,
                            [gpu_state.config.width, gpu_state.config.height],
                            output,
                        );
                    }
                }

                gpu_state.finish(frame);
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("Surface lost, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("Out of GPU memory");
                event_loop.exit();
            }
            Err(e) => tracing::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
                return;
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let (consumed, over_panel) = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => {
                let consumed = egui.on_window_event(window, &event);
                (consumed, egui.wants_pointer())
            }
            _ => (false, false),
        };
        #[cfg(not(feature = "egui"))]
        let (consumed, over_panel) = (false, false);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.input.set_scale_factor(scale_factor);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ if consumed => {}
            _ => {
                if let Some(action) = self.input.handle_event(&event) {
                    self.apply(action);
                }
                // A pointer over the panel does not scatter the text behind it.
                if over_panel {
                    self.apply(InputAction::PointerReleased);
                }
            }
        }
    }
}

fn logical_size(size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical = size.to_logical::<f64>(scale_factor);
    (logical.width.round() as u32, logical.height.round() as u32)
}

#[cfg(all(test, feature = "egui"))]
mod tests {
    use super::*;
    use crate::raster::BlockRasterizer;

    fn app() -> App {
        App::new(
            EffectConfig::default(),
            Box::new(BlockRasterizer),
            AnimationControl::new(),
            None,
        )
    }

    fn type_text(app: &mut App, text: &str) {
        if let Some(action) = app.input.type_text(text) {
            app.apply(action);
        }
    }

    #[test]
    fn test_draft_starts_from_initial_text() {
        let app = app();
        assert_eq!(app.input.draft(), "HELLO");
        assert_eq!(app.panel.text(), "HELLO");
    }

    #[test]
    fn test_keyboard_and_panel_stay_in_sync() {
        let mut app = app();

        type_text(&mut app, "!");
        assert_eq!(app.panel.text(), "HELLO!");

        app.apply_panel(PanelAction::Edit("hi".into()));
        assert_eq!(app.input.draft(), "hi");

        type_text(&mut app, "x");
        assert_eq!(app.input.draft(), "hix");
        assert_eq!(app.panel.text(), "hix");

        app.apply_panel(PanelAction::Submit("rust".into()));
        assert_eq!(app.input.draft(), "rust");
    }
}
