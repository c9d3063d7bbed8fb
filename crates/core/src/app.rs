//! Application state and the color controller.
//!
//! `App` owns the backend and everything created on it, plus the current
//! color and viewport. Every mutation of color or viewport funnels into
//! [`App::render`], so a frame is always a function of the current state.

use crate::backend::GlBackend;
use crate::color::Rgba;
use crate::config::AppConfig;
use crate::controls::Control;
use crate::error::SwatchError;
use crate::geometry::{GeometryBuffer, QUAD_VERTICES};
use crate::scene;
use crate::shader::{build_program, ShaderProgram};
use crate::viewport::{self, Surface, Viewport};

pub struct App<B: GlBackend> {
    gl: B,
    program: ShaderProgram<B>,
    geometry: GeometryBuffer<B>,
    color: Rgba,
    viewport: Viewport,
    redraw_on_resize: bool,
    frames: u64,
}

impl<B: GlBackend> App<B> {
    /// Sizes the surface to `window`, builds the program, uploads the
    /// rectangle and renders the first frame in opaque white.
    ///
    /// # Errors
    ///
    /// Any shader, uniform, attribute or buffer failure. Nothing is drawn
    /// when this returns an error.
    pub fn start<S>(
        gl: B,
        surface: &mut S,
        window: Viewport,
        config: &AppConfig,
    ) -> Result<Self, SwatchError>
    where
        S: Surface + ?Sized,
    {
        let viewport = viewport::resize(surface, window, Some(&gl));
        let program = build_program(&gl)?;
        let geometry = GeometryBuffer::upload(&gl, program.program(), &QUAD_VERTICES)?;

        let mut app = Self {
            gl,
            program,
            geometry,
            color: Rgba::WHITE,
            viewport,
            redraw_on_resize: config.redraw_on_resize,
            frames: 0,
        };
        app.render();
        log::info!(
            "scene ready at {}x{}",
            app.viewport.width,
            app.viewport.height
        );
        Ok(app)
    }

    /// Draws one frame with the current color.
    pub fn render(&mut self) {
        scene::render(&self.gl, &self.program, &self.geometry, self.color);
        self.frames += 1;
    }

    /// Replaces the color with `(r, g, b, 1.0)` and redraws. Values are not
    /// range-checked.
    pub fn set_color(&mut self, r: f32, g: f32, b: f32) {
        self.color = Rgba::opaque(r, g, b);
        log::info!("color set to {:?}", self.color.to_array());
        self.render();
    }

    /// Back to opaque white, then redraws.
    pub fn reset_color(&mut self) {
        self.color = Rgba::WHITE;
        log::info!("color reset");
        self.render();
    }

    pub fn press(&mut self, control: Control) {
        control.apply(self);
    }

    /// Follows a window resize. Redraws afterwards when the app was started
    /// with `redraw_on_resize`.
    pub fn resize<S>(&mut self, surface: &mut S, window: Viewport)
    where
        S: Surface + ?Sized,
    {
        self.viewport = viewport::resize(surface, window, Some(&self.gl));
        if self.redraw_on_resize {
            self.render();
        }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames rendered since start, including the first one.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn gl(&self) -> &B {
        &self.gl
    }
}
