//! A CPU implementation of [`GlBackend`].
//!
//! There is no GLSL compiler here. A shader "compiles" when it defines
//! `main`, and its `attribute`/`uniform` declarations are read off the
//! source so that location lookups behave like a driver's. Drawing
//! rasterizes triangle strips from the first enabled attribute, filling
//! with the first uniform the fragment stage declares, which covers a
//! flat-color pipeline.
//!
//! The framebuffer is RGBA `f32`, row 0 at the bottom as in GL. Clones
//! share the same context, so one handle can be the surface while another
//! is owned by the app.

use crate::backend::{GlBackend, ShaderStage};
use crate::color::Rgba;
use crate::error::SwatchError;
use crate::viewport::{Surface, Viewport};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Handle to a shader, program or buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// A uniform slot within one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    program: usize,
    index: usize,
}

struct ShaderObject {
    stage: ShaderStage,
    compiled: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<usize>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
    fill_uniform: Option<usize>,
    values: HashMap<usize, [f32; 4]>,
}

#[derive(Clone, Copy)]
struct AttribPointer {
    buffer: usize,
    components: i32,
}

struct State {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    viewport: [i32; 4],
    clear: [f32; 4],
    shaders: HashMap<usize, ShaderObject>,
    programs: HashMap<usize, ProgramObject>,
    buffers: HashMap<usize, Vec<f32>>,
    next_id: usize,
    array_buffer: Option<usize>,
    pointers: HashMap<u32, AttribPointer>,
    enabled: HashSet<u32>,
    current: Option<usize>,
}

impl State {
    fn alloc_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Largest framebuffer, in pixels, the backend allocates (8192 × 8192).
pub const MAX_PIXELS: usize = 1 << 26;

/// Pixel count for a `width`×`height` framebuffer, or `None` when the
/// product overflows or exceeds [`MAX_PIXELS`].
fn framebuffer_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)
        .filter(|&n| n <= MAX_PIXELS)
}

#[derive(Clone)]
pub struct SoftwareBackend {
    state: Rc<RefCell<State>>,
}

impl SoftwareBackend {
    /// A context with a `width`×`height` framebuffer of transparent black
    /// and the viewport covering all of it.
    ///
    /// # Errors
    ///
    /// `SwatchError::InvalidDimensions` when either side is zero or the
    /// area exceeds [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32) -> Result<Self, SwatchError> {
        let len = framebuffer_len(width, height)
            .filter(|&n| n > 0)
            .ok_or(SwatchError::InvalidDimensions { width, height })?;
        Ok(Self {
            state: Rc::new(RefCell::new(State {
                width,
                height,
                pixels: vec![[0.0; 4]; len],
                viewport: [0, 0, clamp_i32(width), clamp_i32(height)],
                clear: [0.0; 4],
                shaders: HashMap::new(),
                programs: HashMap::new(),
                buffers: HashMap::new(),
                next_id: 0,
                array_buffer: None,
                pointers: HashMap::new(),
                enabled: HashSet::new(),
                current: None,
            })),
        })
    }

    pub fn size(&self) -> Viewport {
        let state = self.state.borrow();
        Viewport::new(state.width, state.height)
    }

    /// The color at `(x, y)`, origin bottom-left.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let state = self.state.borrow();
        (x < state.width && y < state.height)
            .then(|| Rgba::from(state.pixels[state.pixel_index(x, y)]))
    }

    /// The framebuffer as 8-bit RGBA, rows top to bottom.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let state = self.state.borrow();
        let width = state.width as usize;
        if width == 0 {
            return Vec::new();
        }
        state
            .pixels
            .chunks(width)
            .rev()
            .flatten()
            .flat_map(|&p| Rgba::from(p).to_rgba8())
            .collect()
    }

    fn fill_triangle(state: &mut State, tri: [[f32; 2]; 3], color: [f32; 4]) {
        let [x0, y0, w, h] = state.viewport.map(|v| v as f32);
        let to_window = |[x, y]: [f32; 2]| [x0 + (x + 1.0) * 0.5 * w, y0 + (y + 1.0) * 0.5 * h];
        let [a, b, c] = tri.map(to_window);

        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }

        // Clip to both the viewport and the framebuffer.
        let min_x = a[0].min(b[0]).min(c[0]).max(x0).max(0.0).floor() as u32;
        let min_y = a[1].min(b[1]).min(c[1]).max(y0).max(0.0).floor() as u32;
        let max_x = (a[0].max(b[0]).max(c[0]).min(x0 + w).ceil().max(0.0) as u32).min(state.width);
        let max_y = (a[1].max(b[1]).max(c[1]).min(y0 + h).ceil().max(0.0) as u32).min(state.height);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let p = [px as f32 + 0.5, py as f32 + 0.5];
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if inside {
                    let i = state.pixel_index(px, py);
                    state.pixels[i] = color;
                }
            }
        }
    }
}

/// Twice the signed area of `(a, b, p)`.
fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Names declared with `qualifier` at the start of a line, e.g.
/// `uniform vec4 uColor;` yields `uColor`.
fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut tokens = line.trim().trim_end_matches(';').split_whitespace();
            (tokens.next() == Some(qualifier))
                .then(|| tokens.last())
                .flatten()
                .map(String::from)
        })
        .collect()
}

impl Surface for SoftwareBackend {
    /// Reallocates the framebuffer; contents reset to transparent black as
    /// a canvas does when resized. A size over [`MAX_PIXELS`] is refused and
    /// the current framebuffer kept; drawing is clipped to it.
    fn set_size(&mut self, width: u32, height: u32) {
        let Some(len) = framebuffer_len(width, height) else {
            log::warn!("framebuffer {width}x{height} exceeds {MAX_PIXELS} pixels, size unchanged");
            return;
        };
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
        state.pixels = vec![[0.0; 4]; len];
    }
}

impl GlBackend for SoftwareBackend {
    type Shader = ObjectId;
    type Program = ObjectId;
    type Buffer = ObjectId;
    type UniformLocation = UniformSlot;

    fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId, String> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.shaders.insert(
            id,
            ShaderObject {
                stage,
                compiled: false,
                log: String::new(),
                attributes: Vec::new(),
                uniforms: Vec::new(),
            },
        );
        Ok(ObjectId(id))
    }

    fn compile_shader(&self, shader: ObjectId, source: &str) {
        let mut state = self.state.borrow_mut();
        let Some(obj) = state.shaders.get_mut(&shader.0) else {
            return;
        };
        obj.compiled = source.contains("void main");
        obj.log = if obj.compiled {
            String::new()
        } else {
            "ERROR: 0:0: 'main' : function not defined".to_string()
        };
        obj.attributes = match obj.stage {
            ShaderStage::Vertex => declarations(source, "attribute"),
            ShaderStage::Fragment => Vec::new(),
        };
        obj.uniforms = declarations(source, "uniform");
    }

    fn shader_compile_status(&self, shader: ObjectId) -> bool {
        let state = self.state.borrow();
        state.shaders.get(&shader.0).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        let state = self.state.borrow();
        state
            .shaders
            .get(&shader.0)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ObjectId) {
        self.state.borrow_mut().shaders.remove(&shader.0);
    }

    fn create_program(&self) -> Result<ObjectId, String> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.programs.insert(id, ProgramObject::default());
        Ok(ObjectId(id))
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.0) {
            p.attached.push(shader.0);
        }
    }

    fn detach_shader(&self, program: ObjectId, shader: ObjectId) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.0) {
            p.attached.retain(|&s| s != shader.0);
        }
    }

    fn link_program(&self, program: ObjectId) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(p) = state.programs.get_mut(&program.0) else {
            return;
        };

        let stage = |wanted: ShaderStage| {
            let mut found = p
                .attached
                .iter()
                .filter_map(|id| state.shaders.get(id))
                .filter(|s| s.stage == wanted);
            match (found.next(), found.next()) {
                (Some(s), None) if s.compiled => Some(s),
                _ => None,
            }
        };

        match (stage(ShaderStage::Vertex), stage(ShaderStage::Fragment)) {
            (Some(vert), Some(frag)) => {
                let mut uniforms = vert.uniforms.clone();
                for u in &frag.uniforms {
                    if !uniforms.contains(u) {
                        uniforms.push(u.clone());
                    }
                }
                let fill_uniform = frag
                    .uniforms
                    .first()
                    .and_then(|name| uniforms.iter().position(|u| u == name));
                let attributes = vert.attributes.clone();

                p.linked = true;
                p.log.clear();
                p.attributes = attributes;
                p.uniforms = uniforms;
                p.fill_uniform = fill_uniform;
                p.values.clear();
            }
            _ => {
                p.linked = false;
                p.log = "ERROR: one compiled vertex and one compiled fragment shader required"
                    .to_string();
            }
        }
    }

    fn program_link_status(&self, program: ObjectId) -> bool {
        let state = self.state.borrow();
        state.programs.get(&program.0).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        let state = self.state.borrow();
        state
            .programs
            .get(&program.0)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ObjectId) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program.0);
        if state.current == Some(program.0) {
            state.current = None;
        }
    }

    fn use_program(&self, program: Option<ObjectId>) {
        self.state.borrow_mut().current = program.map(|p| p.0);
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> Option<UniformSlot> {
        let state = self.state.borrow();
        let p = state.programs.get(&program.0).filter(|p| p.linked)?;
        let index = p.uniforms.iter().position(|u| u == name)?;
        Some(UniformSlot {
            program: program.0,
            index,
        })
    }

    fn attrib_location(&self, program: ObjectId, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let p = state.programs.get(&program.0).filter(|p| p.linked)?;
        p.attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn create_buffer(&self) -> Result<ObjectId, String> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        state.buffers.insert(id, Vec::new());
        Ok(ObjectId(id))
    }

    fn bind_array_buffer(&self, buffer: Option<ObjectId>) {
        self.state.borrow_mut().array_buffer = buffer.map(|b| b.0);
    }

    fn upload_static_f32(&self, data: &[f32]) {
        let mut state = self.state.borrow_mut();
        if let Some(bound) = state.array_buffer {
            state.buffers.insert(bound, data.to_vec());
        }
    }

    fn vertex_attrib_f32(&self, index: u32, components: i32) {
        let mut state = self.state.borrow_mut();
        if let Some(buffer) = state.array_buffer {
            state
                .pointers
                .insert(index, AttribPointer { buffer, components });
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state.borrow_mut().enabled.insert(index);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = [x, y, width, height];
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().clear = [r, g, b, a];
    }

    fn clear_color_buffer(&self) {
        let mut state = self.state.borrow_mut();
        let clear = state.clear;
        state.pixels.fill(clear);
    }

    fn uniform_4f(&self, location: &UniformSlot, value: [f32; 4]) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&location.program) {
            p.values.insert(location.index, value);
        }
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let Some(program) = state.current.and_then(|id| state.programs.get(&id)) else {
            log::warn!("draw without a current program");
            return;
        };
        if !program.linked {
            log::warn!("draw with an unlinked program");
            return;
        }
        let color = program
            .fill_uniform
            .and_then(|i| program.values.get(&i).copied())
            .unwrap_or([0.0; 4]);

        let Some(pointer) = (0..program.attributes.len() as u32)
            .filter(|i| state.enabled.contains(i))
            .find_map(|i| state.pointers.get(&i).copied())
        else {
            log::warn!("draw without an enabled position attribute");
            return;
        };
        let Some(data) = state.buffers.get(&pointer.buffer) else {
            return;
        };

        let stride = pointer.components.max(1) as usize;
        let (Ok(first), Ok(count)) = (usize::try_from(first), usize::try_from(count)) else {
            return;
        };
        if (first + count) * stride > data.len() {
            log::warn!("draw range exceeds the bound buffer");
            return;
        }

        let vertices: Vec<[f32; 2]> = (first..first + count)
            .map(|v| {
                let base = v * stride;
                let y = if stride > 1 { data[base + 1] } else { 0.0 };
                [data[base], y]
            })
            .collect();

        for tri in vertices.windows(3) {
            Self::fill_triangle(state, [tri[0], tri[1], tri[2]], color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::config::AppConfig;
    use crate::controls::Control;
    use crate::shader::{compile_program, FRAGMENT_SHADER, VERTEX_SHADER};

    fn start(width: u32, height: u32) -> (App<SoftwareBackend>, SoftwareBackend) {
        let backend = SoftwareBackend::new(width, height).unwrap();
        let mut surface = backend.clone();
        let app = App::start(
            backend.clone(),
            &mut surface,
            Viewport::new(width, height),
            &AppConfig::default(),
        )
        .unwrap();
        (app, backend)
    }

    fn count_color(backend: &SoftwareBackend, color: Rgba) -> usize {
        let size = backend.size();
        (0..size.height)
            .flat_map(|y| (0..size.width).map(move |x| (x, y)))
            .filter(|&(x, y)| backend.pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn declarations_reads_names() {
        assert_eq!(declarations(VERTEX_SHADER, "attribute"), vec!["aVertexPosition"]);
        assert_eq!(declarations(FRAGMENT_SHADER, "uniform"), vec!["uColor"]);
        assert!(declarations(FRAGMENT_SHADER, "attribute").is_empty());
    }

    #[test]
    fn source_without_main_fails_to_compile() {
        let gl = SoftwareBackend::new(1, 1).unwrap();
        let err = compile_program(&gl, "attribute vec4 a;", FRAGMENT_SHADER).unwrap_err();
        assert!(format!("{err}").contains("'main'"), "got: {err}");
    }

    #[test]
    fn white_rectangle_centered_on_black_after_start() {
        let (_app, backend) = start(200, 100);

        // 0.7 * 200 columns by 0.5 * 100 rows
        assert_eq!(count_color(&backend, Rgba::WHITE), 140 * 50);
        assert_eq!(count_color(&backend, Rgba::BLACK), 200 * 100 - 140 * 50);

        assert_eq!(backend.pixel(100, 50), Some(Rgba::WHITE));
        assert_eq!(backend.pixel(30, 25), Some(Rgba::WHITE));
        assert_eq!(backend.pixel(169, 74), Some(Rgba::WHITE));
        assert_eq!(backend.pixel(29, 50), Some(Rgba::BLACK));
        assert_eq!(backend.pixel(170, 50), Some(Rgba::BLACK));
        assert_eq!(backend.pixel(100, 24), Some(Rgba::BLACK));
        assert_eq!(backend.pixel(100, 75), Some(Rgba::BLACK));
    }

    #[test]
    fn maroon_fills_the_rectangle_exactly() {
        let (mut app, backend) = start(64, 64);
        app.press(Control::Maroon);

        let maroon = Rgba::new(0.5, 0.0, 0.0, 1.0);
        assert_eq!(backend.pixel(32, 32), Some(maroon));
        assert_eq!(count_color(&backend, Rgba::WHITE), 0);
        assert!(count_color(&backend, maroon) > 0);
    }

    #[test]
    fn tosca_then_reset_is_white_again() {
        let (mut app, backend) = start(64, 64);
        app.press(Control::Tosca);
        assert_eq!(backend.pixel(32, 32), Some(Control::Tosca.color()));

        app.press(Control::Reset);
        assert_eq!(backend.pixel(32, 32), Some(Rgba::WHITE));
        assert_eq!(count_color(&backend, Control::Tosca.color()), 0);
    }

    #[test]
    fn resize_with_redraw_fills_the_new_surface() {
        let (mut app, backend) = start(40, 20);
        app.press(Control::Pastel);
        let mut surface = backend.clone();

        app.resize(&mut surface, Viewport::new(80, 40));

        assert_eq!(backend.size(), Viewport::new(80, 40));
        assert_eq!(count_color(&backend, Control::Pastel.color()), 56 * 20);
    }

    #[test]
    fn resize_without_redraw_leaves_a_blank_surface() {
        let backend = SoftwareBackend::new(40, 20).unwrap();
        let mut surface = backend.clone();
        let config = AppConfig {
            redraw_on_resize: false,
            ..AppConfig::default()
        };
        let mut app =
            App::start(backend.clone(), &mut surface, Viewport::new(40, 20), &config).unwrap();

        app.resize(&mut surface, Viewport::new(80, 40));

        assert_eq!(count_color(&backend, Rgba::new(0.0, 0.0, 0.0, 0.0)), 80 * 40);
    }

    #[test]
    fn to_rgba8_is_top_down() {
        let gl = SoftwareBackend::new(2, 2).unwrap();
        gl.clear_color(1.0, 0.0, 0.0, 1.0);
        gl.clear_color_buffer();
        gl.state.borrow_mut().pixels[0] = [0.0, 0.0, 1.0, 1.0];

        let bytes = gl.to_rgba8();

        assert_eq!(bytes.len(), 16);
        // bottom-left pixel lands in the last row
        assert_eq!(&bytes[8..12], &[0, 0, 255, 255]);
        assert_eq!(&bytes[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let gl = SoftwareBackend::new(4, 4).unwrap();
        assert_eq!(gl.pixel(4, 0), None);
        assert_eq!(gl.pixel(0, 4), None);
    }

    #[test]
    fn draw_without_program_leaves_framebuffer_alone() {
        let gl = SoftwareBackend::new(4, 4).unwrap();
        gl.draw_triangle_strip(0, 4);
        assert_eq!(count_color(&gl, Rgba::new(0.0, 0.0, 0.0, 0.0)), 16);
    }

    #[test]
    fn zero_or_oversized_framebuffer_is_rejected() {
        for (w, h) in [(0, 10), (10, 0), (u32::MAX, u32::MAX), (8193, 8192)] {
            let err = SoftwareBackend::new(w, h).err();
            assert!(
                matches!(err, Some(SwatchError::InvalidDimensions { width, height })
                    if (width, height) == (w, h)),
                "{w}x{h}"
            );
        }
    }

    #[test]
    fn framebuffer_limit_is_inclusive() {
        assert_eq!(framebuffer_len(8192, 8192), Some(MAX_PIXELS));
        assert_eq!(framebuffer_len(8192, 8193), None);
        assert_eq!(framebuffer_len(0, 0), Some(0));
    }

    #[test]
    fn oversized_resize_keeps_the_current_framebuffer() {
        let (mut app, backend) = start(40, 20);
        let mut surface = backend.clone();

        app.resize(&mut surface, Viewport::new(u32::MAX, u32::MAX));

        assert_eq!(backend.size(), Viewport::new(40, 20));
        assert_eq!(backend.to_rgba8().len(), 40 * 20 * 4);
    }
}
