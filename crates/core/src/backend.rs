//! The rendering capability set the scene needs from a GPU context.
//!
//! `GlBackend` mirrors the handful of GL entry points swatch touches, with
//! safe signatures. Implementations: [`GpuContext`](crate::render::GpuContext)
//! over `glow` (feature `render`) and the CPU
//! [`SoftwareBackend`](crate::software::SoftwareBackend).

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// A GPU context exposing shader, buffer, viewport, clear, uniform and draw
/// operations.
///
/// Handles are plain values owned by the caller; the backend never frees
/// them on its own.
pub trait GlBackend {
    type Shader: Copy;
    type Program: Copy;
    type Buffer: Copy;
    type UniformLocation: Clone;

    /// Creates an empty shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Sets the source of `shader` and compiles it.
    fn compile_shader(&self, shader: Self::Shader, source: &str);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Binds `buffer` to the array-buffer target.
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` into the bound array buffer with static usage.
    fn upload_static_f32(&self, data: &[f32]);
    /// Points attribute `index` at the bound array buffer: `components`
    /// floats per vertex, tightly packed, starting at offset 0.
    fn vertex_attrib_f32(&self, index: u32, components: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// Clears the color buffer to the current clear color.
    fn clear_color_buffer(&self);
    fn uniform_4f(&self, location: &Self::UniformLocation, value: [f32; 4]);
    /// Draws `count` vertices from `first` as a triangle strip.
    fn draw_triangle_strip(&self, first: i32, count: i32);
}
