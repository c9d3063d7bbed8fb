//! `glow` implementation of [`GlBackend`].
//!
//! `GpuContext` wraps a `glow::Context`. In the browser the context comes
//! from a WebGL1 canvas; the shaders are GLSL ES 1.00 so a WebGL2 context
//! works as well.

use crate::backend::{GlBackend, ShaderStage};

/// Wraps a `glow::Context` and exposes it as a [`GlBackend`].
pub struct GpuContext {
    gl: glow::Context,
}

impl GpuContext {
    /// Wraps `gl`, logging the driver version it reports.
    pub fn new(gl: glow::Context) -> Self {
        use glow::HasContext;

        log::debug!("GL version: {:?}", gl.version());
        Self { gl }
    }
}

/// Maps a stage to its GL shader type constant.
pub fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

// SAFETY (all methods below): glow marks raw GL calls unsafe. Every handle
// passed in was produced by this same context through the methods of this
// impl, and enum arguments are fixed GL constants.
#[allow(unsafe_code)]
impl GlBackend for GpuContext {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        use glow::HasContext;
        unsafe { self.gl.create_shader(shader_type(stage)) }
    }

    fn compile_shader(&self, shader: glow::Shader, source: &str) {
        use glow::HasContext;
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        use glow::HasContext;
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        use glow::HasContext;
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        use glow::HasContext;
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        use glow::HasContext;
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        use glow::HasContext;
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        use glow::HasContext;
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        use glow::HasContext;
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        use glow::HasContext;
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        use glow::HasContext;
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        use glow::HasContext;
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        use glow::HasContext;
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(
        &self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        use glow::HasContext;
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        use glow::HasContext;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        use glow::HasContext;
        unsafe { self.gl.create_buffer() }
    }

    fn bind_array_buffer(&self, buffer: Option<glow::Buffer>) {
        use glow::HasContext;
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn upload_static_f32(&self, data: &[f32]) {
        use glow::HasContext;
        unsafe {
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            )
        }
    }

    fn vertex_attrib_f32(&self, index: u32, components: i32) {
        use glow::HasContext;
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, 0, 0)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        use glow::HasContext;
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        use glow::HasContext;
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        use glow::HasContext;
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        use glow::HasContext;
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn uniform_4f(&self, location: &glow::UniformLocation, value: [f32; 4]) {
        use glow::HasContext;
        unsafe { self.gl.uniform_4_f32_slice(Some(location), &value) }
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        use glow::HasContext;
        unsafe { self.gl.draw_arrays(glow::TRIANGLE_STRIP, first, count) }
    }
}
