//! One frame: clear, set the color uniform, draw the strip.

use crate::backend::GlBackend;
use crate::color::Rgba;
use crate::geometry::GeometryBuffer;
use crate::shader::ShaderProgram;

/// Background behind the rectangle.
pub const CLEAR_COLOR: Rgba = Rgba::BLACK;

/// Renders the scene with `color`.
///
/// Only a successfully built [`ShaderProgram`] can be passed in, so a
/// program that failed to compile or link is never drawn with.
pub fn render<B: GlBackend>(
    gl: &B,
    program: &ShaderProgram<B>,
    geometry: &GeometryBuffer<B>,
    color: Rgba,
) {
    let [r, g, b, a] = CLEAR_COLOR.to_array();
    gl.clear_color(r, g, b, a);
    gl.clear_color_buffer();

    gl.uniform_4f(program.color_location(), color.to_array());
    gl.draw_triangle_strip(0, geometry.vertex_count());
}
