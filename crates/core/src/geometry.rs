//! The fixed rectangle and its GPU-resident vertex buffer.

use crate::backend::GlBackend;
use crate::error::SwatchError;

/// Name of the position attribute in the vertex stage.
pub const POSITION_ATTRIBUTE: &str = "aVertexPosition";

/// Floats per vertex in [`QUAD_VERTICES`].
pub const COMPONENTS_PER_VERTEX: i32 = 2;

/// Vertices in the strip.
pub const VERTEX_COUNT: i32 = 4;

/// Half-width of the rectangle in normalized device coordinates.
pub const HALF_WIDTH: f32 = 0.7;

/// Half-height of the rectangle in normalized device coordinates.
pub const HALF_HEIGHT: f32 = 0.5;

/// The rectangle as a triangle strip, already in clip space:
/// top-left, top-right, bottom-left, bottom-right.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 8] = [
    -HALF_WIDTH, HALF_HEIGHT,
    HALF_WIDTH, HALF_HEIGHT,
    -HALF_WIDTH, -HALF_HEIGHT,
    HALF_WIDTH, -HALF_HEIGHT,
];

/// The uploaded vertex buffer and the attribute slot it feeds.
pub struct GeometryBuffer<B: GlBackend> {
    buffer: B::Buffer,
    attribute: u32,
    vertex_count: i32,
}

impl<B: GlBackend> GeometryBuffer<B> {
    /// Uploads `vertices` (2 floats per vertex) into a new static buffer and
    /// wires it to the program's position attribute.
    ///
    /// # Errors
    ///
    /// `SwatchError::AttributeMissing` if the program has no
    /// [`POSITION_ATTRIBUTE`], `SwatchError::Buffer` if the backend cannot
    /// allocate the buffer.
    pub fn upload(gl: &B, program: B::Program, vertices: &[f32]) -> Result<Self, SwatchError> {
        let attribute = gl
            .attrib_location(program, POSITION_ATTRIBUTE)
            .ok_or_else(|| SwatchError::AttributeMissing(POSITION_ATTRIBUTE.to_string()))?;

        let buffer = gl.create_buffer().map_err(SwatchError::Buffer)?;
        gl.bind_array_buffer(Some(buffer));
        gl.upload_static_f32(vertices);
        gl.vertex_attrib_f32(attribute, COMPONENTS_PER_VERTEX);
        gl.enable_vertex_attrib_array(attribute);

        let vertex_count = vertices.len() / COMPONENTS_PER_VERTEX as usize;
        log::debug!("uploaded {vertex_count} vertices to attribute {attribute}");

        Ok(Self {
            buffer,
            attribute,
            vertex_count: i32::try_from(vertex_count).unwrap_or(i32::MAX),
        })
    }

    pub fn buffer(&self) -> B::Buffer {
        self.buffer
    }

    pub fn attribute(&self) -> u32 {
        self.attribute
    }

    /// Whole vertices in the buffer; a trailing partial vertex is ignored.
    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }
}
