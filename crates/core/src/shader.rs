//! Shader sources, compilation and linking.
//!
//! The two stages are GLSL ES 1.00 so they run on WebGL1 and WebGL2 alike.
//! Compilation and linking go through [`GlBackend`], so failures can be
//! driven from tests; [`format_shader_error`] is pure string processing.

use crate::backend::{GlBackend, ShaderStage};
use crate::error::SwatchError;
use thiserror::Error;

/// Name of the color uniform in the fragment stage.
pub const COLOR_UNIFORM: &str = "uColor";

/// Pass-through vertex stage: the attribute is already in clip space.
pub const VERTEX_SHADER: &str = r#"
attribute vec4 aVertexPosition;
void main() {
    gl_Position = aVertexPosition;
}
"#;

/// Flat fill: every covered fragment takes the uniform color.
pub const FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform vec4 uColor;
void main() {
    gl_FragColor = uColor;
}
"#;

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The stage that failed ("vertex" or "fragment").
        stage: String,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// The program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. Both may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// On failure the shader object is deleted before returning.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if the backend cannot create the
/// shader or reports a failed compile.
pub fn compile_shader<B: GlBackend>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|e| ShaderError::CompileError {
            stage: stage.name().to_string(),
            log: e,
        })?;

    gl.compile_shader(shader, source);

    if gl.shader_compile_status(shader) {
        Ok(shader)
    } else {
        let info_log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::CompileError {
            stage: stage.name().to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// Both shaders are detached after linking whatever the outcome; a program
/// that fails to link is deleted.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails.
pub fn link_program<B: GlBackend>(
    gl: &B,
    vertex: B::Shader,
    fragment: B::Shader,
) -> Result<B::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::LinkError)?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if gl.program_link_status(program) {
        Ok(program)
    } else {
        let info_log = gl.program_info_log(program);
        gl.delete_program(program);
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles both stages and links them. Shader objects are released
/// afterwards regardless of the outcome.
///
/// # Errors
///
/// `ShaderError::CompileError` if either stage fails to compile,
/// `ShaderError::LinkError` if linking fails.
pub fn compile_program<B: GlBackend>(
    gl: &B,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<B::Program, ShaderError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    gl.delete_shader(vert);
    gl.delete_shader(frag);

    result
}

/// A linked program with its color uniform location resolved once.
pub struct ShaderProgram<B: GlBackend> {
    program: B::Program,
    color_location: B::UniformLocation,
}

impl<B: GlBackend> ShaderProgram<B> {
    /// Builds the program, makes it current and caches the location of
    /// [`COLOR_UNIFORM`].
    ///
    /// # Errors
    ///
    /// `SwatchError::Shader` on compile or link failure,
    /// `SwatchError::UniformMissing` if the linked program has no
    /// [`COLOR_UNIFORM`] (the program is deleted in that case).
    pub fn build(gl: &B, vertex_src: &str, fragment_src: &str) -> Result<Self, SwatchError> {
        let program = compile_program(gl, vertex_src, fragment_src)?;

        let Some(color_location) = gl.uniform_location(program, COLOR_UNIFORM) else {
            gl.delete_program(program);
            return Err(SwatchError::UniformMissing(COLOR_UNIFORM.to_string()));
        };

        gl.use_program(Some(program));
        log::debug!("shader program linked, {COLOR_UNIFORM} resolved");

        Ok(Self {
            program,
            color_location,
        })
    }

    pub fn program(&self) -> B::Program {
        self.program
    }

    pub fn color_location(&self) -> &B::UniformLocation {
        &self.color_location
    }
}

/// Builds the scene's flat-color program from [`VERTEX_SHADER`] and
/// [`FRAGMENT_SHADER`].
pub fn build_program<B: GlBackend>(gl: &B) -> Result<ShaderProgram<B>, SwatchError> {
    ShaderProgram::build(gl, VERTEX_SHADER, FRAGMENT_SHADER)
}
