//! Test doubles: a backend that records every state-changing call and can be
//! told to fail, and a surface that remembers its size.

use crate::backend::{GlBackend, ShaderStage};
use crate::viewport::Surface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A state-changing backend call. Queries (status, logs, locations) are not
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    UploadStatic(Vec<f32>),
    VertexAttrib { index: u32, components: i32 },
    EnableAttrib(u32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    Uniform4f(u32, [f32; 4]),
    DrawStrip { first: i32, count: i32 },
}

struct Inner {
    calls: Vec<Call>,
    next_id: u32,
    stages: HashMap<u32, ShaderStage>,
    failing_stage: Option<(ShaderStage, String)>,
    failing_link: Option<String>,
    failing_buffer: Option<String>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

/// Clones share the same call log.
#[derive(Clone)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingBackend {
    /// A backend whose programs expose `aVertexPosition` and `uColor` and
    /// whose every operation succeeds.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                calls: Vec::new(),
                next_id: 1,
                stages: HashMap::new(),
                failing_stage: None,
                failing_link: None,
                failing_buffer: None,
                attributes: vec!["aVertexPosition".into()],
                uniforms: vec!["uColor".into()],
            })),
        }
    }

    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.inner.borrow_mut().failing_stage = Some((stage, log.to_string()));
    }

    pub fn fail_link(&self, log: &str) {
        self.inner.borrow_mut().failing_link = Some(log.to_string());
    }

    pub fn fail_buffer_allocation(&self, msg: &str) {
        self.inner.borrow_mut().failing_buffer = Some(msg.to_string());
    }

    pub fn set_attributes(&self, names: &[&str]) {
        self.inner.borrow_mut().attributes = names.iter().map(|n| n.to_string()).collect();
    }

    pub fn set_uniforms(&self, names: &[&str]) {
        self.inner.borrow_mut().uniforms = names.iter().map(|n| n.to_string()).collect();
    }

    /// Hands out a program id without recording any call.
    pub fn linked_program(&self) -> u32 {
        self.next_id()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.count(|c| matches!(c, Call::DrawStrip { .. }))
    }

    pub fn uniform_writes(&self) -> Vec<[f32; 4]> {
        self.filter_map(|c| match c {
            Call::Uniform4f(_, v) => Some(*v),
            _ => None,
        })
    }

    pub fn last_uniform(&self) -> Option<[f32; 4]> {
        self.uniform_writes().last().copied()
    }

    pub fn uploads(&self) -> Vec<Vec<f32>> {
        self.filter_map(|c| match c {
            Call::UploadStatic(v) => Some(v.clone()),
            _ => None,
        })
    }

    pub fn viewports(&self) -> Vec<(i32, i32, i32, i32)> {
        self.filter_map(|c| match c {
            Call::Viewport(x, y, w, h) => Some((*x, *y, *w, *h)),
            _ => None,
        })
    }

    /// Shaders created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        let created = self.count(|c| matches!(c, Call::CreateShader(..)));
        let deleted = self.count(|c| matches!(c, Call::DeleteShader(_)));
        created - deleted
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|c| pred(*c)).count()
    }

    fn filter_map<T>(&self, f: impl Fn(&Call) -> Option<T>) -> Vec<T> {
        self.inner.borrow().calls.iter().filter_map(f).collect()
    }

    fn next_id(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        id
    }

    fn record(&self, call: Call) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl GlBackend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.next_id();
        self.inner.borrow_mut().stages.insert(id, stage);
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn compile_shader(&self, shader: u32, _source: &str) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let inner = self.inner.borrow();
        match (&inner.failing_stage, inner.stages.get(&shader)) {
            (Some((failing, _)), Some(stage)) => failing != stage,
            _ => true,
        }
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        let inner = self.inner.borrow();
        inner
            .failing_stage
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.next_id();
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        self.inner.borrow().failing_link.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.inner.borrow().failing_link.clone().unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        let inner = self.inner.borrow();
        inner
            .uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| i as u32)
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        let inner = self.inner.borrow();
        inner
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if let Some(msg) = self.inner.borrow().failing_buffer.clone() {
            return Err(msg);
        }
        let id = self.next_id();
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn upload_static_f32(&self, data: &[f32]) {
        self.record(Call::UploadStatic(data.to_vec()));
    }

    fn vertex_attrib_f32(&self, index: u32, components: i32) {
        self.record(Call::VertexAttrib { index, components });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn uniform_4f(&self, location: &u32, value: [f32; 4]) {
        self.record(Call::Uniform4f(*location, value));
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(Call::DrawStrip { first, count });
    }
}

/// A surface that only remembers the size it was given.
#[derive(Debug, Default)]
pub struct FakeSurface {
    pub width: u32,
    pub height: u32,
    pub resizes: usize,
}

impl Surface for FakeSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
    }
}
