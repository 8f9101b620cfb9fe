#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    path::PathBuf,
};

use shader_program::{glam, Driver, StageKind};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/shaders")
        .join(name)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upload {
    Int(i32),
    Float(f32),
    Mat4([f32; 16]),
    Vec3([f32; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(u32),
    CreateShader(u32, StageKind),
    Compile(u32),
    Attach(u32, u32),
    Detach(u32, u32),
    Link(u32),
    DeleteShader(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    Uniform {
        program: u32,
        name: String,
        value: Upload,
    },
}

#[derive(Debug)]
pub struct Location {
    program: u32,
    name: String,
}

struct ShaderObject {
    kind: StageKind,
    source: String,
    compiled: bool,
    deleted: bool,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    uniforms: BTreeSet<String>,
    deleted: bool,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    calls: Vec<Call>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    refuse_programs: bool,
}

impl Inner {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// A driver that records every call and imitates a GLSL toolchain just
/// enough for lifecycle tests.
///
/// A source compiles when it has a `void main` and no `#error` directive. A
/// program links when it has at least one attached shader and all of them
/// compiled. Uniforms are whatever `uniform <type> <name>;` lines the
/// attached sources declare.
#[derive(Default)]
pub struct RecordingDriver {
    inner: RefCell<Inner>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose `create_program` always fails.
    pub fn out_of_handles() -> Self {
        let driver = Self::default();
        driver.inner.borrow_mut().refuse_programs = true;
        driver
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn created_kinds(&self) -> Vec<StageKind> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateShader(_, kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<(String, Upload)> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Uniform { name, value, .. } => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn shader_kind(&self, shader: u32) -> Option<StageKind> {
        self.inner.borrow().shaders.get(&shader).map(|s| s.kind)
    }

    pub fn source_of(&self, shader: u32) -> Option<String> {
        self.inner
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.source.clone())
    }

    pub fn is_shader_deleted(&self, shader: u32) -> bool {
        self.inner
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.deleted)
    }

    pub fn live_shaders(&self) -> usize {
        self.inner
            .borrow()
            .shaders
            .values()
            .filter(|s| !s.deleted)
            .count()
    }

    pub fn live_programs(&self) -> usize {
        self.inner
            .borrow()
            .programs
            .values()
            .filter(|p| !p.deleted)
            .count()
    }

    pub fn attached(&self, program: u32) -> Vec<u32> {
        self.inner
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.inner.borrow_mut().calls.push(call);
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let rest = line.trim().strip_prefix("uniform ")?;
        let name = rest.split_whitespace().last()?.trim_end_matches(';');
        Some(name.to_owned())
    })
}

fn error_directive(source: &str) -> Option<(usize, &str)> {
    source.lines().enumerate().find_map(|(i, line)| {
        let message = line.trim().strip_prefix("#error")?;
        Some((i + 1, message.trim()))
    })
}

impl Driver for RecordingDriver {
    type Program = u32;
    type Shader = u32;
    type UniformLocation = Location;

    fn create_program(&self) -> Result<u32, String> {
        let mut inner = self.inner.borrow_mut();
        if inner.refuse_programs {
            return Err("out of program handles".to_owned());
        }
        let id = inner.next_id();
        inner.programs.insert(id, ProgramObject::default());
        inner.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.shaders.insert(
            id,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: false,
                deleted: false,
            },
        );
        inner.calls.push(Call::CreateShader(id, kind));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(object) = self.inner.borrow_mut().shaders.get_mut(&shader) {
            object.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(object) = self.inner.borrow_mut().shaders.get_mut(&shader) {
            object.compiled =
                object.source.contains("void main") && error_directive(&object.source).is_none();
        }
        self.record(Call::Compile(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.inner
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let inner = self.inner.borrow();
        let Some(object) = inner.shaders.get(&shader) else {
            return String::new();
        };
        match error_directive(&object.source) {
            Some((line, message)) => format!("0:{line}: error: {message}"),
            None if !object.compiled => "0:0: error: missing entry point 'main'".to_owned(),
            None => String::new(),
        }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(object) = self.inner.borrow_mut().programs.get_mut(&program) {
            object.attached.push(shader);
        }
        self.record(Call::Attach(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(object) = self.inner.borrow_mut().programs.get_mut(&program) {
            object.attached.retain(|&s| s != shader);
        }
        self.record(Call::Detach(program, shader));
    }

    fn link_program(&self, program: u32) {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            shaders, programs, ..
        } = &mut *inner;
        if let Some(object) = programs.get_mut(&program) {
            let stages: Vec<_> = object
                .attached
                .iter()
                .filter_map(|id| shaders.get(id))
                .collect();
            object.linked = !stages.is_empty() && stages.iter().all(|s| s.compiled);
            object.uniforms = stages
                .iter()
                .flat_map(|&s| declared_uniforms(&s.source))
                .collect();
        }
        inner.calls.push(Call::Link(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.inner
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        let inner = self.inner.borrow();
        match inner.programs.get(&program) {
            Some(p) if p.attached.is_empty() => "error: no shaders attached".to_owned(),
            Some(p) if !p.linked => "error: attached shader failed to compile".to_owned(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(object) = self.inner.borrow_mut().shaders.get_mut(&shader) {
            object.deleted = true;
        }
        self.record(Call::DeleteShader(shader));
    }

    fn delete_program(&self, program: u32) {
        if let Some(object) = self.inner.borrow_mut().programs.get_mut(&program) {
            object.deleted = true;
        }
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<Location> {
        let inner = self.inner.borrow();
        let object = inner.programs.get(&program)?;
        (object.linked && object.uniforms.contains(name)).then(|| Location {
            program,
            name: name.to_owned(),
        })
    }

    fn uniform_i32(&self, location: &Location, value: i32) {
        self.upload(location, Upload::Int(value));
    }

    fn uniform_f32(&self, location: &Location, value: f32) {
        self.upload(location, Upload::Float(value));
    }

    fn uniform_mat4(&self, location: &Location, value: &glam::Mat4) {
        self.upload(location, Upload::Mat4(value.to_cols_array()));
    }

    fn uniform_vec3(&self, location: &Location, value: glam::Vec3) {
        self.upload(location, Upload::Vec3(value.to_array()));
    }
}

impl RecordingDriver {
    fn upload(&self, location: &Location, value: Upload) {
        self.record(Call::Uniform {
            program: location.program,
            name: location.name.clone(),
            value,
        });
    }
}
