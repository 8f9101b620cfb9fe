use std::{cell::Cell, path::Path};

use crate::{
    config::{ProgramConfig, ProgramManifest},
    driver::Driver,
    error::{Error, Result},
    shader::{self, StageKind, StageSet},
};

/// Where a program is in its lifecycle. Dropping the program is the final
/// transition and has no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    /// The driver handed out a program handle; stages may be added.
    Created,
    Linked,
    /// Linking ran and the driver rejected the program.
    LinkFailed,
}

/// One linked driver program built from up to six compiled stages.
///
/// The program borrows the driver it was created with and must only be used
/// on the thread that owns that driver's context. The program handle is
/// released on drop, along with any stage that was added but never linked.
///
/// Calls made out of lifecycle order (binding before linking, adding stages
/// after linking) are forwarded to the driver as-is under
/// [`FailurePolicy::Continue`](crate::FailurePolicy::Continue); what the
/// driver does with them is undefined. Under
/// [`FailurePolicy::Strict`](crate::FailurePolicy::Strict) they are rejected
/// with [`Error::InvalidState`].
pub struct ShaderProgram<'d, D: Driver + ?Sized> {
    driver: &'d D,
    handle: D::Program,
    stages: StageSet<D::Shader>,
    state: ProgramState,
    failed: StageSet<()>,
    bound: Cell<bool>,
    config: ProgramConfig,
}

impl<'d, D: Driver + ?Sized> ShaderProgram<'d, D> {
    pub fn new(driver: &'d D) -> Result<Self> {
        Self::create(driver, ProgramConfig::default())
    }

    pub fn create(driver: &'d D, config: ProgramConfig) -> Result<Self> {
        let handle = driver.create_program().map_err(Error::CreateProgram)?;
        log::debug!("created program {handle:?} ({:?})", config.policy);

        Ok(ShaderProgram {
            driver,
            handle,
            stages: StageSet::default(),
            state: ProgramState::Created,
            failed: StageSet::default(),
            bound: Cell::new(false),
            config,
        })
    }

    /// Builds and links every stage of `manifest`.
    ///
    /// Under the continue policy a stage that fails is skipped over and
    /// linking still runs; under the strict policy the first failure is
    /// returned.
    pub fn from_manifest(driver: &'d D, manifest: &ProgramManifest) -> Result<Self> {
        let mut program = Self::create(driver, manifest.config())?;
        for stage in &manifest.stages {
            if let Err(err) = program.add_stage(&stage.path, stage.kind) {
                if program.config.is_strict() {
                    return Err(err);
                }
            }
        }
        program.link()?;
        Ok(program)
    }

    pub fn load(driver: &'d D, manifest_path: &Path) -> Result<Self> {
        let manifest = ProgramManifest::load(manifest_path)?;
        Self::from_manifest(driver, &manifest)
    }

    pub fn handle(&self) -> D::Program {
        self.handle
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == ProgramState::Linked
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn stage(&self, kind: StageKind) -> Option<D::Shader> {
        self.stages.get(kind)
    }

    /// Compiles the file at `path` as a `kind` stage and attaches it.
    ///
    /// An unreadable file is compiled as empty source under the continue
    /// policy, which the driver then rejects. Under the strict policy it is
    /// returned as [`Error::SourceRead`] before the driver is touched.
    pub fn add_stage(&mut self, path: impl AsRef<Path>, kind: StageKind) -> Result<()> {
        self.check_state("add a stage", ProgramState::Created)?;

        let source = match shader::load_source(path.as_ref()) {
            Ok(source) => source,
            Err(err) if self.config.is_strict() => {
                self.failed.insert(kind, ());
                return Err(err);
            }
            Err(err) => {
                log::warn!("{err}, compiling empty {} source", kind.name());
                String::new()
            }
        };

        self.add_stage_source(&source, kind)
    }

    /// Compiles `source` as a `kind` stage and attaches it.
    ///
    /// A compile failure is logged and returned as [`Error::Compile`]. Under
    /// the continue policy the broken stage is still attached; under the
    /// strict policy it is deleted and the slot keeps its previous shader.
    pub fn add_stage_source(&mut self, source: &str, kind: StageKind) -> Result<()> {
        self.check_state("add a stage", ProgramState::Created)?;

        let driver = self.driver;
        let shader = match driver.create_shader(kind) {
            Ok(shader) => shader,
            Err(reason) => {
                self.failed.insert(kind, ());
                return Err(Error::CreateShader { stage: kind, reason });
            }
        };
        driver.shader_source(shader, source);
        driver.compile_shader(shader);

        if !driver.shader_compile_status(shader) {
            let log = driver.shader_info_log(shader);
            log::error!("[{} Shader] Compilation failed\n{log}", kind.name());
            self.failed.insert(kind, ());

            if self.config.is_strict() {
                driver.delete_shader(shader);
            } else {
                self.attach(kind, shader);
            }
            return Err(Error::Compile { stage: kind, log });
        }

        self.failed.take(kind);
        self.attach(kind, shader);
        Ok(())
    }

    fn attach(&mut self, kind: StageKind, shader: D::Shader) {
        let driver = self.driver;
        if let Some(replaced) = self.stages.insert(kind, shader) {
            log::warn!(
                "{} stage added twice to program {:?}, deleting {replaced:?}",
                kind.name(),
                self.handle
            );
            driver.detach_shader(self.handle, replaced);
            driver.delete_shader(replaced);
        }
        driver.attach_shader(self.handle, shader);
        log::debug!("attached {} shader {shader:?}", kind.name());
    }

    pub fn link(&mut self) -> Result<()> {
        if self.config.is_strict() {
            self.check_state("link", ProgramState::Created)?;
            // a failed kind stays blocking until a stage of that kind compiles
            if !self.failed.is_empty() {
                return Err(Error::FailedStage);
            }
        }

        let driver = self.driver;
        driver.link_program(self.handle);

        let result = if driver.program_link_status(self.handle) {
            self.state = ProgramState::Linked;
            log::debug!("linked program {:?}", self.handle);
            Ok(())
        } else {
            let log = driver.program_info_log(self.handle);
            log::error!("[Shader Program] Linking failed\n{log}");
            self.state = ProgramState::LinkFailed;
            Err(Error::Link { log })
        };

        for (_, shader) in self.stages.drain() {
            driver.delete_shader(shader);
        }

        result
    }

    pub fn bind(&self) -> Result<()> {
        self.check_state("bind", ProgramState::Linked)?;
        self.driver.use_program(Some(self.handle));
        self.bound.set(true);
        Ok(())
    }

    pub fn unbind(&self) {
        self.driver.use_program(None);
        self.bound.set(false);
    }

    /// Uploads go to whichever program the driver has current. Binding some
    /// other program after [`bind`](Self::bind) redirects them there, and
    /// this program cannot see that happen.
    pub fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.upload(name, |driver, location| driver.uniform_i32(location, value))
    }

    pub fn set_float(&self, name: &str, value: f32) -> Result<()> {
        self.upload(name, |driver, location| driver.uniform_f32(location, value))
    }

    pub fn set_mat4(&self, name: &str, value: &glam::Mat4) -> Result<()> {
        self.upload(name, |driver, location| driver.uniform_mat4(location, value))
    }

    pub fn set_vec3(&self, name: &str, value: glam::Vec3) -> Result<()> {
        self.upload(name, |driver, location| driver.uniform_vec3(location, value))
    }

    fn upload(&self, name: &str, write: impl FnOnce(&D, &D::UniformLocation)) -> Result<()> {
        self.check_state("set a uniform", ProgramState::Linked)?;
        if self.config.is_strict() && !self.bound.get() {
            return Err(Error::NotBound);
        }

        match self.driver.uniform_location(self.handle, name) {
            Some(location) => {
                write(self.driver, &location);
                Ok(())
            }
            None if self.config.is_strict() => Err(Error::UniformNotFound(name.to_owned())),
            None => {
                log::debug!("uniform {name:?} not in program {:?}, dropped", self.handle);
                Ok(())
            }
        }
    }

    fn check_state(&self, op: &'static str, expected: ProgramState) -> Result<()> {
        if self.config.is_strict() && self.state != expected {
            return Err(Error::InvalidState {
                op,
                state: self.state,
            });
        }
        Ok(())
    }
}

impl<D: Driver + ?Sized> Drop for ShaderProgram<'_, D> {
    fn drop(&mut self) {
        let driver = self.driver;
        for (_, shader) in self.stages.drain() {
            driver.delete_shader(shader);
        }
        driver.delete_program(self.handle);
        log::debug!("deleted program {:?}", self.handle);
    }
}
