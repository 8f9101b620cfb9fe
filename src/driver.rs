use std::fmt;

use crate::shader::StageKind;

/// The graphics driver as seen by a [`ShaderProgram`](crate::ShaderProgram).
///
/// Methods map one-to-one onto driver entry points. Every call must happen on
/// the thread that owns the current graphics context; implementations are not
/// expected to synchronize anything.
///
/// Deleting a handle that was already deleted is the driver's business, but
/// the program never does it: empty stage slots are skipped.
pub trait Driver {
    type Program: Copy + fmt::Debug;
    type Shader: Copy + fmt::Debug;
    type UniformLocation: fmt::Debug;

    fn create_program(&self) -> Result<Self::Program, String>;
    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_shader(&self, shader: Self::Shader);
    fn delete_program(&self, program: Self::Program);

    /// `None` unbinds whatever program is current.
    fn use_program(&self, program: Option<Self::Program>);

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32);
    fn uniform_f32(&self, location: &Self::UniformLocation, value: f32);
    fn uniform_mat4(&self, location: &Self::UniformLocation, value: &glam::Mat4);
    fn uniform_vec3(&self, location: &Self::UniformLocation, value: glam::Vec3);
}
