use glow::HasContext;

use crate::{driver::Driver, shader::StageKind};

type GlProgram = <glow::Context as HasContext>::Program;
type GlShader = <glow::Context as HasContext>::Shader;
type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;

// Safety for every block below: glow only requires a current context on the
// calling thread, which is the caller's contract for `Driver` as a whole.
impl Driver for glow::Context {
    type Program = GlProgram;
    type Shader = GlShader;
    type UniformLocation = GlUniformLocation;

    fn create_program(&self) -> Result<GlProgram, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn create_shader(&self, kind: StageKind) -> Result<GlShader, String> {
        unsafe { HasContext::create_shader(self, kind.to_gl()) }
    }

    fn shader_source(&self, shader: GlShader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: GlShader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: GlShader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: GlShader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn attach_shader(&self, program: GlProgram, shader: GlShader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: GlProgram, shader: GlShader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: GlProgram) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: GlProgram) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: GlProgram) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_shader(&self, shader: GlShader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn delete_program(&self, program: GlProgram) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<GlProgram>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: GlProgram,
        name: &str,
    ) -> Option<GlUniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_i32(&self, location: &GlUniformLocation, value: i32) {
        unsafe { self.uniform_1_i32(Some(location), value) }
    }

    fn uniform_f32(&self, location: &GlUniformLocation, value: f32) {
        unsafe { self.uniform_1_f32(Some(location), value) }
    }

    fn uniform_mat4(&self, location: &GlUniformLocation, value: &glam::Mat4) {
        unsafe {
            self.uniform_matrix_4_f32_slice(Some(location), false, &value.to_cols_array())
        }
    }

    fn uniform_vec3(&self, location: &GlUniformLocation, value: glam::Vec3) {
        unsafe { self.uniform_3_f32_slice(Some(location), &value.to_array()) }
    }
}
