//! Compile, link and feed uniforms to a graphics-driver shader program.
//!
//! ```no_run
//! # fn demo(gl: &glow::Context) -> shader_program::Result<()> {
//! use shader_program::{ShaderProgram, StageKind};
//!
//! let mut program = ShaderProgram::new(gl)?;
//! program.add_stage("shaders/basic.vert", StageKind::Vertex)?;
//! program.add_stage("shaders/basic.frag", StageKind::Fragment)?;
//! program.link()?;
//!
//! program.bind()?;
//! program.set_mat4("u_view_proj", &glam::Mat4::IDENTITY)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod error;
mod gl;
mod program;
mod shader;

pub use {
    config::{FailurePolicy, ProgramConfig, ProgramManifest, StageEntry},
    driver::Driver,
    error::{Error, Result},
    program::{ProgramState, ShaderProgram},
    shader::{load_source, StageKind, StageSet},
};

pub use {glam, glow};
