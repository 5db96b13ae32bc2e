use super::{program_error::ProgramError, shader::Shader, uniform::Uniform};
use glow::{self, HasContext};

pub struct GlProgram {
    handle: glow::Program,
}

impl GlProgram {
    pub fn with_shaders(gl: &glow::Context, shaders: &[&Shader]) -> Result<GlProgram, ProgramError> {
        let handle = unsafe { gl.create_program() }.map_err(ProgramError::Create)?;

        unsafe {
            for shader in shaders {
                gl.attach_shader(handle, shader.handle());
            }

            gl.link_program(handle);

            for shader in shaders {
                gl.detach_shader(handle, shader.handle());
            }

            if !gl.get_program_link_status(handle) {
                let log = gl.get_program_info_log(handle);
                gl.delete_program(handle);
                return Err(ProgramError::Link(log));
            }
        }

        let program = GlProgram { handle };
        log::debug!("linked program {}", program.id());
        Ok(program)
    }

    /// The raw driver identifier, as stored in [`Uniform`] handles.
    pub fn id(&self) -> u32 {
        self.handle.0.get()
    }

    pub fn uniform(&self, gl: &glow::Context, name: &str) -> Uniform {
        Uniform::locate(gl, self.id(), name)
    }

    pub fn use_by(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.handle));
        }
    }

    pub fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.handle);
        }
    }
}
