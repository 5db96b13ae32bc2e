use super::program_error::ProgramError;
use glow::{self, HasContext};

pub struct Shader<'g> {
    handle: glow::Shader,
    gl: &'g glow::Context,
}

impl<'g> Shader<'g> {
    pub fn from_file(
        gl: &'g glow::Context,
        shader_path: &std::path::Path,
        kind: u32,
    ) -> Result<Shader<'g>, ProgramError> {
        let shader_source =
            std::fs::read_to_string(shader_path).map_err(|source| ProgramError::Io {
                path: shader_path.to_path_buf(),
                source,
            })?;

        Self::from_source(gl, &shader_source, kind, &shader_path.display().to_string())
    }

    /// `name` only labels compile errors.
    pub fn from_source(
        gl: &'g glow::Context,
        source: &str,
        kind: u32,
        name: &str,
    ) -> Result<Shader<'g>, ProgramError> {
        let handle = unsafe {
            let handle = gl.create_shader(kind).map_err(ProgramError::Create)?;
            gl.shader_source(handle, source);
            gl.compile_shader(handle);

            if !gl.get_shader_compile_status(handle) {
                let log = gl.get_shader_info_log(handle);
                gl.delete_shader(handle);
                return Err(ProgramError::Compile {
                    name: name.to_owned(),
                    log,
                });
            }

            handle
        };

        log::debug!("compiled shader {name}");
        Ok(Shader { handle, gl })
    }

    pub fn handle(&self) -> glow::Shader {
        self.handle
    }
}

impl<'g> Drop for Shader<'g> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.handle) };
    }
}
