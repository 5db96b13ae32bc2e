pub mod primitives {
    pub mod color;
}

pub mod render {
    #[cfg(test)]
    pub(crate) mod fake_api;
    pub mod gl_program;
    pub mod program_error;
    pub mod shader;
    pub mod uniform;
    pub mod uniform_api;
}

pub mod probe;
pub mod window;
