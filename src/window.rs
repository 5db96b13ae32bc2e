use glutin::{event_loop::EventLoop, Api, GlProfile, GlRequest};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("failed to create GL window: {0}")]
    Creation(#[from] glutin::CreationError),
    #[error("failed to make GL context current: {0}")]
    Context(glutin::ContextError),
}

/// An invisible window whose GL context is current on the creating thread.
pub struct Window {
    // Owns the context `gl` loads from; dropping it invalidates `gl`.
    _windowed_context: glutin::WindowedContext<glutin::PossiblyCurrent>,
    gl: glow::Context,
}

impl Window {
    pub fn hidden(
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(Window, EventLoop<()>), WindowError> {
        let event_loop = glutin::event_loop::EventLoop::new();
        let window = glutin::window::WindowBuilder::new()
            .with_title(title)
            .with_visible(false)
            .with_inner_size(glutin::dpi::LogicalSize::new(width, height));

        let window = glutin::ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .build_windowed(window, &event_loop)?;

        let windowed_context =
            unsafe { window.make_current() }.map_err(|(_, error)| WindowError::Context(error))?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| windowed_context.get_proc_address(s).cast())
        };

        log::info!("created {width}x{height} GL 3.3 core context");

        Ok((
            Window {
                _windowed_context: windowed_context,
                gl,
            },
            event_loop,
        ))
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}
