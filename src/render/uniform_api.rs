use glow::{self, HasContext};
use std::num::NonZeroU32;

/// Location value the driver reports for names that are not active uniforms.
pub const NOT_FOUND: i32 = -1;

/// The native uniform entry points, addressed with raw driver integers.
///
/// Every call must happen on the thread whose context is current, with the
/// target program in use for the setters. Failures are reported through the
/// driver's own error flag.
pub trait UniformApi {
    fn uniform_location(&self, program: u32, name: &str) -> i32;

    fn uniform_1_f32(&self, location: i32, x: f32);
    fn uniform_2_f32(&self, location: i32, x: f32, y: f32);
    fn uniform_3_f32(&self, location: i32, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: i32, x: f32, y: f32, z: f32, w: f32);

    fn uniform_1_i32(&self, location: i32, x: i32);
    fn uniform_2_i32(&self, location: i32, x: i32, y: i32);
    fn uniform_3_i32(&self, location: i32, x: i32, y: i32, z: i32);
    fn uniform_4_i32(&self, location: i32, x: i32, y: i32, z: i32, w: i32);

    /// `v` holds exactly `count` elements.
    fn uniform_1_f32_slice(&self, location: i32, count: i32, v: &[f32]);
    fn uniform_2_f32_slice(&self, location: i32, count: i32, v: &[f32]);
    fn uniform_3_f32_slice(&self, location: i32, count: i32, v: &[f32]);
    fn uniform_4_f32_slice(&self, location: i32, count: i32, v: &[f32]);

    fn uniform_1_i32_slice(&self, location: i32, count: i32, v: &[i32]);
    fn uniform_2_i32_slice(&self, location: i32, count: i32, v: &[i32]);
    fn uniform_3_i32_slice(&self, location: i32, count: i32, v: &[i32]);
    fn uniform_4_i32_slice(&self, location: i32, count: i32, v: &[i32]);

    fn uniform_matrix_2_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]);
    fn uniform_matrix_3_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]);
    fn uniform_matrix_4_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]);

    /// `out` must be large enough for the declared type of the uniform.
    fn get_uniform_f32(&self, program: u32, location: i32, out: &mut [f32]);
    fn get_uniform_i32(&self, program: u32, location: i32, out: &mut [i32]);
}

fn native_location(location: i32) -> Option<glow::NativeUniformLocation> {
    (location >= 0).then(|| glow::NativeUniformLocation(location as u32))
}

fn native_program(program: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(program).map(glow::NativeProgram)
}

impl UniformApi for glow::Context {
    fn uniform_location(&self, program: u32, name: &str) -> i32 {
        let Some(program) = native_program(program) else {
            log::debug!("location of `{name}` requested for program 0");
            return NOT_FOUND;
        };

        unsafe { self.get_uniform_location(program, name) }
            .map(|location| location.0 as i32)
            .unwrap_or(NOT_FOUND)
    }

    fn uniform_1_f32(&self, location: i32, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, native_location(location).as_ref(), x) };
    }

    fn uniform_2_f32(&self, location: i32, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, native_location(location).as_ref(), x, y) };
    }

    fn uniform_3_f32(&self, location: i32, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, native_location(location).as_ref(), x, y, z) };
    }

    fn uniform_4_f32(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe {
            HasContext::uniform_4_f32(self, native_location(location).as_ref(), x, y, z, w)
        };
    }

    fn uniform_1_i32(&self, location: i32, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, native_location(location).as_ref(), x) };
    }

    fn uniform_2_i32(&self, location: i32, x: i32, y: i32) {
        unsafe { HasContext::uniform_2_i32(self, native_location(location).as_ref(), x, y) };
    }

    fn uniform_3_i32(&self, location: i32, x: i32, y: i32, z: i32) {
        unsafe { HasContext::uniform_3_i32(self, native_location(location).as_ref(), x, y, z) };
    }

    fn uniform_4_i32(&self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        unsafe {
            HasContext::uniform_4_i32(self, native_location(location).as_ref(), x, y, z, w)
        };
    }

    // glow derives the element count from the slice length, which the
    // caller has already cut to `count` elements.

    fn uniform_1_f32_slice(&self, location: i32, _count: i32, v: &[f32]) {
        unsafe { HasContext::uniform_1_f32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_2_f32_slice(&self, location: i32, _count: i32, v: &[f32]) {
        unsafe { HasContext::uniform_2_f32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_3_f32_slice(&self, location: i32, _count: i32, v: &[f32]) {
        unsafe { HasContext::uniform_3_f32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_4_f32_slice(&self, location: i32, _count: i32, v: &[f32]) {
        unsafe { HasContext::uniform_4_f32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_1_i32_slice(&self, location: i32, _count: i32, v: &[i32]) {
        unsafe { HasContext::uniform_1_i32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_2_i32_slice(&self, location: i32, _count: i32, v: &[i32]) {
        unsafe { HasContext::uniform_2_i32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_3_i32_slice(&self, location: i32, _count: i32, v: &[i32]) {
        unsafe { HasContext::uniform_3_i32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_4_i32_slice(&self, location: i32, _count: i32, v: &[i32]) {
        unsafe { HasContext::uniform_4_i32_slice(self, native_location(location).as_ref(), v) };
    }

    fn uniform_matrix_2_f32_slice(&self, location: i32, _count: i32, transpose: bool, v: &[f32]) {
        unsafe {
            HasContext::uniform_matrix_2_f32_slice(
                self,
                native_location(location).as_ref(),
                transpose,
                v,
            )
        };
    }

    fn uniform_matrix_3_f32_slice(&self, location: i32, _count: i32, transpose: bool, v: &[f32]) {
        unsafe {
            HasContext::uniform_matrix_3_f32_slice(
                self,
                native_location(location).as_ref(),
                transpose,
                v,
            )
        };
    }

    fn uniform_matrix_4_f32_slice(&self, location: i32, _count: i32, transpose: bool, v: &[f32]) {
        unsafe {
            HasContext::uniform_matrix_4_f32_slice(
                self,
                native_location(location).as_ref(),
                transpose,
                v,
            )
        };
    }

    fn get_uniform_f32(&self, program: u32, location: i32, out: &mut [f32]) {
        let Some(program) = native_program(program) else {
            log::debug!("uniform query at location {location} skipped for program 0");
            return;
        };

        let location = glow::NativeUniformLocation(location as u32);
        unsafe { HasContext::get_uniform_f32(self, program, &location, out) };
    }

    fn get_uniform_i32(&self, program: u32, location: i32, out: &mut [i32]) {
        let Some(program) = native_program(program) else {
            log::debug!("uniform query at location {location} skipped for program 0");
            return;
        };

        let location = glow::NativeUniformLocation(location as u32);
        unsafe { HasContext::get_uniform_i32(self, program, &location, out) };
    }
}
