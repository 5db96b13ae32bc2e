use super::uniform_api::{UniformApi, NOT_FOUND};
use crate::primitives::color::Color;
use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};
use thiserror::Error;

/// Components in the largest non-array uniform a query can return (`mat4`).
pub const MAX_COMPONENTS: usize = 16;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UniformError {
    #[error("buffer too short: {needed} components needed, {provided} provided")]
    ShortBuffer { needed: usize, provided: usize },
    #[error("element count {0} does not fit the driver count type")]
    CountOverflow(usize),
}

/// A uniform variable slot inside a linked program.
///
/// The handle is two driver integers and owns nothing. Setters apply to the
/// program currently in use, so bind the program with
/// [`GlProgram::use_by`](super::gl_program::GlProgram::use_by) first. Errors
/// such as a wrong type or an invalid location are left to the driver's own
/// error flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uniform {
    program: u32,
    location: i32,
}

fn span(count: usize, components: usize, provided: usize) -> Result<(i32, usize), UniformError> {
    let driver_count = i32::try_from(count).map_err(|_| UniformError::CountOverflow(count))?;
    let needed = count
        .checked_mul(components)
        .ok_or(UniformError::CountOverflow(count))?;

    if provided < needed {
        return Err(UniformError::ShortBuffer { needed, provided });
    }

    Ok((driver_count, needed))
}

impl Uniform {
    pub const NOT_FOUND: i32 = NOT_FOUND;

    pub fn new(program: u32, location: i32) -> Self {
        Self { program, location }
    }

    /// Looks `name` up among the active uniforms of `program`.
    pub fn locate<A: UniformApi + ?Sized>(api: &A, program: u32, name: &str) -> Self {
        let location = api.uniform_location(program, name);
        if location == NOT_FOUND {
            log::warn!("uniform `{name}` is not active in program {program}");
        }

        Self::new(program, location)
    }

    pub fn location(&self) -> i32 {
        self.location
    }

    pub fn program(&self) -> u32 {
        self.program
    }

    pub fn is_found(&self) -> bool {
        self.location >= 0
    }

    pub fn reset(&mut self) {
        self.program = 0;
        self.location = 0;
    }

    pub fn set_f32<A: UniformApi + ?Sized>(&self, api: &A, x: f32) {
        api.uniform_1_f32(self.location, x);
    }

    pub fn set_2_f32<A: UniformApi + ?Sized>(&self, api: &A, x: f32, y: f32) {
        api.uniform_2_f32(self.location, x, y);
    }

    pub fn set_3_f32<A: UniformApi + ?Sized>(&self, api: &A, x: f32, y: f32, z: f32) {
        api.uniform_3_f32(self.location, x, y, z);
    }

    pub fn set_4_f32<A: UniformApi + ?Sized>(&self, api: &A, x: f32, y: f32, z: f32, w: f32) {
        api.uniform_4_f32(self.location, x, y, z, w);
    }

    pub fn set_i32<A: UniformApi + ?Sized>(&self, api: &A, x: i32) {
        api.uniform_1_i32(self.location, x);
    }

    pub fn set_2_i32<A: UniformApi + ?Sized>(&self, api: &A, x: i32, y: i32) {
        api.uniform_2_i32(self.location, x, y);
    }

    pub fn set_3_i32<A: UniformApi + ?Sized>(&self, api: &A, x: i32, y: i32, z: i32) {
        api.uniform_3_i32(self.location, x, y, z);
    }

    pub fn set_4_i32<A: UniformApi + ?Sized>(&self, api: &A, x: i32, y: i32, z: i32, w: i32) {
        api.uniform_4_i32(self.location, x, y, z, w);
    }

    /// Sets `count` consecutive `float` elements starting at this location.
    /// Components past `count` are not sent.
    pub fn set_1_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 1, v.len())?;
        api.uniform_1_f32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_2_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 2, v.len())?;
        api.uniform_2_f32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_3_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 3, v.len())?;
        api.uniform_3_f32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_4_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 4, v.len())?;
        api.uniform_4_f32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_1_i32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[i32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 1, v.len())?;
        api.uniform_1_i32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_2_i32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[i32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 2, v.len())?;
        api.uniform_2_i32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_3_i32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[i32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 3, v.len())?;
        api.uniform_3_i32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    pub fn set_4_i32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[i32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 4, v.len())?;
        api.uniform_4_i32_slice(self.location, count, &v[..needed]);
        Ok(())
    }

    /// Matrices are column-major and never transposed by the driver.
    pub fn set_matrix_2_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 4, v.len())?;
        api.uniform_matrix_2_f32_slice(self.location, count, false, &v[..needed]);
        Ok(())
    }

    pub fn set_matrix_3_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 9, v.len())?;
        api.uniform_matrix_3_f32_slice(self.location, count, false, &v[..needed]);
        Ok(())
    }

    pub fn set_matrix_4_f32_slice<A: UniformApi + ?Sized>(
        &self,
        api: &A,
        count: usize,
        v: &[f32],
    ) -> Result<(), UniformError> {
        let (count, needed) = span(count, 16, v.len())?;
        api.uniform_matrix_4_f32_slice(self.location, count, false, &v[..needed]);
        Ok(())
    }

    pub fn set_vector_2<A: UniformApi + ?Sized>(&self, api: &A, v: &Vector2<f32>) {
        self.set_2_f32(api, v.x, v.y);
    }

    pub fn set_vector_3<A: UniformApi + ?Sized>(&self, api: &A, v: &Vector3<f32>) {
        self.set_3_f32(api, v.x, v.y, v.z);
    }

    pub fn set_vector_4<A: UniformApi + ?Sized>(&self, api: &A, v: &Vector4<f32>) {
        self.set_4_f32(api, v.x, v.y, v.z, v.w);
    }

    // nalgebra stores matrices column-major, so `as_slice` is already in
    // the layout the driver expects.

    pub fn set_matrix_2<A: UniformApi + ?Sized>(&self, api: &A, m: &Matrix2<f32>) {
        api.uniform_matrix_2_f32_slice(self.location, 1, false, m.as_slice());
    }

    pub fn set_matrix_3<A: UniformApi + ?Sized>(&self, api: &A, m: &Matrix3<f32>) {
        api.uniform_matrix_3_f32_slice(self.location, 1, false, m.as_slice());
    }

    pub fn set_matrix_4<A: UniformApi + ?Sized>(&self, api: &A, m: &Matrix4<f32>) {
        api.uniform_matrix_4_f32_slice(self.location, 1, false, m.as_slice());
    }

    pub fn set_color<A: UniformApi + ?Sized>(&self, api: &A, color: &Color) {
        self.set_4_f32(api, color.r, color.g, color.b, color.a);
    }

    /// Reads the current value into `out`.
    ///
    /// At most [`MAX_COMPONENTS`] components are written; a shorter `out`
    /// receives the leading components only.
    pub fn get_f32<A: UniformApi + ?Sized>(&self, api: &A, out: &mut [f32]) {
        let mut scratch = [0.0; MAX_COMPONENTS];
        let len = out.len().min(MAX_COMPONENTS);
        scratch[..len].copy_from_slice(&out[..len]);

        api.get_uniform_f32(self.program, self.location, &mut scratch);
        out[..len].copy_from_slice(&scratch[..len]);
    }

    pub fn get_i32<A: UniformApi + ?Sized>(&self, api: &A, out: &mut [i32]) {
        let mut scratch = [0; MAX_COMPONENTS];
        let len = out.len().min(MAX_COMPONENTS);
        scratch[..len].copy_from_slice(&out[..len]);

        api.get_uniform_i32(self.program, self.location, &mut scratch);
        out[..len].copy_from_slice(&scratch[..len]);
    }
}
