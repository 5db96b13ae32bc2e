use super::uniform_api::{UniformApi, NOT_FOUND};
use std::{cell::RefCell, collections::HashMap};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Floats {
        location: i32,
        values: Vec<f32>,
    },
    Ints {
        location: i32,
        values: Vec<i32>,
    },
    FloatSlice {
        arity: usize,
        location: i32,
        count: i32,
        values: Vec<f32>,
    },
    IntSlice {
        arity: usize,
        location: i32,
        count: i32,
        values: Vec<i32>,
    },
    Matrix {
        order: usize,
        location: i32,
        count: i32,
        transpose: bool,
        values: Vec<f32>,
    },
    GetFloats {
        program: u32,
        location: i32,
    },
    GetInts {
        program: u32,
        location: i32,
    },
}

#[derive(Clone, Debug)]
enum Stored {
    Floats(Vec<f32>),
    Ints(Vec<i32>),
}

/// Driver double: records every call and keeps the last value written to
/// each location of the program currently in use.
#[derive(Default)]
pub struct FakeApi {
    pub program: u32,
    uniforms: HashMap<String, i32>,
    calls: RefCell<Vec<Call>>,
    values: RefCell<HashMap<i32, Stored>>,
    /// Locations that silently drop writes, like a driver rejecting a type.
    pub read_only: Vec<i32>,
}

impl FakeApi {
    pub fn with_uniforms(program: u32, names: &[&str]) -> Self {
        Self {
            program,
            uniforms: names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.to_string(), i as i32))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn store_f32(&self, location: i32, values: &[f32]) {
        self.values
            .borrow_mut()
            .insert(location, Stored::Floats(values.to_vec()));
    }

    pub fn store_i32(&self, location: i32, values: &[i32]) {
        self.values
            .borrow_mut()
            .insert(location, Stored::Ints(values.to_vec()));
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn write_f32(&self, location: i32, values: &[f32]) {
        if location >= 0 && !self.read_only.contains(&location) {
            self.store_f32(location, values);
        }
    }

    fn write_i32(&self, location: i32, values: &[i32]) {
        if location >= 0 && !self.read_only.contains(&location) {
            self.store_i32(location, values);
        }
    }

    fn float_slice(&self, arity: usize, location: i32, count: i32, v: &[f32]) {
        self.record(Call::FloatSlice {
            arity,
            location,
            count,
            values: v.to_vec(),
        });
        self.write_f32(location, &v[..arity.min(v.len())]);
    }

    fn int_slice(&self, arity: usize, location: i32, count: i32, v: &[i32]) {
        self.record(Call::IntSlice {
            arity,
            location,
            count,
            values: v.to_vec(),
        });
        self.write_i32(location, &v[..arity.min(v.len())]);
    }

    fn matrix(&self, order: usize, location: i32, count: i32, transpose: bool, v: &[f32]) {
        self.record(Call::Matrix {
            order,
            location,
            count,
            transpose,
            values: v.to_vec(),
        });
        self.write_f32(location, &v[..(order * order).min(v.len())]);
    }

    fn floats(&self, location: i32, values: &[f32]) {
        self.record(Call::Floats {
            location,
            values: values.to_vec(),
        });
        self.write_f32(location, values);
    }

    fn ints(&self, location: i32, values: &[i32]) {
        self.record(Call::Ints {
            location,
            values: values.to_vec(),
        });
        self.write_i32(location, values);
    }
}

impl UniformApi for FakeApi {
    fn uniform_location(&self, program: u32, name: &str) -> i32 {
        if program != self.program {
            return NOT_FOUND;
        }

        self.uniforms.get(name).copied().unwrap_or(NOT_FOUND)
    }

    fn uniform_1_f32(&self, location: i32, x: f32) {
        self.floats(location, &[x]);
    }

    fn uniform_2_f32(&self, location: i32, x: f32, y: f32) {
        self.floats(location, &[x, y]);
    }

    fn uniform_3_f32(&self, location: i32, x: f32, y: f32, z: f32) {
        self.floats(location, &[x, y, z]);
    }

    fn uniform_4_f32(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.floats(location, &[x, y, z, w]);
    }

    fn uniform_1_i32(&self, location: i32, x: i32) {
        self.ints(location, &[x]);
    }

    fn uniform_2_i32(&self, location: i32, x: i32, y: i32) {
        self.ints(location, &[x, y]);
    }

    fn uniform_3_i32(&self, location: i32, x: i32, y: i32, z: i32) {
        self.ints(location, &[x, y, z]);
    }

    fn uniform_4_i32(&self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        self.ints(location, &[x, y, z, w]);
    }

    fn uniform_1_f32_slice(&self, location: i32, count: i32, v: &[f32]) {
        self.float_slice(1, location, count, v);
    }

    fn uniform_2_f32_slice(&self, location: i32, count: i32, v: &[f32]) {
        self.float_slice(2, location, count, v);
    }

    fn uniform_3_f32_slice(&self, location: i32, count: i32, v: &[f32]) {
        self.float_slice(3, location, count, v);
    }

    fn uniform_4_f32_slice(&self, location: i32, count: i32, v: &[f32]) {
        self.float_slice(4, location, count, v);
    }

    fn uniform_1_i32_slice(&self, location: i32, count: i32, v: &[i32]) {
        self.int_slice(1, location, count, v);
    }

    fn uniform_2_i32_slice(&self, location: i32, count: i32, v: &[i32]) {
        self.int_slice(2, location, count, v);
    }

    fn uniform_3_i32_slice(&self, location: i32, count: i32, v: &[i32]) {
        self.int_slice(3, location, count, v);
    }

    fn uniform_4_i32_slice(&self, location: i32, count: i32, v: &[i32]) {
        self.int_slice(4, location, count, v);
    }

    fn uniform_matrix_2_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]) {
        self.matrix(2, location, count, transpose, v);
    }

    fn uniform_matrix_3_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]) {
        self.matrix(3, location, count, transpose, v);
    }

    fn uniform_matrix_4_f32_slice(&self, location: i32, count: i32, transpose: bool, v: &[f32]) {
        self.matrix(4, location, count, transpose, v);
    }

    fn get_uniform_f32(&self, program: u32, location: i32, out: &mut [f32]) {
        self.record(Call::GetFloats { program, location });
        if let Some(Stored::Floats(values)) = self.values.borrow().get(&location) {
            out[..values.len()].copy_from_slice(values);
        }
    }

    fn get_uniform_i32(&self, program: u32, location: i32, out: &mut [i32]) {
        self.record(Call::GetInts { program, location });
        if let Some(Stored::Ints(values)) = self.values.borrow().get(&location) {
            out[..values.len()].copy_from_slice(values);
        }
    }
}
