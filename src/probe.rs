//! Write-then-read-back checks of uniform values against a live program.
//!
//! A probe file names a vertex and fragment shader and lists uniform values:
//!
//! ```json
//! {
//!     "vertex_shader": "shaders/probe_vertex.glsl",
//!     "fragment_shader": "shaders/probe_fragment.glsl",
//!     "uniforms": [
//!         { "name": "tint", "value": { "float": [1.0, 0.5, 0.0, 1.0] } },
//!         { "name": "level", "value": { "int": [3] } }
//!     ]
//! }
//! ```

use crate::render::{
    gl_program::GlProgram,
    program_error::ProgramError,
    shader::Shader,
    uniform::{Uniform, UniformError},
    uniform_api::UniformApi,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to read probe file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid probe file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Program(#[from] ProgramError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValueError {
    #[error("{kind} uniforms take 1 to 4 components, got {len}")]
    Arity { kind: &'static str, len: usize },
    #[error("{kind} needs {expected} components, got {len}")]
    MatrixSize {
        kind: &'static str,
        expected: usize,
        len: usize,
    },
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeValue {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Mat2(Vec<f32>),
    Mat3(Vec<f32>),
    Mat4(Vec<f32>),
}

impl ProbeValue {
    fn kind(&self) -> &'static str {
        match self {
            ProbeValue::Float(_) => "float",
            ProbeValue::Int(_) => "int",
            ProbeValue::Mat2(_) => "mat2",
            ProbeValue::Mat3(_) => "mat3",
            ProbeValue::Mat4(_) => "mat4",
        }
    }
}

impl fmt::Display for ProbeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: &dyn fmt::Debug = match self {
            ProbeValue::Int(v) => v,
            ProbeValue::Float(v)
            | ProbeValue::Mat2(v)
            | ProbeValue::Mat3(v)
            | ProbeValue::Mat4(v) => v,
        };

        write!(f, "{} {:?}", self.kind(), components)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProbeEntry {
    pub name: String,
    pub value: ProbeValue,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProbeFile {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub uniforms: Vec<ProbeEntry>,
}

impl ProbeFile {
    pub fn load(path: &Path) -> Result<Self, ProbeError> {
        let json = std::fs::read_to_string(path).map_err(|source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ProbeError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Match,
    Mismatch {
        expected: ProbeValue,
        actual: ProbeValue,
    },
    NotFound,
    Rejected(ValueError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Match => write!(f, "ok"),
            Outcome::Mismatch { expected, actual } => {
                write!(f, "mismatch: wrote {expected}, read {actual}")
            }
            Outcome::NotFound => write!(f, "not an active uniform"),
            Outcome::Rejected(error) => write!(f, "rejected: {error}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProbeReport {
    pub outcomes: Vec<(String, Outcome)>,
}

impl ProbeReport {
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| *outcome == Outcome::Match)
    }
}

fn write_value<A: UniformApi + ?Sized>(
    api: &A,
    uniform: &Uniform,
    value: &ProbeValue,
) -> Result<(), ValueError> {
    let matrix_size = |expected: usize, len: usize| -> Result<(), ValueError> {
        if len == expected {
            Ok(())
        } else {
            Err(ValueError::MatrixSize {
                kind: value.kind(),
                expected,
                len,
            })
        }
    };

    match value {
        ProbeValue::Float(v) => match v.as_slice() {
            &[x] => uniform.set_f32(api, x),
            &[x, y] => uniform.set_2_f32(api, x, y),
            &[x, y, z] => uniform.set_3_f32(api, x, y, z),
            &[x, y, z, w] => uniform.set_4_f32(api, x, y, z, w),
            _ => {
                return Err(ValueError::Arity {
                    kind: value.kind(),
                    len: v.len(),
                })
            }
        },
        ProbeValue::Int(v) => match v.as_slice() {
            &[x] => uniform.set_i32(api, x),
            &[x, y] => uniform.set_2_i32(api, x, y),
            &[x, y, z] => uniform.set_3_i32(api, x, y, z),
            &[x, y, z, w] => uniform.set_4_i32(api, x, y, z, w),
            _ => {
                return Err(ValueError::Arity {
                    kind: value.kind(),
                    len: v.len(),
                })
            }
        },
        ProbeValue::Mat2(v) => {
            matrix_size(4, v.len())?;
            uniform.set_matrix_2_f32_slice(api, 1, v)?;
        }
        ProbeValue::Mat3(v) => {
            matrix_size(9, v.len())?;
            uniform.set_matrix_3_f32_slice(api, 1, v)?;
        }
        ProbeValue::Mat4(v) => {
            matrix_size(16, v.len())?;
            uniform.set_matrix_4_f32_slice(api, 1, v)?;
        }
    }

    Ok(())
}

fn read_back<A: UniformApi + ?Sized>(api: &A, uniform: &Uniform, like: &ProbeValue) -> ProbeValue {
    let floats = |len: usize| {
        let mut out = vec![0.0; len];
        uniform.get_f32(api, &mut out);
        out
    };

    match like {
        ProbeValue::Float(v) => ProbeValue::Float(floats(v.len())),
        ProbeValue::Mat2(v) => ProbeValue::Mat2(floats(v.len())),
        ProbeValue::Mat3(v) => ProbeValue::Mat3(floats(v.len())),
        ProbeValue::Mat4(v) => ProbeValue::Mat4(floats(v.len())),
        ProbeValue::Int(v) => {
            let mut out = vec![0; v.len()];
            uniform.get_i32(api, &mut out);
            ProbeValue::Int(out)
        }
    }
}

fn probe_entry<A: UniformApi + ?Sized>(api: &A, program: u32, entry: &ProbeEntry) -> Outcome {
    let uniform = Uniform::locate(api, program, &entry.name);
    if !uniform.is_found() {
        return Outcome::NotFound;
    }

    if let Err(error) = write_value(api, &uniform, &entry.value) {
        return Outcome::Rejected(error);
    }

    let actual = read_back(api, &uniform, &entry.value);
    if actual == entry.value {
        Outcome::Match
    } else {
        Outcome::Mismatch {
            expected: entry.value.clone(),
            actual,
        }
    }
}

/// Writes every entry into `program` and reads it back.
///
/// `program` must be in use on the current context.
pub fn probe<A: UniformApi + ?Sized>(api: &A, program: u32, entries: &[ProbeEntry]) -> ProbeReport {
    ProbeReport {
        outcomes: entries
            .iter()
            .map(|entry| {
                let outcome = probe_entry(api, program, entry);
                log::debug!("{}: {}", entry.name, outcome);
                (entry.name.clone(), outcome)
            })
            .collect(),
    }
}

/// Links the program described by `file` and probes its uniforms.
/// Relative shader paths are resolved against `shader_root`.
pub fn run(
    gl: &glow::Context,
    file: &ProbeFile,
    shader_root: &Path,
) -> Result<ProbeReport, ProbeError> {
    let vertex = Shader::from_file(
        gl,
        &shader_root.join(&file.vertex_shader),
        glow::VERTEX_SHADER,
    )?;
    let fragment = Shader::from_file(
        gl,
        &shader_root.join(&file.fragment_shader),
        glow::FRAGMENT_SHADER,
    )?;

    let program = GlProgram::with_shaders(gl, &[&vertex, &fragment])?;
    program.use_by(gl);

    let report = probe(gl, program.id(), &file.uniforms);

    program.delete(gl);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fake_api::{Call, FakeApi};

    fn entry(name: &str, value: ProbeValue) -> ProbeEntry {
        ProbeEntry {
            name: name.to_owned(),
            value,
        }
    }

    #[test]
    fn parses_probe_file() {
        let file = ProbeFile::from_json(
            r#"{
                "vertex_shader": "v.glsl",
                "fragment_shader": "f.glsl",
                "uniforms": [
                    { "name": "tint", "value": { "float": [1.0, 0.5] } },
                    { "name": "level", "value": { "int": [3] } },
                    { "name": "rot", "value": { "mat2": [0.0, 1.0, -1.0, 0.0] } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(file.vertex_shader, PathBuf::from("v.glsl"));
        assert_eq!(
            file.uniforms,
            vec![
                entry("tint", ProbeValue::Float(vec![1.0, 0.5])),
                entry("level", ProbeValue::Int(vec![3])),
                entry("rot", ProbeValue::Mat2(vec![0.0, 1.0, -1.0, 0.0])),
            ]
        );
    }

    #[test]
    fn bundled_probe_file_parses() {
        let file = ProbeFile::from_json(include_str!("../probes/basic.json")).unwrap();
        assert_eq!(file.uniforms.len(), 6);
        assert!(file
            .uniforms
            .iter()
            .any(|entry| matches!(&entry.value, ProbeValue::Mat4(v) if v.len() == 16)));
    }

    #[test]
    fn unknown_value_kind_is_an_error() {
        let result = ProbeFile::from_json(
            r#"{
                "vertex_shader": "v.glsl",
                "fragment_shader": "f.glsl",
                "uniforms": [{ "name": "x", "value": { "double": [1.0] } }]
            }"#,
        );

        assert!(matches!(result, Err(ProbeError::Json(_))));
    }

    #[test]
    fn faithful_driver_matches() {
        let api = FakeApi::with_uniforms(3, &["tint", "level", "model"]);
        let model: Vec<f32> = (0..16).map(|i| i as f32).collect();

        let report = probe(
            &api,
            3,
            &[
                entry("tint", ProbeValue::Float(vec![1.0, 0.5, 0.25, 1.0])),
                entry("level", ProbeValue::Int(vec![-2, 7])),
                entry("model", ProbeValue::Mat4(model)),
            ],
        );

        assert!(report.is_success(), "{report:?}");
        assert_eq!(report.outcomes.len(), 3);
    }

    #[test]
    fn uses_scalar_entry_points_for_vectors() {
        let api = FakeApi::with_uniforms(3, &["offset"]);
        probe(&api, 3, &[entry("offset", ProbeValue::Float(vec![0.5, -0.5]))]);

        assert_eq!(
            api.calls(),
            vec![
                Call::Floats {
                    location: 0,
                    values: vec![0.5, -0.5]
                },
                Call::GetFloats {
                    program: 3,
                    location: 0
                },
            ]
        );
    }

    #[test]
    fn missing_uniform_is_reported() {
        let api = FakeApi::with_uniforms(3, &["tint"]);
        let report = probe(&api, 3, &[entry("glow", ProbeValue::Int(vec![1]))]);

        assert_eq!(report.outcomes, vec![("glow".to_owned(), Outcome::NotFound)]);
        assert!(!report.is_success());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn bad_arity_is_rejected_before_driver_call() {
        let api = FakeApi::with_uniforms(3, &["tint", "rot"]);
        let report = probe(
            &api,
            3,
            &[
                entry("tint", ProbeValue::Float(vec![1.0; 5])),
                entry("rot", ProbeValue::Mat3(vec![1.0; 4])),
            ],
        );

        assert_eq!(
            report.outcomes,
            vec![
                (
                    "tint".to_owned(),
                    Outcome::Rejected(ValueError::Arity {
                        kind: "float",
                        len: 5
                    })
                ),
                (
                    "rot".to_owned(),
                    Outcome::Rejected(ValueError::MatrixSize {
                        kind: "mat3",
                        expected: 9,
                        len: 4
                    })
                ),
            ]
        );
        assert!(api.calls().is_empty());
    }

    #[test]
    fn dropped_write_is_a_mismatch() {
        let mut api = FakeApi::with_uniforms(3, &["level"]);
        api.read_only.push(0);
        api.store_i32(0, &[1]);

        let report = probe(&api, 3, &[entry("level", ProbeValue::Int(vec![4]))]);

        assert_eq!(
            report.outcomes,
            vec![(
                "level".to_owned(),
                Outcome::Mismatch {
                    expected: ProbeValue::Int(vec![4]),
                    actual: ProbeValue::Int(vec![1]),
                }
            )]
        );
    }

    #[test]
    fn outcome_display() {
        let mismatch = Outcome::Mismatch {
            expected: ProbeValue::Int(vec![4]),
            actual: ProbeValue::Int(vec![1]),
        };

        assert_eq!(Outcome::Match.to_string(), "ok");
        assert_eq!(mismatch.to_string(), "mismatch: wrote int [4], read int [1]");
        assert_eq!(
            ProbeValue::Mat2(vec![1.0, 0.0, 0.0, 1.0]).to_string(),
            "mat2 [1.0, 0.0, 0.0, 1.0]"
        );
    }
}
