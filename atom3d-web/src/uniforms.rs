/// Uniform writes recorded for replay on a WebGL program
use nalgebra::{Matrix4, Vector3};

use atom3d_core::ShaderProgram;

/// Column-major copy of a matrix, the layout `uniformMatrix4fv` expects
fn mat4_values(matrix: &Matrix4<f32>) -> Vec<f32> {
    matrix.as_slice().to_vec()
}

fn vec3_values(vector: &Vector3<f32>) -> Vec<f32> {
    vector.as_slice().to_vec()
}

/// Records uniform writes in order so the page can replay them on a real
/// WebGL program. Setting a name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformRecorder {
    values: Vec<(String, Vec<f32>)>,
}

impl UniformRecorder {
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    fn set(&mut self, name: &str, value: Vec<f32>) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }
}

impl ShaderProgram for UniformRecorder {
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        self.set(name, mat4_values(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set(name, vec3_values(&value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_and_order_kept() {
        let mut recorder = UniformRecorder::default();
        recorder.set_vec3("objectColor", Vector3::new(1.0, 0.0, 0.0));
        recorder.set_mat4("model", &Matrix4::identity());
        recorder.set_vec3("objectColor", Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(recorder.names(), vec!["objectColor", "model"]);
        assert_eq!(recorder.get("objectColor"), Some(&[0.0, 0.0, 1.0][..]));
    }

    #[test]
    fn test_matrix_is_column_major() {
        let mut recorder = UniformRecorder::default();
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        recorder.set_mat4("model", &m);
        let values = recorder.get("model").unwrap();
        assert_eq!(&values[12..15], &[1.0, 2.0, 3.0]);
    }
}
