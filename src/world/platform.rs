//! A named holder of one motion `Path` and one orientation `RotationPath`.

use crate::geometry::{Path, PathError, RotationPath, RotationPathError, Vec3};

#[derive(Debug, Clone)]
pub struct Platform {
    name: String,
    path: Path,
    rotation: RotationPath,
}

impl Platform {
    pub fn new(name: impl Into<String>, path: Path, rotation: RotationPath) -> Self {
        Platform { name: name.into(), path, rotation }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn finalize(&mut self) -> Result<(), PathError> {
        self.path.finalize()
    }

    pub fn finalize_rotation(&mut self) -> Result<(), RotationPathError> {
        self.rotation.finalize()
    }

    pub fn position(&self, t: f64) -> Result<Vec3, PathError> {
        self.path.position(t)
    }

    pub fn rotation(&self, t: f64) -> Result<(f64, f64), RotationPathError> {
        self.rotation.position(t)
    }
}
