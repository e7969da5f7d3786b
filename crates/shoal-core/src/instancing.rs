//! Per-instance transforms handed to the renderer

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::sim::Fish;

/// Column-major model matrix for GPU instanced drawing
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub fn from_fish(fish: &Fish) -> Self {
        Self {
            model: Mat4::from_rotation_translation(fish.orientation, fish.position)
                .to_cols_array_2d(),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Rebuild `out` with one transform per fish, reusing its allocation
pub fn write_transforms(school: &[Fish], out: &mut Vec<InstanceTransform>) {
    out.clear();
    out.extend(school.iter().map(InstanceTransform::from_fish));
}
