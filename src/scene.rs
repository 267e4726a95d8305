//! The assembled scene: the node tree plus everything a renderer needs to light it.

use std::f32::consts::FRAC_PI_6;

use cgmath::Quaternion;

use crate::data_structures::{
    instance::Instance,
    material::srgb_hex_to_linear,
    scene_graph::{ContainerNode, MeshPart, SceneNode},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Parallel light shining from `position` towards `target`.
    Directional,
    /// Cone light with half-angle `angle` and a soft edge over the outer `penumbra` fraction.
    Spot { angle: f32, penumbra: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Light {
    pub fn directional(position: [f32; 3], hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position,
            target: [0.0; 3],
            color: srgb_hex_to_linear(hex),
            intensity,
        }
    }

    pub fn spot(position: [f32; 3], hex: u32, intensity: f32, angle: f32, penumbra: f32) -> Self {
        Self {
            kind: LightKind::Spot { angle, penumbra },
            ..Self::directional(position, hex, intensity)
        }
    }
}

/// Ambient term plus the four light sources: key, fill, rim and the overhead spot.
#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub lights: [Light; 4],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_color: srgb_hex_to_linear(0xFFFFFF),
            ambient_intensity: 0.4,
            lights: [
                Light::directional([10.0, 15.0, 10.0], 0xFFFFFF, 1.2),
                Light::directional([-8.0, 8.0, -8.0], 0x4488FF, 0.6),
                Light::directional([0.0, 5.0, -15.0], 0xFF4444, 0.8),
                Light::spot([0.0, 20.0, 0.0], 0xFFFFFF, 0.8, FRAC_PI_6, 0.3),
            ],
        }
    }
}

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: srgb_hex_to_linear(0x0A0A0A),
            near: 20.0,
            far: 50.0,
        }
    }
}

pub struct Scene {
    pub root: ContainerNode,
    pub lighting: Lighting,
    pub fog: Fog,
    pub background: [f32; 3],
}

impl Scene {
    pub fn new(root: ContainerNode) -> Self {
        Self {
            root,
            lighting: Lighting::default(),
            fog: Fog::default(),
            background: srgb_hex_to_linear(0x0A0A0A),
        }
    }

    /// Sets the rotation of the whole model. This is the only per-frame transform write.
    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        let local = self.root.get_local_transform().clone().with_rotation(rotation);
        self.root.set_local_transform(local);
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.root.get_local_transform().rotation
    }

    pub fn update_world_transforms(&mut self) {
        self.root.update_world_transforms(&Instance::default());
    }

    pub fn parts(&self) -> Vec<MeshPart<'_>> {
        self.root.get_render()
    }

    pub fn mesh_count(&self) -> usize {
        self.parts().len()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts().iter().map(|p| p.mesh.triangle_count()).sum()
    }
}
