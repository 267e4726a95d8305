//! Renderer seam and pipeline batching.
//!
//! [`Renderer`] is what the render loop draws through; the wgpu implementation lives in
//! [`crate::renderer`], tests plug in a recording double. The [`Render`] enum describes
//! how one uploaded part is drawn so the GPU renderer can sort parts into per-pipeline
//! batches before issuing draw calls.
//!
//! # Key types
//!
//! - [`Renderer`] draws a [`Scene`] from a [`Camera`]
//! - [`RenderError`] separates recoverable surface problems from fatal ones
//! - [`Render<'a>`] is a batching hint for one or more [`Instanced`] draws

use thiserror::Error;

use crate::{
    camera::Camera,
    data_structures::model::{GpuMaterial, Mesh},
    geometry::Topology,
    resources::GpuPart,
    scene::Scene,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The surface must be reconfigured before the next frame.
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("timed out acquiring the next surface texture")]
    Timeout,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("render failed: {0}")]
    Other(String),
}

impl RenderError {
    /// Whether skipping the frame (and reconfiguring) is enough to continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::SurfaceLost | RenderError::Timeout)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::Timeout => RenderError::Timeout,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(other.to_string()),
        }
    }
}

/// Draws scenes. Implementations own their GPU (or fake) resources.
pub trait Renderer {
    /// Draws one frame. World transforms in `scene` must be current.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;

    fn resize(&mut self, width: u32, height: u32);

    /// Releases every resource. Later calls are no-ops.
    fn dispose(&mut self);
}

/// One instanced draw: a mesh, its material and the per-instance transform buffer.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a Mesh,
    pub material: &'a GpuMaterial,
    pub amount: u32,
}

/// The pipeline a part is drawn with. Passes run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Opaque,
    Lines,
    Transparent,
}

impl Pass {
    pub fn of(topology: Topology, transparent: bool) -> Self {
        match (topology, transparent) {
            (Topology::Lines, _) => Pass::Lines,
            (Topology::Triangles, true) => Pass::Transparent,
            (Topology::Triangles, false) => Pass::Opaque,
        }
    }
}

/// Specifies which pipeline draws an object.
///
/// - `Default` goes through the opaque pipeline
/// - `Transparent` is drawn after all opaque parts, without depth writes
/// - `Lines` uses the line-list pipeline
/// - `Composed` nests any of the above
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Transparent(Instanced<'a>),
    Lines(Instanced<'a>),
    Composed(Vec<Render<'a>>),
}

/// Parts sorted by pipeline, in draw order.
#[derive(Default)]
pub struct Batches<'a> {
    pub opaque: Vec<Instanced<'a>>,
    pub lines: Vec<Instanced<'a>>,
    pub transparent: Vec<Instanced<'a>>,
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.opaque.push(instanced),
            Render::Transparent(instanced) => batches.transparent.push(instanced),
            Render::Lines(instanced) => batches.lines.push(instanced),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a GpuPart> for Render<'a> {
    fn from(part: &'a GpuPart) -> Self {
        if part.mesh.num_elements == 0 {
            return Render::None;
        }
        let instanced = Instanced {
            instance: &part.instance_buffer,
            mesh: &part.mesh,
            material: &part.material,
            amount: 1,
        };
        match Pass::of(part.mesh.topology, part.material.transparent) {
            Pass::Opaque => Render::Default(instanced),
            Pass::Lines => Render::Lines(instanced),
            Pass::Transparent => Render::Transparent(instanced),
        }
    }
}

impl<'a> From<&'a [GpuPart]> for Render<'a> {
    fn from(parts: &'a [GpuPart]) -> Self {
        Render::Composed(parts.iter().map(Render::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_errors_map_to_recoverability() {
        assert!(RenderError::from(wgpu::SurfaceError::Outdated).is_recoverable());
        assert!(RenderError::from(wgpu::SurfaceError::Lost).is_recoverable());
        assert!(!RenderError::from(wgpu::SurfaceError::OutOfMemory).is_recoverable());
        assert!(!RenderError::Other("device lost".into()).is_recoverable());
    }

    #[test]
    fn parts_are_routed_to_their_pass() {
        assert_eq!(Pass::of(Topology::Triangles, false), Pass::Opaque);
        assert_eq!(Pass::of(Topology::Triangles, true), Pass::Transparent);
        assert_eq!(Pass::of(Topology::Lines, false), Pass::Lines);
        assert_eq!(Pass::of(Topology::Lines, true), Pass::Lines);
    }

    #[test]
    fn default_scene_uses_every_pass_with_a_translucent_undercut() {
        use crate::{
            assembly::build_scene, data_structures::material::MaterialPalette,
            params::ShapeParameters,
        };

        let scene = build_scene(&ShapeParameters::default(), &MaterialPalette::default()).unwrap();
        let passes: Vec<_> = scene
            .parts()
            .iter()
            .map(|part| (part.name, Pass::of(part.mesh.topology, part.material.is_transparent())))
            .collect();
        for pass in [Pass::Opaque, Pass::Lines, Pass::Transparent] {
            assert!(passes.iter().any(|(_, p)| *p == pass), "nothing drawn in {pass:?}");
        }
        assert!(
            passes
                .iter()
                .filter(|(_, p)| *p == Pass::Transparent)
                .all(|(name, _)| name.starts_with("undercut"))
        );
    }
}
