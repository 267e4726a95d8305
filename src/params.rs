//! Shape parameters for the whole car.
//!
//! Every dimension and placement the assembler uses lives here. `Default` gives the
//! reference car; a different car is a different `ShapeParameters` value, never a
//! code change. Lateral placements describe the `+z` (left) side only; the right side
//! is always produced by mirroring.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Quaternion, Rad, Rotation3};

use crate::geometry::{
    GeometryError, MeshData, airfoil::AirfoilParams, chassis::ChassisParams, floor::FloorParams,
    primitives, tube::TubeParams,
};

/// Position plus intrinsic X-then-Y-then-Z Euler rotation in radians.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Placement {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl Placement {
    pub const fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            rotation: [0.0; 3],
        }
    }

    pub const fn rotated(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn quaternion(&self) -> Quaternion<f32> {
        let [x, y, z] = self.rotation;
        Quaternion::from_angle_x(Rad(x))
            * Quaternion::from_angle_y(Rad(y))
            * Quaternion::from_angle_z(Rad(z))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderSpec {
    pub top_radius: f32,
    pub bottom_radius: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl CylinderSpec {
    pub fn mesh(&self) -> Result<MeshData, GeometryError> {
        primitives::cylinder(
            self.top_radius,
            self.bottom_radius,
            self.height,
            self.radial_segments,
        )
    }
}

/// Width, height and depth of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpec(pub [f32; 3]);

impl BoxSpec {
    pub fn mesh(&self) -> Result<MeshData, GeometryError> {
        let [w, h, d] = self.0;
        primitives::cuboid(w, h, d)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloorAssembly {
    pub floor: FloorParams,
    pub height: f32,
    pub strake_count: u32,
    pub strake: BoxSpec,
    /// Longitudinal station of the strakes as a fraction of the floor length.
    pub strake_station: f32,
    pub strake_height: f32,
    pub strake_spacing: f32,
    pub strake_rotation: [f32; 3],
}

impl FloorAssembly {
    pub fn strake_placement(&self, i: u32) -> Placement {
        let centre = (self.strake_count as f32 - 1.0) / 2.0;
        Placement::at([
            self.floor.length * self.strake_station,
            self.strake_height,
            (i as f32 - centre) * self.strake_spacing,
        ])
        .rotated(self.strake_rotation)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonocoqueParams {
    pub chassis: ChassisParams,
    pub cockpit: BoxSpec,
    pub cockpit_position: [f32; 3],
    pub halo: TubeParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrontWingParams {
    pub elements: u32,
    /// Element 0; later elements shrink by the steps below.
    pub base: AirfoilParams,
    pub chord_step: f32,
    pub span_step: f32,
    pub thickness_decay: f32,
    pub leading_edge_x: f32,
    pub height: f32,
    pub height_step: f32,
    pub incidence_step: f32,
}

impl FrontWingParams {
    pub fn element(&self, i: u32) -> (AirfoilParams, Placement) {
        let i_f = i as f32;
        let airfoil = AirfoilParams {
            chord: self.base.chord - i_f * self.chord_step,
            span: self.base.span - i_f * self.span_step,
            thickness: self.base.thickness * (1.0 - i_f * self.thickness_decay),
            ..self.base.clone()
        };
        // Extrusion runs along +z from 0, so centre it on the car.
        let placement = Placement::at([
            self.leading_edge_x,
            self.height + i_f * self.height_step,
            -airfoil.span / 2.0,
        ])
        .rotated([0.0, i_f * self.incidence_step, FRAC_PI_2]);
        (airfoil, placement)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoseParams {
    pub cone: CylinderSpec,
    pub cone_placement: Placement,
    pub wing: FrontWingParams,
    pub endplate: BoxSpec,
    pub endplate_placement: Placement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SidepodParams {
    pub inlet: BoxSpec,
    pub inlet_position: [f32; 3],
    pub body: TubeParams,
    pub undercut: TubeParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineParams {
    pub airbox: CylinderSpec,
    pub airbox_position: [f32; 3],
    pub spine: TubeParams,
    pub gill_count: u32,
    pub gill: BoxSpec,
    pub gill_origin: [f32; 3],
    /// Longitudinal and vertical offset between consecutive gills.
    pub gill_step: [f32; 2],
    pub gill_rotation: [f32; 3],
}

impl EngineParams {
    pub fn gill_placement(&self, i: u32) -> Placement {
        let [x, y, z] = self.gill_origin;
        let [dx, dy] = self.gill_step;
        Placement::at([x + i as f32 * dx, y + i as f32 * dy, z]).rotated(self.gill_rotation)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RearWingParams {
    pub pylon: CylinderSpec,
    pub pylon_position: [f32; 3],
    pub main_plane: AirfoilParams,
    pub main_placement: Placement,
    pub flap: AirfoilParams,
    pub flap_placement: Placement,
    pub endplate: BoxSpec,
    pub endplate_position: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct WheelParams {
    pub diameter: f32,
    /// `(x, z)` of the left front and left rear wheel centres.
    pub front_station: [f32; 2],
    pub rear_station: [f32; 2],
    pub clearance: f32,
    pub spokes: u32,
    pub rim_width: f32,
}

impl WheelParams {
    pub fn centre_height(&self) -> f32 {
        self.diameter / 2.0 + self.clearance
    }
}

/// A suspension member running between two pickup points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub start: [f32; 3],
    pub end: [f32; 3],
}

impl Link {
    pub const fn new(start: [f32; 3], end: [f32; 3]) -> Self {
        Self { start, end }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SuspensionParams {
    /// Left-side links; each one is mirrored to the right side.
    pub links: Vec<Link>,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub radial_segments: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentParams {
    pub ground_size: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub grid_height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeParameters {
    pub floor: FloorAssembly,
    pub monocoque: MonocoqueParams,
    pub nose: NoseParams,
    pub sidepod: SidepodParams,
    pub engine: EngineParams,
    pub rear_wing: RearWingParams,
    pub wheels: WheelParams,
    pub suspension: SuspensionParams,
    pub environment: EnvironmentParams,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            floor: FloorAssembly {
                floor: FloorParams::default(),
                height: 0.15,
                strake_count: 4,
                strake: BoxSpec([1.5, 0.015, 0.4]),
                strake_station: 0.65,
                strake_height: 0.35,
                strake_spacing: 0.35,
                strake_rotation: [-FRAC_PI_2, 0.0, -0.25],
            },
            monocoque: MonocoqueParams {
                chassis: ChassisParams::default(),
                cockpit: BoxSpec([1.8, 0.5, 1.2]),
                cockpit_position: [1.5, 1.9, 0.0],
                halo: TubeParams::new(
                    &[[0.8, 1.8, 0.0], [1.2, 2.2, 0.0], [2.2, 2.0, 0.6], [2.8, 1.8, 0.6]],
                    20,
                    0.06,
                    8,
                ),
            },
            nose: NoseParams {
                cone: CylinderSpec {
                    top_radius: 0.08,
                    bottom_radius: 0.35,
                    height: 1.5,
                    radial_segments: 16,
                },
                cone_placement: Placement::at([-0.5, 0.65, 0.0]).rotated([0.0, 0.0, FRAC_PI_2]),
                wing: FrontWingParams {
                    elements: 5,
                    base: AirfoilParams {
                        chord: 0.65,
                        thickness: 0.12,
                        camber: 0.0,
                        points: 30,
                        span: 3.6,
                    },
                    chord_step: 0.05,
                    span_step: 0.15,
                    thickness_decay: 0.015,
                    leading_edge_x: -1.2,
                    height: 0.2,
                    height_step: 0.08,
                    incidence_step: 0.035,
                },
                endplate: BoxSpec([0.3, 0.6, 0.04]),
                endplate_placement: Placement::at([-1.0, 0.35, 1.85]).rotated([0.0, -0.15, 0.0]),
            },
            sidepod: SidepodParams {
                inlet: BoxSpec([0.4, 0.8, 0.7]),
                inlet_position: [1.5, 0.9, 1.3],
                body: TubeParams::new(
                    &[[1.5, 0.9, 1.3], [3.0, 0.7, 1.2], [4.5, 0.5, 0.9], [5.5, 0.4, 0.6]],
                    40,
                    0.35,
                    12,
                ),
                undercut: TubeParams::new(
                    &[[2.0, 0.35, 1.2], [3.5, 0.25, 1.1], [5.0, 0.3, 0.8]],
                    30,
                    0.25,
                    8,
                ),
            },
            engine: EngineParams {
                airbox: CylinderSpec {
                    top_radius: 0.6,
                    bottom_radius: 0.5,
                    height: 1.0,
                    radial_segments: 16,
                },
                airbox_position: [2.5, 2.2, 0.0],
                spine: TubeParams::new(
                    &[[2.5, 2.0, 0.0], [4.0, 1.5, 0.0], [5.5, 1.0, 0.0], [6.5, 0.8, 0.0]],
                    50,
                    0.4,
                    12,
                ),
                gill_count: 6,
                gill: BoxSpec([0.3, 0.03, 0.15]),
                gill_origin: [4.0, 1.3, 0.45],
                gill_step: [0.3, -0.08],
                gill_rotation: [0.0, 0.0, 0.4],
            },
            rear_wing: RearWingParams {
                pylon: CylinderSpec {
                    top_radius: 0.08,
                    bottom_radius: 0.12,
                    height: 1.2,
                    radial_segments: 8,
                },
                pylon_position: [6.2, 1.4, 0.4],
                main_plane: AirfoilParams {
                    chord: 0.85,
                    thickness: 0.14,
                    camber: 0.06,
                    points: 40,
                    span: 2.1,
                },
                main_placement: Placement::at([5.8, 1.95, -1.05]).rotated([-0.14, FRAC_PI_2, 0.0]),
                flap: AirfoilParams {
                    chord: 0.4,
                    thickness: 0.10,
                    camber: 0.12,
                    points: 30,
                    span: 2.1,
                },
                flap_placement: Placement::at([6.4, 1.85, -1.05]).rotated([-0.44, FRAC_PI_2, 0.0]),
                endplate: BoxSpec([0.6, 0.9, 0.04]),
                endplate_position: [6.1, 1.85, 1.08],
            },
            wheels: WheelParams {
                diameter: 0.72,
                front_station: [0.3, 1.6],
                rear_station: [5.2, 1.52],
                clearance: 0.05,
                spokes: 5,
                rim_width: 0.3,
            },
            suspension: SuspensionParams {
                links: vec![
                    // Front wishbones and pushrod.
                    Link::new([0.3, 0.3, 1.6], [1.0, 0.8, 0.9]),
                    Link::new([0.3, 0.65, 1.6], [1.0, 1.2, 0.9]),
                    Link::new([0.3, 0.5, 1.6], [1.0, 1.0, 1.0]),
                    // Rear wishbones and pullrod.
                    Link::new([5.2, 0.3, 1.52], [5.8, 0.7, 1.0]),
                    Link::new([5.2, 0.6, 1.52], [5.8, 1.1, 1.0]),
                    Link::new([5.2, 0.4, 1.52], [5.8, 0.6, 1.1]),
                ],
                inner_radius: 0.025,
                outer_radius: 0.035,
                radial_segments: 8,
            },
            environment: EnvironmentParams {
                ground_size: 50.0,
                grid_size: 20.0,
                grid_divisions: 40,
                grid_height: 0.01,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_wing_elements_shrink_and_climb() {
        let wing = ShapeParameters::default().nose.wing;
        let (first, p0) = wing.element(0);
        let (last, p4) = wing.element(4);
        assert!((first.chord - 0.65).abs() < 1e-6);
        assert!((last.chord - 0.45).abs() < 1e-6);
        assert!((last.span - 3.0).abs() < 1e-6);
        assert!((p4.position[1] - 0.52).abs() < 1e-6);
        assert_eq!(p0.position[2], -first.span / 2.0);
        assert!((p4.rotation[1] - 0.14).abs() < 1e-6);
    }

    #[test]
    fn strakes_are_centred_on_the_car() {
        let floor = ShapeParameters::default().floor;
        let z: Vec<f32> = (0..4).map(|i| floor.strake_placement(i).position[2]).collect();
        assert!((z[0] + z[3]).abs() < 1e-6);
        assert!((z[0] + 0.525).abs() < 1e-6);
    }

    #[test]
    fn wheels_touch_down_above_ground() {
        let wheels = ShapeParameters::default().wheels;
        assert!((wheels.centre_height() - 0.41).abs() < 1e-6);
    }
}
