//! Builds the car's scene graph from [`ShapeParameters`].
//!
//! Parts are generated once, wrapped in [`MeshNode`]s with a material from the
//! palette and grouped the way a car is built: floor, monocoque, nose, sidepods,
//! engine cover, rear wing, wheels and suspension. Everything left/right symmetric is
//! built on the `+z` side and mirrored.

use std::{
    f32::consts::{FRAC_PI_2, TAU},
    rc::Rc,
};

use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};
use log::info;

use crate::{
    data_structures::{
        instance::Instance,
        material::{Material, MaterialPalette},
        scene_graph::{ContainerNode, MeshNode, SceneNode},
    },
    geometry::{Axis, GeometryError, MeshData, airfoil, chassis, floor, primitives, tube},
    params::{Link, Placement, ShapeParameters, SuspensionParams, WheelParams},
    scene::Scene,
};

fn part(
    name: impl Into<String>,
    mesh: MeshData,
    material: &Rc<Material>,
    placement: impl Into<Instance>,
) -> Box<dyn SceneNode> {
    Box::new(MeshNode::new(name, mesh, material).with_transform(placement.into()))
}

/// Adds `node` and its reflection across the car's centre plane.
fn add_pair(group: &mut ContainerNode, node: Box<dyn SceneNode>) {
    let mirrored = node.mirrored(Axis::Z);
    group.add_child(node);
    group.add_child(mirrored);
}

fn floor_group(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.floor;
    let mut group = ContainerNode::new("floor");
    group.add_child(part(
        "venturi floor",
        floor::venturi_floor(&p.floor)?,
        &palette.carbon,
        Placement::at([0.0, p.height, 0.0]).rotated([-FRAC_PI_2, 0.0, 0.0]),
    ));
    let strake = p.strake.mesh()?;
    for i in 0..p.strake_count {
        group.add_child(part(
            format!("diffuser strake {i}"),
            strake.clone(),
            &palette.matte_carbon,
            p.strake_placement(i),
        ));
    }
    Ok(group)
}

fn monocoque_group(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.monocoque;
    let mut group = ContainerNode::new("monocoque");
    group.add_child(part("chassis", chassis::loft(&p.chassis)?, &palette.body, Instance::default()));
    group.add_child(part(
        "cockpit",
        p.cockpit.mesh()?,
        &palette.matte_carbon,
        Placement::at(p.cockpit_position),
    ));
    add_pair(
        &mut group,
        part("halo left", tube::sweep(&p.halo)?, &palette.matte_carbon, Instance::default()),
    );
    Ok(group)
}

fn nose_group(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.nose;
    let mut group = ContainerNode::new("nose");
    group.add_child(part("nose cone", p.cone.mesh()?, &palette.body, p.cone_placement));
    for i in 0..p.wing.elements {
        let (section, placement) = p.wing.element(i);
        group.add_child(part(
            format!("front wing element {i}"),
            airfoil::extrude(&section)?,
            &palette.carbon,
            placement,
        ));
    }
    add_pair(
        &mut group,
        part(
            "front endplate left",
            p.endplate.mesh()?,
            &palette.body,
            p.endplate_placement,
        ),
    );
    Ok(group)
}

fn sidepod(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.sidepod;
    let mut group = ContainerNode::new("sidepod left");
    group.add_child(part(
        "radiator inlet",
        p.inlet.mesh()?,
        &palette.body,
        Placement::at(p.inlet_position),
    ));
    group.add_child(part("sidepod body", tube::sweep(&p.body)?, &palette.body, Instance::default()));
    group.add_child(part(
        "undercut",
        tube::sweep(&p.undercut)?,
        &palette.undercut,
        Instance::default(),
    ));
    Ok(group)
}

fn engine_group(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.engine;
    let mut group = ContainerNode::new("engine cover");
    group.add_child(part(
        "airbox",
        p.airbox.mesh()?,
        &palette.body,
        Placement::at(p.airbox_position),
    ));
    group.add_child(part("spine", tube::sweep(&p.spine)?, &palette.body, Instance::default()));
    let gill = p.gill.mesh()?;
    for i in 0..p.gill_count {
        add_pair(
            &mut group,
            part(
                format!("gill {i} left"),
                gill.clone(),
                &palette.matte_carbon,
                p.gill_placement(i),
            ),
        );
    }
    Ok(group)
}

fn rear_wing_group(params: &ShapeParameters, palette: &MaterialPalette) -> Result<ContainerNode, GeometryError> {
    let p = &params.rear_wing;
    let mut group = ContainerNode::new("rear wing");
    add_pair(
        &mut group,
        part(
            "pylon left",
            p.pylon.mesh()?,
            &palette.matte_carbon,
            Placement::at(p.pylon_position),
        ),
    );
    group.add_child(part(
        "main plane",
        airfoil::extrude(&p.main_plane)?,
        &palette.carbon,
        p.main_placement,
    ));
    group.add_child(part("flap", airfoil::extrude(&p.flap)?, &palette.body, p.flap_placement));
    add_pair(
        &mut group,
        part(
            "rear endplate left",
            p.endplate.mesh()?,
            &palette.body,
            Placement::at(p.endplate_position),
        ),
    );
    Ok(group)
}

/// One wheel centred on `(x, z)`: tire, rim and spokes.
fn wheel(
    name: &str,
    p: &WheelParams,
    [x, z]: [f32; 2],
    palette: &MaterialPalette,
) -> Result<ContainerNode, GeometryError> {
    let d = p.diameter;
    let mut group = ContainerNode::new(name)
        .with_transform(Instance::from(Vector3::new(x, p.centre_height(), z)));
    group.add_child(part(
        "tire",
        primitives::torus(d * 0.5, d * 0.15, 16, 32)?,
        &palette.tire,
        Placement::default().rotated([0.0, FRAC_PI_2, 0.0]),
    ));
    group.add_child(part(
        "rim",
        primitives::cylinder(d * 0.35, d * 0.35, p.rim_width, 32)?,
        &palette.carbon,
        Placement::default().rotated([0.0, 0.0, FRAC_PI_2]),
    ));
    let spoke = primitives::cuboid(d * 0.3, 0.05, 0.08)?;
    for i in 0..p.spokes {
        let angle = i as f32 / p.spokes as f32 * TAU;
        group.add_child(part(
            format!("spoke {i}"),
            spoke.clone(),
            &palette.matte_carbon,
            Placement::at([d * 0.15 * angle.cos(), d * 0.15 * angle.sin(), 0.0])
                .rotated([0.0, 0.0, angle]),
        ));
    }
    Ok(group)
}

/// A tapered rod from `link.start` to `link.end`, thinning towards `end`.
fn suspension_link(
    name: String,
    link: &Link,
    p: &SuspensionParams,
    palette: &MaterialPalette,
) -> Result<Box<dyn SceneNode>, GeometryError> {
    let start = Vector3::from(link.start);
    let direction = Vector3::from(link.end) - start;
    let length = direction.magnitude();
    let mesh = primitives::cylinder(p.inner_radius, p.outer_radius, length, p.radial_segments)?;
    let rotation = Quaternion::from_arc(Vector3::unit_y(), direction / length, None);
    let instance = Instance::from(start + direction * 0.5).with_rotation(rotation);
    Ok(part(name, mesh, &palette.matte_carbon, instance))
}

/// Builds the full scene. Any degenerate parameter aborts with the generator's error.
pub fn build_scene(params: &ShapeParameters, palette: &MaterialPalette) -> Result<Scene, GeometryError> {
    let mut root = ContainerNode::new("car");
    root.add_child(Box::new(floor_group(params, palette)?));
    root.add_child(Box::new(monocoque_group(params, palette)?));
    root.add_child(Box::new(nose_group(params, palette)?));
    add_pair(&mut root, Box::new(sidepod(params, palette)?));
    root.add_child(Box::new(engine_group(params, palette)?));
    root.add_child(Box::new(rear_wing_group(params, palette)?));

    let wheels = &params.wheels;
    add_pair(
        &mut root,
        Box::new(wheel("front wheel left", wheels, wheels.front_station, palette)?),
    );
    add_pair(
        &mut root,
        Box::new(wheel("rear wheel left", wheels, wheels.rear_station, palette)?),
    );

    let mut suspension = ContainerNode::new("suspension");
    for (i, link) in params.suspension.links.iter().enumerate() {
        add_pair(
            &mut suspension,
            suspension_link(format!("suspension link {i} left"), link, &params.suspension, palette)?,
        );
    }
    root.add_child(Box::new(suspension));

    let env = &params.environment;
    root.add_child(part(
        "ground",
        primitives::plane(env.ground_size, env.ground_size)?,
        &palette.ground,
        Instance::from_rotation(Quaternion::from_angle_x(Rad(-FRAC_PI_2))),
    ));
    root.add_child(part(
        "grid",
        primitives::grid(env.grid_size, env.grid_divisions)?,
        &palette.grid,
        Placement::at([0.0, env.grid_height, 0.0]),
    ));

    let mut scene = Scene::new(root);
    scene.update_world_transforms();
    info!(
        "Scene built with {} meshes and {} triangles",
        scene.mesh_count(),
        scene.triangle_count()
    );
    Ok(scene)
}
