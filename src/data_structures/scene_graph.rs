//! Scene graph and hierarchical scene organization.
//!
//! A tree of [`SceneNode`]s: groups ([`ContainerNode`]) and drawable parts
//! ([`MeshNode`]). Parents own their children; each node keeps a local transform set
//! by the assembler and a world transform recomputed by
//! [`SceneNode::update_world_transforms`].

use std::rc::Rc;

use crate::{
    data_structures::{instance::Instance, material::Material},
    geometry::{Axis, MeshData},
};

/// One drawable part as seen by a renderer: geometry, material and world placement.
#[derive(Clone, Copy, Debug)]
pub struct MeshPart<'a> {
    pub name: &'a str,
    pub mesh: &'a MeshData,
    pub material: &'a Rc<Material>,
    pub world: &'a Instance,
}

pub trait SceneNode {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> &Instance;

    fn set_local_transform(&mut self, instance: Instance);

    fn get_world_transform(&self) -> &Instance;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    /// The mesh and material of this node, if it draws anything itself.
    fn get_mesh(&self) -> Option<(&MeshData, &Rc<Material>)>;

    /// Recomputes this node's world transform from its parent's and recurses.
    fn update_world_transforms(&mut self, parent: &Instance);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /**
     * Deep copy reflected across the plane orthogonal to `axis`.
     *
     * Geometry is reflected and owned by the copy, local transforms are conjugated by
     * the reflection and materials are shared with the source.
     */
    fn mirrored(&self, axis: Axis) -> Box<dyn SceneNode>;

    /// Every drawable part in this subtree, depth first, parents before children.
    fn get_render(&self) -> Vec<MeshPart<'_>>;
}

/// Finds the first node named `name` in the subtree rooted at `node`.
pub fn find<'a>(node: &'a dyn SceneNode, name: &str) -> Option<&'a dyn SceneNode> {
    if node.name() == name {
        return Some(node);
    }
    node.get_children()
        .iter()
        .find_map(|child| find(child.as_ref(), name))
}

/// Number of nodes in the subtree rooted at `node`, including itself.
pub fn count_nodes(node: &dyn SceneNode) -> usize {
    1 + node
        .get_children()
        .iter()
        .map(|child| count_nodes(child.as_ref()))
        .sum::<usize>()
}

fn mirrored_name(name: &str) -> String {
    if let Some(stem) = name.strip_suffix(" left") {
        format!("{stem} right")
    } else {
        format!("{name} (mirrored)")
    }
}

fn propagate(children: &mut [Box<dyn SceneNode>], world: &Instance) {
    for child in children.iter_mut() {
        child.update_world_transforms(world);
    }
}

pub struct ContainerNode {
    name: String,
    pub children: Vec<Box<dyn SceneNode>>,
    /// Local and world transform.
    pub instance: (Instance, Instance),
}

impl ContainerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: vec![],
            instance: (Instance::default(), Instance::default()),
        }
    }

    pub fn with_transform(mut self, local: Instance) -> Self {
        self.instance.0 = local;
        self
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.instance.0
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.instance.0 = instance;
    }

    fn get_world_transform(&self) -> &Instance {
        &self.instance.1
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn get_mesh(&self) -> Option<(&MeshData, &Rc<Material>)> {
        None
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        let (local, world) = &mut self.instance;
        *world = parent * &*local;
        let world = world.clone();
        propagate(&mut self.children, &world);
    }

    fn mirrored(&self, axis: Axis) -> Box<dyn SceneNode> {
        let local = self.instance.0.mirrored(axis);
        Box::new(Self {
            name: mirrored_name(&self.name),
            children: self.children.iter().map(|c| c.mirrored(axis)).collect(),
            instance: (local.clone(), local),
        })
    }

    fn get_render(&self) -> Vec<MeshPart<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

pub struct MeshNode {
    name: String,
    children: Vec<Box<dyn SceneNode>>,
    instance: (Instance, Instance),
    mesh: MeshData,
    material: Rc<Material>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, mesh: MeshData, material: &Rc<Material>) -> Self {
        Self {
            name: name.into(),
            children: vec![],
            instance: (Instance::default(), Instance::default()),
            mesh,
            material: Rc::clone(material),
        }
    }

    pub fn with_transform(mut self, local: Instance) -> Self {
        self.instance.0 = local;
        self
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.instance.0
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.instance.0 = instance;
    }

    fn get_world_transform(&self) -> &Instance {
        &self.instance.1
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn get_mesh(&self) -> Option<(&MeshData, &Rc<Material>)> {
        Some((&self.mesh, &self.material))
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        let (local, world) = &mut self.instance;
        *world = parent * &*local;
        let world = world.clone();
        propagate(&mut self.children, &world);
    }

    fn mirrored(&self, axis: Axis) -> Box<dyn SceneNode> {
        let local = self.instance.0.mirrored(axis);
        Box::new(Self {
            name: mirrored_name(&self.name),
            children: self.children.iter().map(|c| c.mirrored(axis)).collect(),
            instance: (local.clone(), local),
            mesh: self.mesh.mirrored(axis),
            material: Rc::clone(&self.material),
        })
    }

    fn get_render(&self) -> Vec<MeshPart<'_>> {
        [MeshPart {
            name: &self.name,
            mesh: &self.mesh,
            material: &self.material,
            world: &self.instance.1,
        }]
        .into_iter()
        .chain(self.children.iter().flat_map(|child| child.get_render()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data_structures::material::MaterialPalette, geometry::primitives};
    use cgmath::Vector3;

    fn arm() -> MeshNode {
        MeshNode::new(
            "arm left",
            primitives::cuboid(1.0, 0.2, 0.2).unwrap(),
            &MaterialPalette::default().carbon,
        )
        .with_transform(Instance::from(Vector3::new(0.0, 0.0, 1.5)))
    }

    #[test]
    fn world_transforms_compose_down_the_tree() {
        let mut root = ContainerNode::new("root")
            .with_transform(Instance::from(Vector3::new(2.0, 0.0, 0.0)));
        root.add_child(Box::new(arm()));
        root.update_world_transform_all();
        let parts = root.get_render();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].world.position, Vector3::new(2.0, 0.0, 1.5));
    }

    #[test]
    fn mirroring_renames_and_shares_material() {
        let source = arm();
        let mirrored = source.mirrored(Axis::Z);
        assert_eq!(mirrored.name(), "arm right");
        let (mesh, material) = mirrored.get_mesh().unwrap();
        assert!(Rc::ptr_eq(material, source.material()));
        assert_eq!(mesh, &source.mesh().mirrored(Axis::Z));
        assert_eq!(mirrored.get_local_transform().position.z, -1.5);
    }

    #[test]
    fn find_and_count_walk_the_whole_tree() {
        let mut group = ContainerNode::new("group");
        group.add_child(Box::new(arm()));
        let mut root = ContainerNode::new("root");
        root.add_child(Box::new(group));
        assert_eq!(count_nodes(&root), 3);
        assert!(find(&root, "arm left").is_some());
        assert!(find(&root, "arm right").is_none());
    }
}
