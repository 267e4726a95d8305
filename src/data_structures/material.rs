//! Surface materials and the shared palette.

use std::rc::Rc;

/// Physically based shading parameters. Colours are stored in linear space.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub opacity: f32,
}

impl Material {
    pub fn new(name: &'static str, hex: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            name,
            base_color: srgb_hex_to_linear(hex),
            metalness,
            roughness,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            opacity: 1.0,
        }
    }

    pub fn with_clearcoat(mut self, clearcoat: f32, roughness: f32) -> Self {
        self.clearcoat = clearcoat;
        self.clearcoat_roughness = roughness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts a `0xRRGGBB` sRGB colour to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

/// Every material the car uses, each instantiated exactly once.
///
/// Nodes hold clones of these `Rc`s, so two parts painted the same share one
/// allocation and `Rc::ptr_eq` identifies them.
#[derive(Clone, Debug)]
pub struct MaterialPalette {
    pub body: Rc<Material>,
    pub carbon: Rc<Material>,
    pub matte_carbon: Rc<Material>,
    pub undercut: Rc<Material>,
    pub tire: Rc<Material>,
    pub ground: Rc<Material>,
    pub grid: Rc<Material>,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            body: Rc::new(Material::new("body red", 0xC8102E, 0.9, 0.15).with_clearcoat(1.0, 0.1)),
            carbon: Rc::new(Material::new("carbon fiber", 0x111111, 0.95, 0.2)),
            matte_carbon: Rc::new(Material::new("matte carbon", 0x1A1A1A, 0.3, 0.8)),
            undercut: Rc::new(
                Material::new("undercut yellow", 0xFFE800, 0.6, 0.25)
                    .with_clearcoat(0.8, 0.0)
                    .with_opacity(0.3),
            ),
            tire: Rc::new(Material::new("tire", 0x222222, 0.0, 0.95)),
            ground: Rc::new(Material::new("ground", 0x0A0A0A, 0.2, 0.8)),
            grid: Rc::new(Material::new("grid", 0x222222, 0.0, 1.0).with_opacity(0.3)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion_hits_the_endpoints() {
        assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        assert_eq!(srgb_hex_to_linear(0xFFFFFF), [1.0, 1.0, 1.0]);
        let red = srgb_hex_to_linear(0xC8102E);
        assert!(red[0] > 0.5 && red[1] < 0.01 && red[2] < 0.05);
    }

    #[test]
    fn only_translucent_materials_are_transparent() {
        let palette = MaterialPalette::default();
        assert!(palette.undercut.is_transparent());
        assert!(palette.grid.is_transparent());
        assert!(!palette.body.is_transparent());
        assert!(!palette.tire.is_transparent());
    }
}
