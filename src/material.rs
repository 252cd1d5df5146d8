use crate::canvas::Color;

/// Phong reflection coefficients, and the base color they scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub color: Color,
}

impl Material {
    pub const fn new(
        name: &'static str,
        ambient: f32,
        diffuse: f32,
        specular: f32,
        shininess: f32,
        color: Color,
    ) -> Self {
        Material {
            name,
            ambient,
            diffuse,
            specular,
            shininess,
            color,
        }
    }

    /// A lowercase, dash-separated version of the name, suitable for file names.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

/// The number of preset materials.
pub const NUM_PRESETS: usize = 5;

/// Preset materials, in the order they are bound to the keys `1` through `5`.
pub const PRESETS: [Material; NUM_PRESETS] = [
    Material::new(
        "Copper",
        0.1236,
        0.2965,
        0.3126,
        51.2,
        Color::new(209, 121, 59),
    ),
    Material::new(
        "Turquoise Rubber",
        0.15,
        0.5,
        0.7,
        10.0,
        Color::new(26, 188, 156),
    ),
    Material::new("Red Plastic", 0.1, 0.55, 0.7, 32.0, Color::new(231, 76, 60)),
    Material::new(
        "Pearl",
        0.11,
        0.44,
        0.1483,
        11.264,
        Color::new(234, 224, 200),
    ),
    Material::new(
        "Silver",
        0.2313,
        0.2775,
        0.7739,
        89.6,
        Color::new(189, 195, 199),
    ),
];

/// Fetch the preset at `index`.
///
/// Panics when `index` is not in `0..NUM_PRESETS`; hosts only ever offer valid indices.
pub fn preset(index: usize) -> &'static Material {
    assert!(
        index < NUM_PRESETS,
        "material index {} out of range 0..{}",
        index,
        NUM_PRESETS
    );
    &PRESETS[index]
}

#[test]
fn test_presets() {
    assert_eq!("Copper", preset(0).name);
    assert_eq!("Red Plastic", preset(2).name);
    assert_eq!(Color::new(231, 76, 60), preset(2).color);
    assert_eq!(32.0, preset(2).shininess);
    assert_eq!("turquoise-rubber", preset(1).slug());

    // every pair of presets differs somewhere
    for (i, a) in PRESETS.iter().enumerate() {
        for b in &PRESETS[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[should_panic(expected = "out of range")]
fn test_preset_out_of_range() {
    preset(NUM_PRESETS);
}
