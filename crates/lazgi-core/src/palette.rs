//! Ikat dye palette. Medallion layers index into this table.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub rgb: [f32; 3],
}

impl PaletteColor {
    pub const fn new(name: &'static str, rgb: [f32; 3]) -> Self {
        Self { name, rgb }
    }
}

pub const PALETTE_SIZE: usize = 14;

pub const PALETTE: [PaletteColor; PALETTE_SIZE] = [
    PaletteColor::new("indigo", [0.18, 0.20, 0.55]),
    PaletteColor::new("madder", [0.72, 0.16, 0.18]),
    PaletteColor::new("saffron", [0.96, 0.71, 0.16]),
    PaletteColor::new("pomegranate", [0.60, 0.08, 0.24]),
    PaletteColor::new("turquoise", [0.20, 0.70, 0.72]),
    PaletteColor::new("ivory", [0.96, 0.93, 0.84]),
    PaletteColor::new("walnut", [0.36, 0.24, 0.16]),
    PaletteColor::new("emerald", [0.10, 0.52, 0.34]),
    PaletteColor::new("violet", [0.46, 0.26, 0.62]),
    PaletteColor::new("rose", [0.90, 0.50, 0.60]),
    PaletteColor::new("ochre", [0.80, 0.55, 0.20]),
    PaletteColor::new("charcoal", [0.14, 0.14, 0.16]),
    PaletteColor::new("sky", [0.52, 0.74, 0.92]),
    PaletteColor::new("apricot", [0.98, 0.66, 0.48]),
];

#[inline]
pub fn color(index: usize) -> [f32; 3] {
    PALETTE[index % PALETTE_SIZE].rgb
}
