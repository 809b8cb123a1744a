// src/outfits.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type Rgb = [u8; 3];

/// One selectable costume. Palette keys differ per outfit.
#[derive(Debug, Clone)]
pub struct Outfit {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: HashMap<&'static str, Rgb>,
}

impl Outfit {
    fn new(id: &'static str, name: &'static str, colors: &[(&'static str, Rgb)]) -> Self {
        Self {
            id,
            name,
            colors: colors.iter().copied().collect(),
        }
    }
}

/// Selection order for the previous/next hotspots.
pub static OUTFITS: Lazy<Vec<Outfit>> = Lazy::new(|| {
    vec![
        Outfit::new(
            "SUPERHERO",
            "Superhero",
            &[("body", [50, 100, 200]), ("cape", [200, 50, 50]), ("emblem", [255, 215, 0])],
        ),
        Outfit::new(
            "ASTRONAUT",
            "Astronaut",
            &[
                ("body", [220, 220, 220]),
                ("detail", [180, 180, 180]),
                ("badge1", [50, 50, 255]),
                ("badge2", [255, 50, 50]),
            ],
        ),
        Outfit::new("DINO", "Dino Suit", &[("body", [50, 180, 50]), ("belly", [200, 240, 200])]),
        Outfit::new(
            "WIZARD",
            "Wizard",
            &[("body", [80, 0, 120]), ("stars", [255, 255, 100]), ("hat", [60, 0, 100])],
        ),
        Outfit::new(
            "COWBOY",
            "Cowboy",
            &[("body", [139, 69, 19]), ("shirt", [200, 200, 150]), ("scarf", [200, 0, 0])],
        ),
        Outfit::new(
            "PIRATE",
            "Pirate",
            &[("body", [20, 20, 20]), ("sash", [200, 0, 0]), ("shirt", [240, 240, 240])],
        ),
    ]
});

pub fn outfit(index: usize) -> Option<&'static Outfit> {
    OUTFITS.get(index)
}

pub fn count() -> usize {
    OUTFITS.len()
}
