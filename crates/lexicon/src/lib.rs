//! Word-pair catalogue and role arithmetic for wordblur sessions.
//!
//! Every round deals from a fixed table of near-miss word pairs: the crew
//! all see the first word, the blur sees the second, and blanks see nothing.
//! The role split per roster size lives here too, so the gameplay crate
//! never hardcodes faction arithmetic.

use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// A crew word and its near-miss counterpart dealt to the blur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub crew: String,
    pub blur: String,
}

impl WordPair {
    /// Draw a uniformly random pair from the catalogue.
    pub fn draw(rng: &mut impl Rng) -> Self {
        let (crew, blur) = CATALOGUE[rng.random_range(0..CATALOGUE.len())];
        Self {
            crew: crew.to_string(),
            blur: blur.to_string(),
        }
    }
}

/// How many players of each role a roster of a given size receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distribution {
    pub crew: usize,
    pub blur: usize,
    pub blank: usize,
}

impl Distribution {
    /// Role counts for a roster size. Sessions start with 3..=15 players;
    /// anything smaller degenerates to an all-crew split.
    pub fn of(players: usize) -> Self {
        match players {
            0..=2 => Self { crew: 2, blur: 0, blank: 0 },
            3..=4 => Self { crew: players - 1, blur: 1, blank: 0 },
            5..=9 => Self { crew: players - 2, blur: 1, blank: 1 },
            10..=12 => Self { crew: players - 3, blur: 2, blank: 1 },
            _ => Self { crew: players - 4, blur: 2, blank: 2 },
        }
    }
    /// Total seats the split covers.
    pub fn total(&self) -> usize {
        self.crew + self.blur + self.blank
    }
}

/// Crew word first, blur word second. Pairs are near misses on purpose,
/// close enough that a clue for one could pass for the other.
#[rustfmt::skip]
const CATALOGUE: [(&str, &str); 48] = [
    ("Pancake",    "Waffle"),
    ("Violin",     "Cello"),
    ("Ocean",      "Sea"),
    ("Bee",        "Wasp"),
    ("Castle",     "Palace"),
    ("Soup",       "Stew"),
    ("Boots",      "Sandals"),
    ("Ladder",     "Stairs"),
    ("Mirror",     "Window"),
    ("Pilot",      "Sailor"),
    ("Comet",      "Meteor"),
    ("Island",     "Peninsula"),
    ("Butter",     "Cheese"),
    ("Spoon",      "Fork"),
    ("Helmet",     "Hat"),
    ("Tunnel",     "Cave"),
    ("Candle",     "Lantern"),
    ("Wizard",     "Witch"),
    ("Pirate",     "Viking"),
    ("Desert",     "Beach"),
    ("Glacier",    "Iceberg"),
    ("Thunder",    "Lightning"),
    ("Farmer",     "Gardener"),
    ("Honey",      "Jam"),
    ("Clock",      "Watch"),
    ("Carpet",     "Rug"),
    ("Rocket",     "Satellite"),
    ("Painter",    "Sculptor"),
    ("Diary",      "Letter"),
    ("Circus",     "Carnival"),
    ("Whale",      "Dolphin"),
    ("Eagle",      "Hawk"),
    ("Maple",      "Oak"),
    ("Chess",      "Checkers"),
    ("Opera",      "Ballet"),
    ("Museum",     "Library"),
    ("Blanket",    "Pillow"),
    ("Umbrella",   "Raincoat"),
    ("Juice",      "Smoothie"),
    ("Cookie",     "Brownie"),
    ("Tent",       "Cabin"),
    ("Canoe",      "Kayak"),
    ("Magnet",     "Compass"),
    ("Feather",    "Leaf"),
    ("Drum",       "Trumpet"),
    ("Scarf",      "Gloves"),
    ("Lighthouse", "Windmill"),
    ("Robot",      "Drone"),
];
