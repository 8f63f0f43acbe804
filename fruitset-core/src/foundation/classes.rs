/// Canonical detector class list; a class id is the name's position here.
///
/// The order is load-bearing: trained weights, label files and the dataset
/// manifest all assume this exact id assignment.
pub const CLASS_NAMES: [&str; 21] = [
    "AppleGreenHalf",
    "AppleGreenWhole",
    "BananaHalf",
    "BananaWhole",
    "CoconutHalf",
    "CoconutWhole",
    "KiwifruitHalf",
    "KiwifruitWhole",
    "LemonHalf",
    "LemonWhole",
    "MangoHalf",
    "MangoWhole",
    "OrangeHalf",
    "OrangeWhole",
    "PeachHalf",
    "PeachWhole",
    "PineappleHalf",
    "PineappleWhole",
    "WatermelonHalf",
    "WatermelonWhole",
    "bomb",
];

/// Detector class id for a normalized (digit-free) class name, `-1` when the
/// name is not in [`CLASS_NAMES`].
pub fn class_id(name: &str) -> i32 {
    CLASS_NAMES
        .iter()
        .position(|n| *n == name)
        .map_or(-1, |i| i as i32)
}

/// Layer role parsed from a capture's class segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassVariant {
    /// Ordinary sprite layer.
    Standard,
    /// Bomb body layer, merge partner of [`ClassVariant::BombOutline`].
    BombBody,
    /// Bomb outline layer, merge partner of [`ClassVariant::BombBody`].
    BombOutline,
}

/// Sprite class parsed once from a capture filename's class segment.
///
/// Capture tooling appends a per-layer counter to the class (`AppleHalf2`),
/// so digits are stripped before any lookup. Bomb captures arrive as two
/// layers (`bomb` + `bombOutline`); the variant tag is what the mask merge
/// keys on, so no downstream code has to re-inspect filename substrings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteClass {
    /// Digit-stripped class name, as used for label lookups.
    pub base: String,
    /// Bomb body/outline tagging.
    pub variant: ClassVariant,
}

impl SpriteClass {
    /// Parse a raw class segment (extension already removed).
    pub fn parse(raw: &str) -> Self {
        let base: String = raw.chars().filter(|c| !c.is_ascii_digit()).collect();
        let variant = match base.as_str() {
            "bomb" => ClassVariant::BombBody,
            "bombOutline" => ClassVariant::BombOutline,
            _ => ClassVariant::Standard,
        };
        Self { base, variant }
    }

    /// Detector class id for this class, `-1` when unknown.
    pub fn id(&self) -> i32 {
        class_id(&self.base)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/classes.rs"]
mod tests;
