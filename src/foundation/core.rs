use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PixfadeError, PixfadeResult};

/// 0-based index of a captured frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Opaque 8-bit RGB color as entered by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> PixfadeResult<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PixfadeError::invalid_argument(format!(
                "\"{s}\" is not a valid hexadecimal color (expected #rrggbb)"
            )));
        }

        fn hex_byte(pair: &str) -> PixfadeResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| PixfadeError::invalid_argument(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self {
            r: hex_byte(&digits[0..2])?,
            g: hex_byte(&digits[2..4])?,
            b: hex_byte(&digits[4..6])?,
        })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// The same color with full alpha.
    pub fn opaque(self) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, 255)
    }
}

impl FromStr for Rgb8 {
    type Err = PixfadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 0 is fully transparent.
    pub a: u8,
}

impl Rgba8 {
    /// All channels zero.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in `[r, g, b, a]` byte order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Rgb8> for Rgba8 {
    fn from(c: Rgb8) -> Self {
        c.opaque()
    }
}

/// Axis and sense along which the gradient sweeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// Top to bottom.
    Down,
    /// Bottom to top.
    Up,
    /// Left to right.
    Right,
    /// Right to left.
    Left,
}

impl Direction {
    /// Every direction, vertical ones first.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    /// Lowercase name, as accepted by `FromStr` and the config.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Left => "left",
        }
    }

    /// `true` when the sweep runs along rows (DOWN/UP).
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

impl FromStr for Direction {
    type Err = PixfadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(Direction::Down),
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            _ => Err(PixfadeError::invalid_argument(format!(
                "direction \"{s}\" not recognized (expected down, up, right or left)"
            ))),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = PixfadeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_owned()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index following `index` in a list of `len` items, wrapping to 0 at the end.
pub fn next_index(index: usize, len: usize) -> usize {
    if index + 1 >= len { 0 } else { index + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb8::from_hex("#ff0080").unwrap(), Rgb8::new(255, 0, 128));
        assert_eq!(Rgb8::from_hex("00FF7f").unwrap(), Rgb8::new(0, 255, 127));
        assert_eq!(" #0a0b0c ".parse::<Rgb8>().unwrap(), Rgb8::new(10, 11, 12));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#fff", "#ff00gg", "#ff008000", "red", "#+1+2+3"] {
            let err = Rgb8::from_hex(bad).unwrap_err();
            assert!(matches!(err, PixfadeError::InvalidArgument(_)), "{bad}");
        }
    }

    #[test]
    fn hex_display_is_lowercase_and_padded() {
        assert_eq!(Rgb8::new(1, 2, 255).to_hex(), "#0102ff");
        assert_eq!(Rgb8::new(0, 0, 0).to_string(), "#000000");
    }

    #[test]
    fn color_deserializes_from_hex_or_array() {
        let c: Rgb8 = serde_json::from_value(json!("#112233")).unwrap();
        assert_eq!(c, Rgb8::new(0x11, 0x22, 0x33));
        let c: Rgb8 = serde_json::from_value(json!([4, 5, 6])).unwrap();
        assert_eq!(c, Rgb8::new(4, 5, 6));
        assert!(serde_json::from_value::<Rgb8>(json!("#12")).is_err());
        assert!(serde_json::from_value::<Rgb8>(json!([1, 2])).is_err());
    }

    #[test]
    fn direction_parses_case_insensitively_and_rejects_unknown() {
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("left".parse::<Direction>().unwrap(), Direction::Left);
        let err = "diagonal".parse::<Direction>().unwrap_err();
        assert!(matches!(err, PixfadeError::InvalidArgument(_)));

        let d: Direction = serde_json::from_value(json!("up")).unwrap();
        assert_eq!(d, Direction::Up);
        assert!(serde_json::from_value::<Direction>(json!("sideways")).is_err());
        assert_eq!(serde_json::to_value(Direction::Right).unwrap(), json!("right"));
    }

    #[test]
    fn every_direction_round_trips_through_its_name() {
        for d in Direction::ALL {
            assert_eq!(d.as_str().parse::<Direction>().unwrap(), d);
            assert_eq!(d.to_string().to_uppercase().parse::<Direction>().unwrap(), d);
        }
        let vertical: Vec<_> = Direction::ALL.into_iter().filter(|d| d.is_vertical()).collect();
        assert_eq!(vertical, [Direction::Down, Direction::Up]);
    }

    #[test]
    fn next_index_wraps() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(next_index(0, 1), 0);
    }
}
