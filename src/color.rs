use crate::LaunchpadError;

/// The highest id in the onboard color palette
pub const MAX_PALETTE: u8 = 127;

/// The highest value of a single RGB component
pub const MAX_RGB: u8 = 63;

/// A color as understood by RGB-capable Launchpads.
///
/// Either one of the 128 onboard palette colors, or a custom RGB triple with components up to
/// [`MAX_RGB`]. Palette id 0 is black and is always represented as [`ColorValue::Off`].
///
/// Everywhere a color is expected you can pass anything implementing [`IntoColor`]:
/// ```
/// # use launchpad_surface::{ColorValue, IntoColor};
/// assert_eq!(5u8.into_color()?, ColorValue::Palette(5));
/// assert_eq!([63u8, 0].into_color()?, ColorValue::Rgb(63, 0, 0));
/// assert_eq!("off".into_color()?, ColorValue::Off);
/// assert_eq!(0u8.into_color()?, ColorValue::Off);
/// # Ok::<(), launchpad_surface::LaunchpadError>(())
/// ```
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorValue {
    Off,
    Palette(u8),
    Rgb(u8, u8, u8),
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::Off
    }
}

impl ColorValue {
    pub const RED: ColorValue = ColorValue::Palette(5);
    pub const GREEN: ColorValue = ColorValue::Palette(21);
    pub const BLUE: ColorValue = ColorValue::Palette(45);
    pub const YELLOW: ColorValue = ColorValue::Palette(13);
    pub const WHITE: ColorValue = ColorValue::Palette(3);

    /// A palette color. Id 0 gives [`ColorValue::Off`].
    pub fn palette(id: u8) -> Result<Self, LaunchpadError> {
        match id {
            0 => Ok(Self::Off),
            1..=MAX_PALETTE => Ok(Self::Palette(id)),
            _ => Err(LaunchpadError::InvalidColor(format!(
                "{} (palette ids go up to {})",
                id, MAX_PALETTE
            ))),
        }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Result<Self, LaunchpadError> {
        if r > MAX_RGB || g > MAX_RGB || b > MAX_RGB {
            return Err(LaunchpadError::InvalidColor(format!(
                "[{}, {}, {}] (RGB components go up to {})",
                r, g, b, MAX_RGB
            )));
        }
        Ok(Self::Rgb(r, g, b))
    }

    /// True for `Off` and for the all-zero RGB triple, both of which leave an LED dark
    pub fn is_off(&self) -> bool {
        matches!(*self, Self::Off | Self::Rgb(0, 0, 0))
    }

    /// The palette id of this color, with `Off` being 0. `None` for RGB colors.
    pub fn palette_id(&self) -> Option<u8> {
        match *self {
            Self::Off => Some(0),
            Self::Palette(id) => Some(id),
            Self::Rgb(..) => None,
        }
    }
}

/// Conversion of the various color notations into a validated [`ColorValue`]
pub trait IntoColor {
    fn into_color(self) -> Result<ColorValue, LaunchpadError>;
}

impl IntoColor for ColorValue {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        match self {
            Self::Off => Ok(Self::Off),
            Self::Palette(id) => ColorValue::palette(id),
            Self::Rgb(r, g, b) => ColorValue::rgb(r, g, b),
        }
    }
}

impl IntoColor for u8 {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        ColorValue::palette(self)
    }
}

impl IntoColor for i32 {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        if self < 0 || self > MAX_PALETTE as i32 {
            return Err(LaunchpadError::InvalidColor(format!(
                "{} (palette ids go up to {})",
                self, MAX_PALETTE
            )));
        }
        ColorValue::palette(self as u8)
    }
}

impl IntoColor for &str {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        if self.trim().eq_ignore_ascii_case("off") {
            Ok(ColorValue::Off)
        } else {
            Err(LaunchpadError::InvalidColor(format!("{:?}", self)))
        }
    }
}

/// Two components are red and green with blue zero-filled; components past the third are ignored.
impl IntoColor for &[u8] {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        match *self {
            [r, g] => ColorValue::rgb(r, g, 0),
            [r, g, b, ..] => ColorValue::rgb(r, g, b),
            _ => Err(LaunchpadError::InvalidColor(format!(
                "{:?} (RGB colors need 2 or 3 components)",
                self
            ))),
        }
    }
}

impl IntoColor for &Vec<u8> {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        self.as_slice().into_color()
    }
}

impl IntoColor for [u8; 2] {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        (&self[..]).into_color()
    }
}

impl IntoColor for [u8; 3] {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        (&self[..]).into_color()
    }
}

impl IntoColor for (u8, u8, u8) {
    fn into_color(self) -> Result<ColorValue, LaunchpadError> {
        ColorValue::rgb(self.0, self.1, self.2)
    }
}
