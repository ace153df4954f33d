use crate::note::ButtonSpec;
use crate::{ColorValue, Device, DeviceSpec, IntoColor, LaunchpadError, OutputDevice};

/// SysEx command: light a button with a palette color
pub const SET_PALETTE: u8 = 0x0A;
/// SysEx command: light a button with an RGB color
pub const SET_RGB: u8 = 0x0B;
/// SysEx command: flash a button
pub const SET_FLASH: u8 = 0x23;
/// SysEx command: pulse a button
pub const SET_PULSE: u8 = 0x28;

/// How a button shows its color
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightMode {
    /// A straight consistent light
    Plain,
    /// A flashing motion On->Off->On->Off->..., driven by the device clock
    Flash,
    /// A smooth pulse, driven by the device clock
    Pulse,
}

impl Default for LightMode {
    fn default() -> Self {
        Self::Plain
    }
}

/// What a single button currently shows.
///
/// A button is either dark, or shows exactly one of a steady color, a flash or a pulse. Lighting
/// it in one mode always ends the other two.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonState {
    mode: LightMode,
    color: ColorValue,
}

impl ButtonState {
    pub fn new(mode: LightMode, color: ColorValue) -> Self {
        if color.is_off() {
            // dark is dark, whatever the mode was
            return Self::default();
        }
        Self { mode, color }
    }

    pub fn mode(&self) -> LightMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.color.is_off()
    }

    /// The steady color, or `Off` while flashing or pulsing
    pub fn color(&self) -> ColorValue {
        self.color_in(LightMode::Plain)
    }

    /// The flash color, or `Off` if not flashing
    pub fn flash(&self) -> ColorValue {
        self.color_in(LightMode::Flash)
    }

    /// The pulse color, or `Off` if not pulsing
    pub fn pulse(&self) -> ColorValue {
        self.color_in(LightMode::Pulse)
    }

    /// The state after lighting the button in `mode` with `color`.
    ///
    /// A lit color replaces whatever was shown. An off color clears everything, except that
    /// stopping a flash leaves a steady color alone.
    pub fn after(self, mode: LightMode, color: ColorValue) -> Self {
        if !color.is_off() {
            return Self::new(mode, color);
        }
        match (mode, self.mode) {
            (LightMode::Flash, LightMode::Plain) => self,
            _ => Self::default(),
        }
    }

    fn color_in(&self, mode: LightMode) -> ColorValue {
        if self.mode == mode {
            self.color
        } else {
            ColorValue::Off
        }
    }
}

/// Build the SysEx payload (everything after the model bytes) that shows `color` on `note` in
/// `mode`.
///
/// Flashing and pulsing are animated by the device itself and only take palette colors; asking
/// for them with an RGB color fails with `UnsupportedEncoding`.
///
/// ```
/// # use launchpad_surface::{encode_light, ColorValue, LightMode};
/// assert_eq!(encode_light(LightMode::Plain, ColorValue::Rgb(63, 0, 0), 11)?, [0x0B, 11, 63, 0, 0]);
/// assert_eq!(encode_light(LightMode::Flash, ColorValue::Palette(10), 11)?, [0x23, 0, 11, 10]);
/// # Ok::<(), launchpad_surface::LaunchpadError>(())
/// ```
pub fn encode_light(mode: LightMode, color: ColorValue, note: u8) -> Result<Vec<u8>, LaunchpadError> {
    let unsupported = |mode: &'static str| match color {
        ColorValue::Rgb(r, g, b) => Err(LaunchpadError::UnsupportedEncoding {
            mode,
            color: (r, g, b),
        }),
        ColorValue::Off | ColorValue::Palette(_) => Ok(()),
    };

    match (mode, color) {
        (LightMode::Plain, ColorValue::Rgb(r, g, b)) => Ok(vec![SET_RGB, note, r, g, b]),
        (LightMode::Plain, _) => Ok(vec![SET_PALETTE, note, palette_id(color)]),
        (LightMode::Flash, _) => {
            unsupported("flashing")?;
            Ok(vec![SET_FLASH, 0, note, palette_id(color)])
        }
        (LightMode::Pulse, _) => {
            unsupported("pulsing")?;
            Ok(vec![SET_PULSE, 0, note, palette_id(color)])
        }
    }
}

fn palette_id(color: ColorValue) -> u8 {
    color.palette_id().unwrap_or(0)
}

/// A handle to one button of a [`Device`], borrowed from it.
///
/// Every setter sends exactly one SysEx message and returns the handle again, so calls can be
/// chained:
/// ```no_run
/// # use launchpad_surface::{mk2, note::ButtonGroup};
/// let mut device = mk2::Device::guess()?;
/// device.button(ButtonGroup::Grid, 0, 0)?.set_color(5)?.set_pulse(45)?;
/// # Ok::<(), launchpad_surface::LaunchpadError>(())
/// ```
/// A setter that fails sends nothing and leaves the state untouched.
pub struct Button<'a, S: DeviceSpec, O: OutputDevice> {
    pub(crate) device: &'a mut Device<S, O>,
    pub(crate) index: usize,
}

impl<S: DeviceSpec, O: OutputDevice> Button<'_, S, O> {
    pub fn spec(&self) -> &ButtonSpec {
        self.device.button_spec(self.index)
    }

    /// The note this button has under the currently active layout
    pub fn note(&self) -> Result<u8, LaunchpadError> {
        self.device.button_note(self.index)
    }

    pub fn state(&self) -> ButtonState {
        self.device.button_state(self.index)
    }

    pub fn color(&self) -> ColorValue {
        self.state().color()
    }

    pub fn flash(&self) -> ColorValue {
        self.state().flash()
    }

    pub fn pulse(&self) -> ColorValue {
        self.state().pulse()
    }

    /// Light the button steadily, with either a palette or an RGB color
    pub fn set_color(&mut self, color: impl IntoColor) -> Result<&mut Self, LaunchpadError> {
        self.light(LightMode::Plain, color)
    }

    pub fn clear_color(&mut self) -> Result<&mut Self, LaunchpadError> {
        self.set_color(ColorValue::Off)
    }

    /// Flash between black and a palette color. RGB colors are rejected.
    pub fn set_flash(&mut self, color: impl IntoColor) -> Result<&mut Self, LaunchpadError> {
        self.light(LightMode::Flash, color)
    }

    /// End a flash or a pulse. A steady color stays lit.
    pub fn stop_flash(&mut self) -> Result<&mut Self, LaunchpadError> {
        self.set_flash(ColorValue::Off)
    }

    /// Pulse a palette color. RGB colors are rejected.
    pub fn set_pulse(&mut self, color: impl IntoColor) -> Result<&mut Self, LaunchpadError> {
        self.light(LightMode::Pulse, color)
    }

    /// Darken the button, whatever it showed
    pub fn stop_pulse(&mut self) -> Result<&mut Self, LaunchpadError> {
        self.set_pulse(ColorValue::Off)
    }

    fn light(&mut self, mode: LightMode, color: impl IntoColor) -> Result<&mut Self, LaunchpadError> {
        let color = color.into_color()?;
        self.device.light_button(self.index, mode, color)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_exclusive() {
        let state = ButtonState::new(LightMode::Flash, ColorValue::Palette(10));
        assert_eq!(state.color(), ColorValue::Off);
        assert_eq!(state.flash(), ColorValue::Palette(10));
        assert_eq!(state.pulse(), ColorValue::Off);

        let state = ButtonState::new(LightMode::Plain, ColorValue::Rgb(63, 0, 0));
        assert_eq!(state.color(), ColorValue::Rgb(63, 0, 0));
        assert_eq!(state.flash(), ColorValue::Off);
        assert_eq!(state.pulse(), ColorValue::Off);
    }

    #[test]
    fn test_off_is_dark_in_every_mode() {
        for &mode in &[LightMode::Plain, LightMode::Flash, LightMode::Pulse] {
            let state = ButtonState::new(mode, ColorValue::Off);
            assert!(state.is_dark());
            assert_eq!(state, ButtonState::default());
        }
    }

    #[test]
    fn test_stopping_with_off() {
        let steady = ButtonState::new(LightMode::Plain, ColorValue::Palette(5));
        let flashing = ButtonState::new(LightMode::Flash, ColorValue::Palette(10));
        let pulsing = ButtonState::new(LightMode::Pulse, ColorValue::Palette(45));

        assert_eq!(steady.after(LightMode::Flash, ColorValue::Off), steady);
        assert!(flashing.after(LightMode::Flash, ColorValue::Off).is_dark());
        assert!(pulsing.after(LightMode::Flash, ColorValue::Off).is_dark());

        for state in &[steady, flashing, pulsing] {
            assert!(state.after(LightMode::Plain, ColorValue::Off).is_dark());
            assert!(state.after(LightMode::Pulse, ColorValue::Off).is_dark());
        }

        assert_eq!(
            steady.after(LightMode::Pulse, ColorValue::Palette(9)),
            ButtonState::new(LightMode::Pulse, ColorValue::Palette(9))
        );
        assert!(steady.after(LightMode::Plain, ColorValue::Rgb(0, 0, 0)).is_dark());
    }

    #[test]
    fn test_encode_palette() {
        assert_eq!(
            encode_light(LightMode::Plain, ColorValue::Palette(5), 15).unwrap(),
            vec![0x0A, 15, 5]
        );
        assert_eq!(
            encode_light(LightMode::Plain, ColorValue::Off, 15).unwrap(),
            vec![0x0A, 15, 0]
        );
        assert_eq!(
            encode_light(LightMode::Flash, ColorValue::Off, 15).unwrap(),
            vec![0x23, 0, 15, 0]
        );
        assert_eq!(
            encode_light(LightMode::Pulse, ColorValue::Palette(45), 104).unwrap(),
            vec![0x28, 0, 104, 45]
        );
    }

    #[test]
    fn test_encode_rgb() {
        assert_eq!(
            encode_light(LightMode::Plain, ColorValue::Rgb(1, 2, 3), 68).unwrap(),
            vec![0x0B, 68, 1, 2, 3]
        );
        match encode_light(LightMode::Flash, ColorValue::Rgb(1, 2, 3), 68) {
            Err(LaunchpadError::UnsupportedEncoding { mode, color }) => {
                assert_eq!(mode, "flashing");
                assert_eq!(color, (1, 2, 3));
            }
            other => panic!("Expected UnsupportedEncoding, got {:?}", other),
        }
        assert!(matches!(
            encode_light(LightMode::Pulse, ColorValue::Rgb(0, 0, 0), 68),
            Err(LaunchpadError::UnsupportedEncoding { mode: "pulsing", .. })
        ));
    }
}
