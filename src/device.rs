use std::marker::PhantomData;

use crate::layout::{Layout, LayoutTable};
use crate::note::{ButtonGroup, ButtonSpec, NoteResolver};
use crate::port::PortPair;
use crate::query::{self, DeviceIdQuery};
use crate::{
    encode_light, Button, ButtonState, ColorValue, IntoColor, LaunchpadError, LightMode,
    OutputDevice,
};

/// SysEx Manufacturer ID for Focusrite/Novation
pub const SYSEX_MANUFACTURER: [u8; 3] = [0x00, 0x20, 0x29];

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
const CLOCK_TICK: u8 = 0xF8;

/// Launchpads implement this trait to describe everything that differs between device types:
/// how they are named, which layouts they know and how buttons map to notes in each layout.
///
/// You as a user of this library will not need to implement this trait unless you add support
/// for a new device type.
pub trait DeviceSpec {
    /// The device type name
    const NAME: &'static str;
    /// Pattern the normalized port names of this device type contain
    const PORT_PATTERN: &'static str;
    /// Product type and product number, sent after the manufacturer ID in every SysEx message
    const MODEL: [u8; 2];
    /// The firmware layouts, in the order the device numbers them. Must not be empty.
    const LAYOUTS: &'static [Layout];

    /// All buttons of the device, in declaration order
    fn buttons() -> Vec<ButtonSpec>;

    /// The note of `button` while the layout at index `layout` is active
    fn note_for(button: &ButtonSpec, layout: usize) -> u8;

    /// The SysEx payload that makes the device switch to `layout`, if the device supports it
    fn layout_select(layout: usize) -> Option<Vec<u8>> {
        let _ = layout;
        None
    }

    /// The SysEx payload that scrolls `text` across the grid in palette color `color`, if the
    /// device can display text
    fn scroll_text(text: &[u8], color: u8, should_loop: bool) -> Option<Vec<u8>> {
        let _ = (text, color, should_loop);
        None
    }

    /// The SysEx payload that ends a running text scroll
    fn stop_scroll() -> Option<Vec<u8>> {
        None
    }
}

struct ButtonSlot {
    notes: NoteResolver,
    state: ButtonState,
}

/// A single physical Launchpad, driven through an [`OutputDevice`].
///
/// The device remembers what every button shows and which layout is active, so that notes can
/// be resolved and [`Device::reset`] knows which buttons to turn off. It owns its output
/// connection; don't drive the same ports from two devices at once.
///
/// ```no_run
/// use launchpad_surface::{mk2, note::ButtonGroup, ColorValue};
///
/// let mut device = mk2::Device::guess()?;
///
/// device.button(ButtonGroup::Grid, 4, 0)?.set_color(ColorValue::RED)?;
/// device.button_by_name("session")?.set_flash(21)?;
///
/// device.reset()?;
/// # Ok::<(), launchpad_surface::LaunchpadError>(())
/// ```
pub struct Device<S: DeviceSpec, O: OutputDevice> {
    output: O,
    ports: PortPair,
    layouts: LayoutTable,
    active_layout: usize,
    buttons: Vec<ButtonSlot>,
    scrolling: bool,
    _spec: PhantomData<S>,
}

impl<S: DeviceSpec, O: OutputDevice> Device<S, O> {
    /// Create a device from an already paired set of ports and a connection to the output port.
    ///
    /// Fails with `NameMismatch` if the ports don't belong to the same physical device.
    pub fn new(ports: PortPair, output: O) -> Result<Self, LaunchpadError> {
        let name = ports.identify()?;

        let layouts = LayoutTable::new(S::LAYOUTS)?;
        layouts.check_index(0)?;

        let buttons = S::buttons()
            .into_iter()
            .map(|button| ButtonSlot {
                notes: NoteResolver::new(button, S::note_for, layouts.len()),
                state: ButtonState::default(),
            })
            .collect();

        log::info!("Created {} device on {:?}", S::NAME, name);

        Ok(Self {
            output,
            ports,
            layouts,
            active_layout: 0,
            buttons,
            scrolling: false,
            _spec: PhantomData,
        })
    }

    /// Manufacturer ID followed by the model bytes
    pub fn sysex_prefix() -> [u8; 5] {
        let [m1, m2, m3] = SYSEX_MANUFACTURER;
        let [p1, p2] = S::MODEL;
        [m1, m2, m3, p1, p2]
    }

    /// Check that input and output still agree on the device name, and return that name
    pub fn identify(&self) -> Result<String, LaunchpadError> {
        self.ports.identify()
    }

    pub fn ports(&self) -> &PortPair {
        &self.ports
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Give up the device and get back the output connection
    pub fn into_output(self) -> O {
        self.output
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    pub fn active_layout(&self) -> usize {
        self.active_layout
    }

    /// The MIDI channel of the active layout
    pub fn channel(&self) -> u8 {
        self.layouts[self.active_layout].channel
    }

    /// Record that the device is now in the layout at `index`, e.g. after the user pressed a
    /// layout button. Nothing is sent.
    pub fn set_active_layout(&mut self, index: usize) -> Result<(), LaunchpadError> {
        self.layouts.check_index(index)?;

        if index != self.active_layout {
            log::debug!(
                "{}: layout {} -> {} ({})",
                S::NAME,
                self.active_layout,
                index,
                self.layouts[index].name
            );
        }
        self.active_layout = index;
        Ok(())
    }

    /// Record the layout whose pattern matches `name` as active, and return its index
    pub fn sync_layout(&mut self, name: &str) -> Result<usize, LaunchpadError> {
        let index = self.layouts.resolve(name)?;
        self.set_active_layout(index)?;
        Ok(index)
    }

    /// Tell the device to switch to the layout at `index` and record it as active. Devices that
    /// can't be switched remotely only get the layout recorded.
    pub fn select_layout(&mut self, index: usize) -> Result<(), LaunchpadError> {
        self.layouts.check_index(index)?;

        if let Some(payload) = S::layout_select(index) {
            self.send_sysex(&payload)?;
        }
        self.set_active_layout(index)
    }

    /// All buttons in declaration order
    pub fn buttons(&self) -> impl Iterator<Item = &ButtonSpec> + '_ {
        self.buttons.iter().map(|slot| slot.notes.button())
    }

    /// Get a handle to the button at the given position.
    ///
    /// Fails with `ButtonNotFound` if the device has no such button.
    pub fn button(
        &mut self,
        group: ButtonGroup,
        column: u8,
        row: u8,
    ) -> Result<Button<'_, S, O>, LaunchpadError> {
        let index = self
            .buttons
            .iter()
            .position(|slot| slot.notes.button().is_at(group, column, row))
            .ok_or(LaunchpadError::ButtonNotFound { group, column, row })?;

        Ok(Button {
            device: self,
            index,
        })
    }

    /// Get a handle to a side or top button by its label, e.g. `"volume"` or `"user 1"`.
    /// Labels are compared case-insensitively.
    pub fn button_by_name(&mut self, name: &str) -> Result<Button<'_, S, O>, LaunchpadError> {
        let index = self
            .buttons
            .iter()
            .position(|slot| {
                slot.notes
                    .button()
                    .name
                    .map_or(false, |label| label.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| LaunchpadError::ButtonNameNotFound {
                name: name.to_string(),
            })?;

        Ok(Button {
            device: self,
            index,
        })
    }

    /// Bring the device back to its power-on look.
    ///
    /// A text scroll started since the last [`Device::stop_scroll`] is stopped, and the first
    /// layout is selected again if another one is active. Then every button that is lit, flashing
    /// or pulsing gets one "set color off" message, in declaration order; buttons that are dark
    /// already are skipped.
    pub fn reset(&mut self) -> Result<(), LaunchpadError> {
        if self.scrolling {
            self.stop_scroll()?;
        }
        if self.active_layout != 0 {
            self.select_layout(0)?;
        }

        let mut cleared = 0;
        for index in 0..self.buttons.len() {
            if self.buttons[index].state.is_dark() {
                continue;
            }
            self.light_button(index, LightMode::Plain, ColorValue::Off)?;
            cleared += 1;
        }

        log::debug!("{}: reset cleared {} buttons", S::NAME, cleared);
        Ok(())
    }

    /// Scroll `text` across the grid in a palette color, once or looping until
    /// [`Device::stop_scroll`] is called.
    ///
    /// Only ASCII can be displayed. The control characters `'\u{1}'` to `'\u{7}'` change the
    /// scroll speed from where they appear in the text on, 4 being the default.
    ///
    /// ```no_run
    /// # use launchpad_surface::{mk2, ColorValue};
    /// let mut device = mk2::Device::guess()?;
    /// device.scroll_text("Hello \u{7}world", ColorValue::GREEN, false)?;
    /// # Ok::<(), launchpad_surface::LaunchpadError>(())
    /// ```
    pub fn scroll_text(
        &mut self,
        text: &str,
        color: impl IntoColor,
        should_loop: bool,
    ) -> Result<(), LaunchpadError> {
        if !text.is_ascii() {
            return Err(LaunchpadError::InvalidText(text.to_string()));
        }
        let color = match color.into_color()? {
            ColorValue::Rgb(r, g, b) => {
                return Err(LaunchpadError::UnsupportedEncoding {
                    mode: "scrolling",
                    color: (r, g, b),
                })
            }
            color => color.palette_id().unwrap_or(0),
        };

        let payload = S::scroll_text(text.as_bytes(), color, should_loop).ok_or(
            LaunchpadError::Unsupported {
                device: S::NAME,
                feature: "text scrolling",
            },
        )?;
        self.send_sysex(&payload)?;
        self.scrolling = true;
        Ok(())
    }

    /// End the text scroll, if there is one
    pub fn stop_scroll(&mut self) -> Result<(), LaunchpadError> {
        let payload = S::stop_scroll().ok_or(LaunchpadError::Unsupported {
            device: S::NAME,
            feature: "text scrolling",
        })?;
        self.send_sysex(&payload)?;
        self.scrolling = false;
        Ok(())
    }

    /// Ask the device to identify itself with a universal Device Inquiry reply on its input port.
    /// See [`query::parse_device_inquiry`].
    pub fn request_device_inquiry(&mut self, target: DeviceIdQuery) -> Result<(), LaunchpadError> {
        let request = query::device_inquiry_request(target)?;
        log::debug!("{}: requesting device inquiry", S::NAME);
        self.output.send(&request)
    }

    /// Ask the device for its bootloader and firmware versions. See
    /// [`query::parse_version_inquiry`].
    pub fn request_version_inquiry(&mut self) -> Result<(), LaunchpadError> {
        log::debug!("{}: requesting version inquiry", S::NAME);
        self.output.send(&query::version_inquiry_request())
    }

    /// A MIDI timing clock message. The device derives its flash and pulse tempo from these when
    /// they arrive at 24 per beat.
    pub fn send_clock_tick(&mut self) -> Result<(), LaunchpadError> {
        self.output.send(&[CLOCK_TICK])
    }

    /// Send `payload` wrapped into a SysEx message addressed to this device type
    pub fn send_sysex(&mut self, payload: &[u8]) -> Result<(), LaunchpadError> {
        let mut bytes = Vec::with_capacity(payload.len() + 7);
        bytes.push(SYSEX_START);
        bytes.extend_from_slice(&Self::sysex_prefix());
        bytes.extend_from_slice(payload);
        bytes.push(SYSEX_END);

        log::debug!("{}: sending {:02X?}", S::NAME, bytes);
        self.output.send(&bytes)
    }

    pub(crate) fn button_spec(&self, index: usize) -> &ButtonSpec {
        self.buttons[index].notes.button()
    }

    pub(crate) fn button_state(&self, index: usize) -> ButtonState {
        self.buttons[index].state
    }

    pub(crate) fn button_note(&self, index: usize) -> Result<u8, LaunchpadError> {
        self.buttons[index].notes.note_for(self.active_layout)
    }

    /// Encode, send, and only then record the new state
    pub(crate) fn light_button(
        &mut self,
        index: usize,
        mode: LightMode,
        color: ColorValue,
    ) -> Result<(), LaunchpadError> {
        let note = self.button_note(index)?;
        let payload = encode_light(mode, color, note)?;
        self.send_sysex(&payload)?;
        let slot = &mut self.buttons[index];
        slot.state = slot.state.after(mode, color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortInfo;
    use crate::{mk2, MockOutput};

    fn device() -> Device<mk2::Spec, MockOutput> {
        let ports = PortPair::new(
            PortInfo::new(1, "Launchpad MK2 1"),
            PortInfo::new(2, "Launchpad MK2 2"),
        )
        .unwrap();
        Device::new(ports, MockOutput::new()).unwrap()
    }

    #[test]
    fn test_sysex_framing() {
        let mut device = device();
        device.send_sysex(&[0x0A, 11, 5]).unwrap();
        assert_eq!(
            device.output().sent(),
            &[vec![0xF0, 0x00, 0x20, 0x29, 0x02, 0x18, 0x0A, 11, 5, 0xF7]]
        );
    }

    #[test]
    fn test_button_lookup() {
        let mut device = device();
        assert_eq!(device.buttons().count(), 80);

        let button = device.button(ButtonGroup::Grid, 4, 0).unwrap();
        assert_eq!(button.note().unwrap(), 15);

        let button = device.button_by_name("Record Arm").unwrap();
        assert_eq!(button.spec().row, 0);
        assert_eq!(button.note().unwrap(), 19);

        assert!(matches!(
            device.button(ButtonGroup::Grid, 8, 0),
            Err(LaunchpadError::ButtonNotFound {
                group: ButtonGroup::Grid,
                column: 8,
                row: 0
            })
        ));
        assert!(matches!(
            device.button_by_name("shift"),
            Err(LaunchpadError::ButtonNameNotFound { .. })
        ));
    }

    #[test]
    fn test_layout_switching() {
        let mut device = device();
        assert_eq!(device.channel(), 1);

        device.set_active_layout(1).unwrap();
        assert_eq!(device.channel(), 6);
        assert_eq!(device.button(ButtonGroup::Grid, 4, 0).unwrap().note().unwrap(), 68);
        assert!(device.output().sent().is_empty());

        assert_eq!(device.sync_layout("User 2").unwrap(), 2);
        assert_eq!(device.channel(), 14);

        assert!(matches!(
            device.set_active_layout(6),
            Err(LaunchpadError::LayoutOutOfRange { index: 6, count: 6 })
        ));
        assert_eq!(device.active_layout(), 2);
    }

    #[test]
    fn test_select_layout_sends() {
        let mut device = device();
        device.select_layout(1).unwrap();
        assert_eq!(device.active_layout(), 1);
        assert_eq!(
            device.output().sent(),
            &[vec![0xF0, 0x00, 0x20, 0x29, 0x02, 0x18, 0x22, 1, 0xF7]]
        );
    }

    #[test]
    fn test_clock_tick() {
        let mut device = device();
        device.send_clock_tick().unwrap();
        assert_eq!(device.output().sent(), &[vec![0xF8]]);
    }

    #[test]
    fn test_scroll_text() {
        let mut device = device();
        device.scroll_text("Hi", 21, true).unwrap();
        device.stop_scroll().unwrap();
        assert_eq!(
            device.output().sent(),
            &[
                vec![0xF0, 0x00, 0x20, 0x29, 0x02, 0x18, 0x14, 21, 1, b'H', b'i', 0xF7],
                vec![0xF0, 0x00, 0x20, 0x29, 0x02, 0x18, 0x14, 0xF7],
            ]
        );

        assert!(matches!(
            device.scroll_text("Grüße", 21, false),
            Err(LaunchpadError::InvalidText(_))
        ));
        assert!(matches!(
            device.scroll_text("Hi", [0u8, 63, 0], false),
            Err(LaunchpadError::UnsupportedEncoding { mode: "scrolling", .. })
        ));
        assert_eq!(device.output().sent().len(), 2);
    }

    #[test]
    fn test_inquiries() {
        let mut device = device();
        device.request_device_inquiry(DeviceIdQuery::Any).unwrap();
        device.request_version_inquiry().unwrap();
        assert_eq!(
            device.output().sent(),
            &[
                vec![0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7],
                vec![0xF0, 0x00, 0x20, 0x29, 0x00, 0x70, 0xF7],
            ]
        );

        assert!(device
            .request_device_inquiry(DeviceIdQuery::Specific(200))
            .is_err());
        assert_eq!(device.output().sent().len(), 2);
    }

    #[test]
    fn test_failed_send_keeps_state() {
        let mut device = device();
        device.output_mut().fail_sends(true);

        let mut button = device.button(ButtonGroup::Grid, 0, 0).unwrap();
        assert!(button.set_color(5).is_err());
        assert_eq!(button.color(), ColorValue::Off);
    }
}
