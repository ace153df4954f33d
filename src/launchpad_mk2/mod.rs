/*!
# Launchpad MK2

The MK2 has an 8x8 grid of RGB pads, 8 round scene buttons on the right and 8 round control
buttons on top. Rows are counted from the bottom, so `(0, 0)` is the bottom left pad.

Six layouts are known to the firmware. In every layout but "User 1" the grid and side buttons use
the programmer-style `10 * row + column + 11` numbering; "User 1" is the drum rack layout, which
lays the grid out as two 4x8 halves of consecutive notes starting at 36.
*/

use crate::layout::Layout;
use crate::note::{ButtonGroup, ButtonSpec};

/// SysEx command: switch the device to another layout
const SELECT_LAYOUT: u8 = 0x22;
/// SysEx command: scroll text, or stop scrolling when sent without arguments
const SCROLL_TEXT: u8 = 0x14;

/// Index of the drum rack layout
const USER_1: usize = 1;

const RIGHT_NAMES: [&str; 8] = [
    "record arm",
    "solo",
    "mute",
    "stop",
    "send b",
    "send a",
    "pan",
    "volume",
];

const TOP_NAMES: [&str; 8] = [
    "up", "down", "left", "right", "session", "user 1", "user 2", "mixer",
];

/// The MK2's protocol description, see [`crate::DeviceSpec`]
pub struct Spec;

impl crate::DeviceSpec for Spec {
    const NAME: &'static str = "Launchpad MK2";
    const PORT_PATTERN: &'static str = "Launchpad MK2";
    const MODEL: [u8; 2] = [0x02, 0x18];
    const LAYOUTS: &'static [Layout] = &[
        Layout {
            name: "Session",
            pattern: "Session|Default",
            channel: 1,
        },
        Layout {
            name: "User 1",
            pattern: "User 1|Drum|Rack",
            channel: 6,
        },
        Layout {
            name: "User 2",
            pattern: "User 2",
            channel: 14,
        },
        Layout {
            name: "Reserved",
            pattern: "Reserved|Ableton|Live",
            channel: 1,
        },
        Layout {
            name: "Volume",
            pattern: "Volume|^Fader$",
            channel: 1,
        },
        Layout {
            name: "Pan",
            pattern: "Pan",
            channel: 1,
        },
    ];

    /// Row by row from the bottom, each grid row followed by its scene button, then the top row
    fn buttons() -> Vec<ButtonSpec> {
        let mut buttons = Vec::with_capacity(80);
        for row in 0..8u8 {
            for column in 0..8u8 {
                buttons.push(ButtonSpec::grid(column, row));
            }
            buttons.push(ButtonSpec::right(row, RIGHT_NAMES[row as usize]));
        }
        for column in 0..8u8 {
            buttons.push(ButtonSpec::top(column, TOP_NAMES[column as usize]));
        }
        buttons
    }

    fn note_for(button: &ButtonSpec, layout: usize) -> u8 {
        let (column, row) = (button.column, button.row);

        match (button.group, layout) {
            (ButtonGroup::Grid, USER_1) => {
                let right_half = if column > 3 { 28 } else { 0 };
                36 + 4 * row + column + right_half
            }
            (ButtonGroup::Grid, _) => 10 * row + column + 11,
            (ButtonGroup::Right, USER_1) => 100 + row,
            (ButtonGroup::Right, _) => 10 * row + 19,
            (ButtonGroup::Top, _) => 104 + column,
        }
    }

    fn layout_select(layout: usize) -> Option<Vec<u8>> {
        Some(vec![SELECT_LAYOUT, layout as u8])
    }

    fn scroll_text(text: &[u8], color: u8, should_loop: bool) -> Option<Vec<u8>> {
        let mut payload = vec![SCROLL_TEXT, color, should_loop as u8];
        payload.extend_from_slice(text);
        Some(payload)
    }

    fn stop_scroll() -> Option<Vec<u8>> {
        Some(vec![SCROLL_TEXT])
    }
}

/// A Launchpad MK2 connected through midir
pub type Device = crate::Device<Spec, midir::MidiOutputConnection>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Status;
    use crate::DeviceSpec;

    fn note(button: ButtonSpec, layout: usize) -> u8 {
        Spec::note_for(&button, layout)
    }

    #[test]
    fn test_grid_notes() {
        assert_eq!(note(ButtonSpec::grid(4, 0), 0), 15);
        assert_eq!(note(ButtonSpec::grid(4, 0), 1), 68);

        assert_eq!(note(ButtonSpec::grid(0, 0), 0), 11);
        assert_eq!(note(ButtonSpec::grid(7, 7), 0), 88);
        assert_eq!(note(ButtonSpec::grid(0, 0), 1), 36);
        assert_eq!(note(ButtonSpec::grid(3, 7), 1), 67);
        assert_eq!(note(ButtonSpec::grid(7, 7), 1), 99);

        // every layout but User 1 uses the default numbering
        for layout in &[0, 2, 3, 4, 5] {
            assert_eq!(note(ButtonSpec::grid(2, 5), *layout), 63);
        }
    }

    #[test]
    fn test_side_and_top_notes() {
        assert_eq!(note(ButtonSpec::right(0, "record arm"), 0), 19);
        assert_eq!(note(ButtonSpec::right(7, "volume"), 0), 89);
        assert_eq!(note(ButtonSpec::right(7, "volume"), 1), 107);

        for layout in 0..Spec::LAYOUTS.len() {
            assert_eq!(note(ButtonSpec::top(0, "up"), layout), 104);
            assert_eq!(note(ButtonSpec::top(7, "mixer"), layout), 111);
        }
    }

    #[test]
    fn test_scroll_payloads() {
        assert_eq!(
            Spec::scroll_text(b"Go", 5, false),
            Some(vec![0x14, 5, 0, b'G', b'o'])
        );
        assert_eq!(Spec::stop_scroll(), Some(vec![0x14]));
        assert_eq!(Spec::layout_select(4), Some(vec![0x22, 4]));
    }

    #[test]
    fn test_button_table() {
        let buttons = Spec::buttons();
        assert_eq!(buttons.len(), 80);

        assert_eq!(buttons[0], ButtonSpec::grid(0, 0));
        assert_eq!(buttons[8].group, ButtonGroup::Right);
        assert_eq!(buttons[8].name, Some("record arm"));
        assert_eq!(buttons[71].name, Some("volume"));

        let top: Vec<_> = buttons.iter().filter(|b| b.group == ButtonGroup::Top).collect();
        assert_eq!(top.len(), 8);
        assert!(top.iter().all(|b| b.status == Status::ControlChange && b.row == 8));
        assert_eq!(top[5].name, Some("user 1"));

        let notes: std::collections::HashSet<_> =
            buttons.iter().map(|b| Spec::note_for(b, 0)).collect();
        assert_eq!(notes.len(), 80, "default layout notes must be unique");
    }
}
