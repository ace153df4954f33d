/*!
Find your Novation Launchpads among the system's MIDI ports, and drive their LEDs.

# Finding a device

MIDI lists input and output ports separately and doesn't say which belong together. The
[`port`] module pairs them by name, ignoring the instance number the transport appends:

```no_run
use launchpad_surface::{list_ports, pair_device, port::{Direction, PortPattern}};

for port in list_ports(Direction::Input)? {
    println!("{}: {} ({})", port.index(), port.raw_name(), port.name());
}

let ports = pair_device(&PortPattern::from("Launchpad MK2"))?;
println!("Found {}", ports.identify()?);
# Ok::<(), launchpad_surface::LaunchpadError>(())
```

# Lighting buttons

A [`Device`] keeps track of what each button shows. Every button is either dark, steadily lit,
flashing or pulsing; switching to one of these ends the others. Flashing and pulsing are animated
by the device and only work with palette colors.

```no_run
use launchpad_surface::{mk2, note::ButtonGroup, ColorValue};

let mut device = mk2::Device::open(launchpad_surface::pair_device(&"Launchpad".into())?)?;

device
    .button(ButtonGroup::Grid, 0, 0)?
    .set_color([63u8, 0, 32])?;
device.button(ButtonGroup::Right, 8, 7)?.set_pulse(ColorValue::BLUE)?;
device.button_by_name("mixer")?.set_flash(13)?;

// the right column has a different note in the drum rack layout
device.select_layout(1)?;
device.button(ButtonGroup::Right, 8, 7)?.set_color(5)?;

device.reset()?;
# Ok::<(), launchpad_surface::LaunchpadError>(())
```

Every function that talks to the device sends exactly one MIDI message, except
[`Device::reset`], which also stops a text scroll and returns to the first layout before sending
one message per lit button.
*/

pub mod layout;
pub mod note;
pub mod port;
pub mod query;

mod color;
pub use color::*;

mod button;
pub use button::*;

mod device;
pub use device::*;

mod midi_io;
pub use midi_io::*;

mod mock;
pub use mock::*;

mod errors;
pub use errors::*;

pub mod launchpad_mk2;
pub use launchpad_mk2 as mk2;

pub mod prelude {
    pub use crate::color::{ColorValue, IntoColor};
    pub use crate::device::{Device, DeviceSpec};
    pub use crate::midi_io::OutputDevice;
    pub use crate::note::ButtonGroup;
}

/// Identifier used for e.g. the midi port names etc.
const APPLICATION_NAME: &str = "Launchpad Surface";
