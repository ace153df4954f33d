use midir::{MidiIO, MidiInput, MidiOutput, MidiOutputConnection};

use crate::port::{self, Direction, PortInfo, PortPair, PortPattern, PortSource};
use crate::{Device, DeviceSpec, LaunchpadError};

/// Something raw MIDI bytes can be written to, usually a midir output connection.
pub trait OutputDevice {
    /// Send one complete MIDI message. Blocks until the transport accepted it or failed.
    fn send(&mut self, bytes: &[u8]) -> Result<(), LaunchpadError>;
}

impl OutputDevice for MidiOutputConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), LaunchpadError> {
        MidiOutputConnection::send(self, bytes)?;
        Ok(())
    }
}

fn raw_name_at<T: MidiIO>(midi_io: &T, index: usize) -> Result<String, LaunchpadError> {
    let ports = midi_io.ports();
    let port = ports.get(index).ok_or_else(|| {
        LaunchpadError::InvalidPortSpec(format!(
            "port index {} is out of range ({} ports available)",
            index,
            ports.len()
        ))
    })?;
    Ok(midi_io.port_name(port)?)
}

impl PortSource for MidiInput {
    fn port_count(&self) -> usize {
        MidiInput::port_count(self)
    }

    fn raw_port_name(&self, index: usize) -> Result<String, LaunchpadError> {
        raw_name_at(self, index)
    }
}

impl PortSource for MidiOutput {
    fn port_count(&self) -> usize {
        MidiOutput::port_count(self)
    }

    fn raw_port_name(&self, index: usize) -> Result<String, LaunchpadError> {
        raw_name_at(self, index)
    }
}

/// All ports the system currently offers in the given direction
pub fn list_ports(direction: Direction) -> Result<Vec<PortInfo>, LaunchpadError> {
    // the inherent midir `ports()` would win over ours, hence the explicit trait calls
    let ports = match direction {
        Direction::Input => PortSource::ports(&MidiInput::new(crate::APPLICATION_NAME)?),
        Direction::Output => PortSource::ports(&MidiOutput::new(crate::APPLICATION_NAME)?),
    };
    Ok(ports)
}

/// Search the system's MIDI ports for the first device matching `pattern` and pair its input and
/// output port.
pub fn pair_device(pattern: &PortPattern) -> Result<PortPair, LaunchpadError> {
    let midi_input = MidiInput::new(crate::APPLICATION_NAME)?;
    let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;

    port::pair_by_pattern(&midi_input, &midi_output, pattern)
}

impl<S: DeviceSpec> Device<S, MidiOutputConnection> {
    /// Connect to the output port of `ports` and create a device on it.
    ///
    /// Fails with `NotFound` if the output port has disappeared or was renumbered since it was
    /// discovered.
    pub fn open(ports: PortPair) -> Result<Self, LaunchpadError> {
        let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;

        let wanted = ports.output();
        let port = midi_output
            .ports()
            .into_iter()
            .nth(wanted.index())
            .filter(|port| {
                midi_output
                    .port_name(port)
                    .map_or(false, |name| name == wanted.raw_name())
            })
            .ok_or_else(|| LaunchpadError::NotFound {
                pattern: wanted.raw_name().to_string(),
            })?;

        let connection_name = format!("{} {} output", crate::APPLICATION_NAME, S::NAME);
        let connection = midi_output.connect(&port, &connection_name)?;
        log::info!("Connected to {:?}", wanted.raw_name());

        Self::new(ports, connection)
    }

    /// Search the system's MIDI ports for the first device of this type and connect to it.
    pub fn guess() -> Result<Self, LaunchpadError> {
        let ports = pair_device(&PortPattern::from(S::PORT_PATTERN))?;
        Self::open(ports)
    }
}
