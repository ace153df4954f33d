use crate::note::ButtonGroup;

/// Everything that can go wrong while discovering, identifying or driving a Launchpad.
///
/// None of these are retried internally. Malformed input (`InvalidColor`, `InvalidPortSpec`) is a
/// programming error on the caller's side; `NameMismatch` hints at a discovery bug; the transport
/// variants wrap whatever midir reported.
#[derive(Debug, thiserror::Error)]
pub enum LaunchpadError {
    #[error("no port matches {pattern:?}")]
    NotFound { pattern: String },

    #[error("no {group:?} button at column {column}, row {row}")]
    ButtonNotFound {
        group: ButtonGroup,
        column: u8,
        row: u8,
    },

    #[error("no button named {name:?}")]
    ButtonNameNotFound { name: String },

    #[error("output port name {output:?} doesn't match input port name {input:?}")]
    NameMismatch { input: String, output: String },

    #[error("invalid color {0}")]
    InvalidColor(String),

    #[error("invalid port specification: {0}")]
    InvalidPortSpec(String),

    #[error("{mode} can't be used with RGB color {color:?}")]
    UnsupportedEncoding {
        mode: &'static str,
        color: (u8, u8, u8),
    },

    #[error("{device} doesn't support {feature}")]
    Unsupported {
        device: &'static str,
        feature: &'static str,
    },

    #[error("invalid scroll text {0:?} (only ASCII can be displayed)")]
    InvalidText(String),

    #[error("invalid device id {0} (ids go up to 126)")]
    InvalidDeviceId(u8),

    #[error("no layout matches {0:?}")]
    LayoutNotFound(String),

    #[error("layout index {index} is out of range (device has {count} layouts)")]
    LayoutOutOfRange { index: usize, count: usize },

    #[error("invalid layout pattern")]
    LayoutPattern(#[from] regex::Error),

    #[error("connecting to MIDI output port failed")]
    OutputConnect(#[from] midir::ConnectError<midir::MidiOutput>),

    #[error("MIDI context initialization failed")]
    Init(#[from] midir::InitError),

    #[error("MIDI port retrieval failed")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("sending MIDI message failed")]
    Send(#[from] midir::SendError),
}
