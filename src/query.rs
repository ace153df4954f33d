/*!
Device and version inquiries.

Both requests are answered by the device on its MIDI input. This crate doesn't read from the
input itself, so hand the received SysEx bytes to [`parse_device_inquiry`] or
[`parse_version_inquiry`].
*/

use crate::LaunchpadError;

/// Device id that addresses every device on the port
const ANY_DEVICE: u8 = 127;

/// Who a Device Inquiry request is addressed to
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeviceIdQuery {
    /// A specific device id, 0..=126
    Specific(u8),
    /// Every device listening on the port
    Any,
}

/// Reply to a universal Device Inquiry
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct DeviceInquiry {
    pub device_id: u8,
    pub family_code: u16,
    pub family_member_code: u16,
    pub firmware_revision: u32,
}

/// Reply to a Novation version inquiry
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct VersionInquiry {
    pub bootloader_version: u32,
    pub firmware_version: u32,
    pub bootloader_size: u16,
}

/// The universal non-realtime Device Inquiry request, complete with SysEx envelope
pub fn device_inquiry_request(query: DeviceIdQuery) -> Result<Vec<u8>, LaunchpadError> {
    let device_id = match query {
        DeviceIdQuery::Specific(id) if id < ANY_DEVICE => id,
        DeviceIdQuery::Specific(id) => return Err(LaunchpadError::InvalidDeviceId(id)),
        DeviceIdQuery::Any => ANY_DEVICE,
    };

    Ok(vec![0xF0, 0x7E, device_id, 0x06, 0x01, 0xF7])
}

/// The Novation version inquiry request, complete with SysEx envelope
pub fn version_inquiry_request() -> Vec<u8> {
    vec![0xF0, 0x00, 0x20, 0x29, 0x00, 0x70, 0xF7]
}

/// Digits sent one per byte, most significant first
fn decimal(digits: &[u8]) -> u32 {
    digits.iter().fold(0, |acc, &digit| acc * 10 + digit as u32)
}

pub fn parse_device_inquiry(data: &[u8]) -> Option<DeviceInquiry> {
    match *data {
        [0xF0, 0x7E, device_id, 0x06, 0x02, 0x00, 0x20, 0x29, fc1, fc2, fmc1, fmc2, fr1, fr2, fr3, fr4, 0xF7] => {
            Some(DeviceInquiry {
                device_id,
                family_code: u16::from_be_bytes([fc1, fc2]),
                family_member_code: u16::from_be_bytes([fmc1, fmc2]),
                firmware_revision: decimal(&[fr1, fr2, fr3, fr4]),
            })
        }
        _ => None,
    }
}

pub fn parse_version_inquiry(data: &[u8]) -> Option<VersionInquiry> {
    match *data {
        [0xF0, 0x00, 0x20, 0x29, 0x00, 0x70, bl1, bl2, bl3, bl4, bl5, fw1, fw2, fw3, fw4, fw5, bs1, bs2, 0xF7] => {
            Some(VersionInquiry {
                bootloader_version: decimal(&[bl1, bl2, bl3, bl4, bl5]),
                firmware_version: decimal(&[fw1, fw2, fw3, fw4, fw5]),
                bootloader_size: u16::from_be_bytes([bs1, bs2]),
            })
        }
        _ => None,
    }
}
