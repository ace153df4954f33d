use crate::{LaunchpadError, OutputDevice};

/// An [`OutputDevice`] that records every message instead of sending it anywhere. Useful for
/// testing code that drives a Launchpad without having one plugged in.
#[derive(Debug, Default, Clone)]
pub struct MockOutput {
    sent: Vec<Vec<u8>>,
    fail: bool,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, oldest first
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Take the recorded messages, leaving the record empty
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.sent)
    }

    /// While enabled, every send fails like a disconnected port would
    pub fn fail_sends(&mut self, fail: bool) {
        self.fail = fail;
    }
}

impl OutputDevice for MockOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), LaunchpadError> {
        if self.fail {
            return Err(midir::SendError::Other("mock output refuses to send").into());
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }
}
