use crate::{PowerControl, Result, Speaker};
use std::sync::Mutex;
use std::time::Duration;

/// Records every utterance instead of playing it.
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        if let Ok(mut s) = self.spoken.lock() {
            s.push(text.to_string());
        }
        Ok(())
    }
}

/// Records requested reboot delays; never touches the machine.
#[derive(Default)]
pub struct RecordingPower {
    reboots: Mutex<Vec<Duration>>,
}

impl RecordingPower {
    /// Process id handed back for every recorded reboot.
    pub const PID: u32 = 4242;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn reboots(&self) -> Vec<Duration> {
        self.reboots.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PowerControl for RecordingPower {
    fn reboot(&self, delay: Duration) -> Result<u32> {
        if let Ok(mut r) = self.reboots.lock() {
            r.push(delay);
        }
        Ok(Self::PID)
    }
}
