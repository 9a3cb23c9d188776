use crate::Result;
use std::time::Duration;

/// Text-to-speech output. Returns once playback has been started.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
}

/// Machine power control.
pub trait PowerControl: Send + Sync {
    /// Schedule a reboot after `delay`; returns the id of the process that was launched.
    fn reboot(&self, delay: Duration) -> Result<u32>;
}
