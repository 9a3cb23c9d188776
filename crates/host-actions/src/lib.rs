//! host-actions: side-effecting host actions with a recording mock backend

mod types;
pub use types::{RebootConfig, SpeechConfig, TextInput};

mod error;
pub use error::{ActionError, Result};

mod traits;
pub use traits::{PowerControl, Speaker};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{RecordingPower, RecordingSpeaker};

#[cfg(feature = "system")]
mod system;
#[cfg(feature = "system")]
pub use system::{CommandSpeaker, ShutdownCommand};
