use crate::{ActionError, PowerControl, RebootConfig, Result, Speaker, SpeechConfig, TextInput};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Speaks by launching an external synthesizer (espeak, PowerShell SAPI, ...).
pub struct CommandSpeaker {
    cfg: SpeechConfig,
}

impl CommandSpeaker {
    pub fn new(cfg: SpeechConfig) -> Self {
        Self { cfg }
    }
}

impl Default for CommandSpeaker {
    fn default() -> Self {
        Self::new(SpeechConfig::default())
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(&self.cfg.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match self.cfg.input {
            TextInput::Argument => {
                cmd.arg(text).stdin(Stdio::null());
            }
            TextInput::Stdin => {
                cmd.stdin(Stdio::piped());
            }
        }
        let mut child = spawn(&mut cmd, &self.cfg.program)?;
        feed_stdin(&mut child, text)?;
        debug!(program = %self.cfg.program, pid = child.id(), chars = text.chars().count(), "speech started");
        reap(child);
        Ok(())
    }
}

/// Reboots through the platform `shutdown` command.
pub struct ShutdownCommand {
    cfg: RebootConfig,
}

impl ShutdownCommand {
    pub fn new(cfg: RebootConfig) -> Self {
        Self { cfg }
    }
}

impl Default for ShutdownCommand {
    fn default() -> Self {
        Self::new(RebootConfig::default())
    }
}

impl PowerControl for ShutdownCommand {
    fn reboot(&self, delay: Duration) -> Result<u32> {
        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(reboot_args(delay))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = spawn(&mut cmd, &self.cfg.program)?;
        let pid = child.id();
        info!(pid, delay_s = delay.as_secs(), "reboot scheduled");
        reap(child);
        Ok(pid)
    }
}

#[cfg(windows)]
pub(crate) fn reboot_args(delay: Duration) -> Vec<String> {
    vec!["-r".into(), "-t".into(), delay.as_secs().to_string()]
}

// shutdown(8) schedules in whole minutes
#[cfg(not(windows))]
pub(crate) fn reboot_args(delay: Duration) -> Vec<String> {
    let minutes = delay.as_secs().div_ceil(60);
    let when = if minutes == 0 {
        "now".to_string()
    } else {
        format!("+{minutes}")
    };
    vec!["-r".into(), when]
}

fn spawn(cmd: &mut Command, program: &str) -> Result<Child> {
    cmd.spawn().map_err(|e| ActionError::Spawn {
        program: program.to_string(),
        reason: e.to_string(),
    })
}

// Closes stdin once written. On a failed write the child is killed and waited on here.
fn feed_stdin(child: &mut Child, text: &str) -> Result<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    if let Err(e) = stdin.write_all(text.as_bytes()) {
        drop(stdin);
        if let Err(k) = child.kill() {
            debug!(pid = child.id(), "kill after failed write: {k}");
        }
        if let Err(w) = child.wait() {
            warn!(pid = child.id(), "waiting on action process: {w}");
        }
        return Err(ActionError::Io(e.to_string()));
    }
    Ok(())
}

// Fire and forget: wait on a detached thread so the child does not linger as a zombie.
fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => warn!(pid, %status, "action process failed"),
            Ok(_) => {}
            Err(e) => warn!(pid, "waiting on action process: {e}"),
        });
    if let Err(e) = spawned {
        warn!(pid, "could not start reaper thread: {e}");
    }
}
