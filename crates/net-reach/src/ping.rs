use crate::{ProbeError, ProbeReply, ProbeStatus, ReachabilityProbe, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
// Extra time the ping process gets past its own deadline before it is killed.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Echo probe that runs the platform `ping` binary once per call.
pub struct SystemPing {
    program: String,
}

impl SystemPing {
    pub fn new() -> Self {
        Self {
            program: "ping".to_string(),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::new()
    }
}

impl ReachabilityProbe for SystemPing {
    fn probe(&self, address: &str, timeout: Duration) -> Result<ProbeReply> {
        let address = address.trim();
        if address.is_empty() || address.starts_with('-') || address.contains(char::is_whitespace)
        {
            return Err(ProbeError::Resolve(format!("invalid address '{address}'")));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(ping_args(address, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        trace!(program = %self.program, address, "spawning ping");
        let mut child = cmd.spawn()?;

        let deadline = Instant::now() + timeout + KILL_GRACE;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                debug!(address, "ping overran its deadline");
                return Ok(ProbeReply::failed(ProbeStatus::TimedOut));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = drain(&mut child, true);
        let stderr = drain(&mut child, false);
        match status.code() {
            Some(0) => match parse_round_trip(&stdout) {
                Some(ms) => Ok(ProbeReply::success(ms)),
                None => Ok(ProbeReply::failed(classify_failure(&stdout))),
            },
            Some(1) => Ok(ProbeReply::failed(classify_failure(&stdout))),
            _ => {
                let msg = stderr.trim();
                if msg.is_empty() {
                    Err(ProbeError::Failed(format!("ping exited with {status}")))
                } else {
                    Err(ProbeError::Resolve(msg.to_string()))
                }
            }
        }
    }
}

fn drain(child: &mut Child, stdout: bool) -> String {
    let mut buf = String::new();
    let res = if stdout {
        child.stdout.take().map(|mut s| s.read_to_string(&mut buf))
    } else {
        child.stderr.take().map(|mut s| s.read_to_string(&mut buf))
    };
    if let Some(Err(e)) = res {
        trace!("reading ping output: {e}");
    }
    buf
}

#[cfg(windows)]
fn ping_args(address: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".into(),
        "1".into(),
        "-w".into(),
        timeout.as_millis().max(1).to_string(),
        address.into(),
    ]
}

#[cfg(target_os = "macos")]
fn ping_args(address: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".into(),
        "-c".into(),
        "1".into(),
        "-W".into(),
        timeout.as_millis().max(1).to_string(),
        address.into(),
    ]
}

// iputils/busybox take the reply wait in whole seconds
#[cfg(not(any(windows, target_os = "macos")))]
fn ping_args(address: &str, timeout: Duration) -> Vec<String> {
    let secs = timeout.as_millis().div_ceil(1000).max(1);
    vec![
        "-n".into(),
        "-c".into(),
        "1".into(),
        "-W".into(),
        secs.to_string(),
        address.into(),
    ]
}

/// Extract the round trip from `time=12.3 ms` (Unix) or `time=12ms` / `time<1ms` (Windows).
pub(crate) fn parse_round_trip(output: &str) -> Option<u64> {
    for line in output.lines() {
        let Some(pos) = line.find("time=").or_else(|| line.find("time<")) else {
            continue;
        };
        if line[pos..].starts_with("time<") {
            return Some(0);
        }
        let digits: String = line[pos + 5..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(ms) = digits.parse::<f64>() {
            return Some(ms.round() as u64);
        }
    }
    None
}

pub(crate) fn classify_failure(output: &str) -> ProbeStatus {
    let lower = output.to_ascii_lowercase();
    if lower.contains("destination host unreachable") {
        ProbeStatus::DestinationHostUnreachable
    } else if lower.contains("destination net unreachable")
        || lower.contains("destination network unreachable")
        || lower.contains("network is unreachable")
    {
        ProbeStatus::DestinationNetworkUnreachable
    } else if lower.contains("time to live exceeded") || lower.contains("ttl expired") {
        ProbeStatus::TtlExpired
    } else {
        ProbeStatus::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unix_round_trip() {
        let out = "PING 10.0.0.1 (10.0.0.1) 56(84) bytes of data.\n\
                   64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=3.62 ms\n";
        assert_eq!(parse_round_trip(out), Some(4));
    }

    #[test]
    fn parses_windows_round_trip() {
        assert_eq!(
            parse_round_trip("Reply from 10.0.0.1: bytes=32 time=12ms TTL=64"),
            Some(12)
        );
        assert_eq!(
            parse_round_trip("Reply from 10.0.0.1: bytes=32 time<1ms TTL=64"),
            Some(0)
        );
    }

    #[test]
    fn no_reply_has_no_round_trip() {
        assert_eq!(parse_round_trip("1 packets transmitted, 0 received"), None);
    }

    #[test]
    fn classifies_failures() {
        assert_eq!(
            classify_failure("From 10.0.0.2 icmp_seq=1 Destination Host Unreachable"),
            ProbeStatus::DestinationHostUnreachable
        );
        assert_eq!(
            classify_failure("connect: Network is unreachable"),
            ProbeStatus::DestinationNetworkUnreachable
        );
        assert_eq!(
            classify_failure("1 packets transmitted, 0 received, 100% packet loss"),
            ProbeStatus::TimedOut
        );
    }

    #[test]
    fn rejects_option_like_addresses() {
        let ping = SystemPing::new();
        let err = ping.probe("-f", Duration::from_millis(100));
        assert!(matches!(err, Err(ProbeError::Resolve(_))));
        let err = ping.probe("  ", Duration::from_millis(100));
        assert!(matches!(err, Err(ProbeError::Resolve(_))));
    }

    #[test]
    fn missing_binary_is_an_error() {
        let ping = SystemPing::with_program("/nonexistent/ping-binary");
        assert!(matches!(
            ping.probe("127.0.0.1", Duration::from_millis(100)),
            Err(ProbeError::Io(_))
        ));
    }
}
