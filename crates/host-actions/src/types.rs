use serde::{Deserialize, Serialize};

/// How the text reaches the speech program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextInput {
    /// Appended as the last command-line argument.
    #[default]
    Argument,
    /// Written to the program's stdin.
    Stdin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub input: TextInput,
}

#[cfg(windows)]
impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "powershell".to_string(),
            args: vec![
                "-NoProfile".to_string(),
                "-Command".to_string(),
                "Add-Type -AssemblyName System.Speech; \
                 (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak([Console]::In.ReadToEnd())"
                    .to_string(),
            ],
            input: TextInput::Stdin,
        }
    }
}

#[cfg(not(windows))]
impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak".to_string(),
            args: Vec::new(),
            input: TextInput::Argument,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebootConfig {
    pub program: String,
}

impl Default for RebootConfig {
    fn default() -> Self {
        Self {
            program: "shutdown".to_string(),
        }
    }
}
