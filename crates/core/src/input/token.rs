use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag prefix of an inbound remote button press.
pub const BUTTON_TAG: &str = "BUTTON:";

/// Which participant of the current duel a press is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteToken {
    One,
    Two,
}

impl VoteToken {
    /// Map a raw device byte; anything but `1` or `2` is noise.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'1' => Some(Self::One),
            b'2' => Some(Self::Two),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Two => "two",
        }
    }
}

impl std::fmt::Display for VoteToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteParseError {
    #[error("not a button message")]
    NotAButtonMessage,

    #[error("malformed button payload: {0}")]
    Malformed(String),

    #[error("invalid vote: button {0:?}")]
    InvalidVote(String),
}

#[derive(Deserialize)]
struct ButtonPayload {
    button: String,
}

/// Parse `BUTTON: {"button": "1"}` into a token.
pub fn parse_button_message(message: &str) -> Result<VoteToken, VoteParseError> {
    let payload = message
        .trim()
        .strip_prefix(BUTTON_TAG)
        .ok_or(VoteParseError::NotAButtonMessage)?;

    let payload: ButtonPayload = serde_json::from_str(payload.trim())
        .map_err(|e| VoteParseError::Malformed(e.to_string()))?;

    match payload.button.as_str() {
        "1" => Ok(VoteToken::One),
        "2" => Ok(VoteToken::Two),
        _ => Err(VoteParseError::InvalidVote(payload.button)),
    }
}
