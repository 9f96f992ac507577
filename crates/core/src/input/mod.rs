//! Input channel adapter.
//!
//! Hardware button bytes and remote `BUTTON:` messages are normalised into a
//! [`VoteToken`] and handed to the orchestrator through a single-slot channel.

mod channel;
mod serial;
mod token;

pub use channel::{vote_channel, VoteReceiver, VoteSender, VoteSource};
pub use serial::{read_votes, SerialReader, SerialReaderHandle, DEFAULT_RETRY_DELAY};
pub use token::{parse_button_message, VoteParseError, VoteToken, BUTTON_TAG};
