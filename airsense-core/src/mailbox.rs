//! Single-slot mailbox for the server configuration message
//!
//! The network task posts at most one payload; the cycle controller polls
//! and consumes it. Taking the message clears the slot, so a second poll in
//! the same cycle sees nothing. A newer post replaces an unread one.

use heapless::Vec;

/// Largest payload the mailbox accepts (bytes)
pub const CONFIG_MESSAGE_CAPACITY: usize = 512;

/// Payload buffer type
pub type ConfigPayload = Vec<u8, CONFIG_MESSAGE_CAPACITY>;

/// Reasons a post is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    /// Payload exceeds [`CONFIG_MESSAGE_CAPACITY`]
    TooLarge {
        /// Offered length
        len: usize,
    },
    /// Zero-length payload
    Empty,
}

/// Server configuration mailbox
#[derive(Debug, Clone, Default)]
pub struct ConfigMailbox {
    payload: ConfigPayload,
    valid: bool,
}

impl ConfigMailbox {
    /// Empty mailbox
    pub const fn new() -> Self {
        Self { payload: Vec::new(), valid: false }
    }

    /// Store a payload, replacing any unread one
    pub fn post(&mut self, bytes: &[u8]) -> Result<(), PostError> {
        if bytes.is_empty() {
            return Err(PostError::Empty);
        }
        self.payload.clear();
        if self.payload.extend_from_slice(bytes).is_err() {
            self.valid = false;
            return Err(PostError::TooLarge { len: bytes.len() });
        }
        if self.valid {
            log_warn!("unread server config replaced");
        }
        self.valid = true;
        Ok(())
    }

    /// Whether a message is waiting
    pub const fn is_pending(&self) -> bool {
        self.valid
    }

    /// Length of the waiting message, zero when empty
    pub fn len(&self) -> usize {
        if self.valid {
            self.payload.len()
        } else {
            0
        }
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        !self.valid
    }

    /// Consume the waiting message
    pub fn take(&mut self) -> Option<ConfigPayload> {
        if !self.valid {
            return None;
        }
        self.valid = false;
        let payload = core::mem::take(&mut self.payload);
        log_info!("server config consumed ({} bytes)", payload.len());
        Some(payload)
    }
}
