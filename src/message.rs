//! Current and pending message buffers plus the display flags.
//!
//! See [`MessageStore`].

use heapless::Vec;

/// Size of a message buffer, counting the terminator slot of the classic C layout.
pub const MESSAGE_CAPACITY: usize = 75;

/// Longest message that fits, in bytes.
pub const MESSAGE_MAX_LEN: usize = MESSAGE_CAPACITY - 1;

/// Fixed-capacity ASCII message text. The end of the vector marks the end of the message.
pub type MessageText = Vec<u8, MESSAGE_MAX_LEN>;

/// Progress flags shared between the scroll engine and whoever stages messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayFlags {
    /// One full scroll pass of the current message has been emitted.
    ///
    /// Sticky: cleared only by [`MessageStore::restart`].
    pub message_complete: bool,
    /// A staged message is waiting to replace the current one at the next wraparound.
    pub pending_available: bool,
}

/// Outcome of copying text into a message buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Staged {
    /// The whole text was stored.
    Whole,
    /// The text was longer than [`MESSAGE_MAX_LEN`]; only the first `kept` bytes were stored.
    Truncated {
        /// Number of bytes stored.
        kept: usize,
    },
}

/// Owns the message being displayed and the one queued behind it.
///
/// Writers call [`stage_message`](Self::stage_message); the scroll engine swaps the pending text
/// in only at wraparound, so a glyph is never drawn from a half-replaced message.
///
/// ```rust
/// use marquee_kit::message::{MessageStore, Staged};
///
/// let mut store = MessageStore::with_current("HSBC 58.6");
/// assert_eq!(store.stage_message("HSBC 58.7"), Staged::Whole);
/// assert!(store.is_pending_available());
/// // The current message is untouched until the engine reaches wraparound.
/// assert_eq!(store.current(), b"HSBC 58.6");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    current: MessageText,
    pending: MessageText,
    flags: DisplayFlags,
}

impl MessageStore {
    /// Create a store with empty current and pending messages.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            pending: Vec::new(),
            flags: DisplayFlags {
                message_complete: false,
                pending_available: false,
            },
        }
    }

    /// Create a store whose current message is `text` (truncated if too long).
    #[must_use]
    pub fn with_current(text: impl AsRef<[u8]>) -> Self {
        let mut store = Self::new();
        store.set_current(text);
        store
    }

    /// Replace the current message immediately.
    ///
    /// Only call this while no scroll is in flight (for example before starting a display mode).
    pub fn set_current(&mut self, text: impl AsRef<[u8]>) -> Staged {
        copy_truncated(&mut self.current, text.as_ref())
    }

    /// Copy `text` into the pending buffer and flag it as available.
    ///
    /// Text longer than [`MESSAGE_MAX_LEN`] bytes is truncated. Staging again before the swap
    /// replaces the earlier pending text.
    pub fn stage_message(&mut self, text: impl AsRef<[u8]>) -> Staged {
        let staged = copy_truncated(&mut self.pending, text.as_ref());
        self.flags.pending_available = true;
        debug!("message staged ({} bytes)", self.pending.len());
        staged
    }

    /// The message being displayed.
    #[must_use]
    pub fn current(&self) -> &[u8] {
        &self.current
    }

    /// The most recently staged message (meaningful while [`is_pending_available`](Self::is_pending_available)).
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Snapshot of both flags.
    #[must_use]
    pub const fn flags(&self) -> DisplayFlags {
        self.flags
    }

    /// See [`DisplayFlags::message_complete`].
    #[must_use]
    pub const fn is_message_complete(&self) -> bool {
        self.flags.message_complete
    }

    /// See [`DisplayFlags::pending_available`].
    #[must_use]
    pub const fn is_pending_available(&self) -> bool {
        self.flags.pending_available
    }

    /// Clear the sticky message-complete flag. Called whenever a display mode (re)starts.
    pub const fn restart(&mut self) {
        self.flags.message_complete = false;
    }

    /// Copy the pending message into the current one if one is waiting.
    ///
    /// Returns whether a swap happened. Callers must only invoke this at a message boundary.
    pub fn swap_in_pending(&mut self) -> bool {
        if !self.flags.pending_available {
            return false;
        }
        self.current.clone_from(&self.pending);
        self.flags.pending_available = false;
        debug!("pending message swapped in ({} bytes)", self.current.len());
        true
    }

    pub(crate) const fn mark_complete(&mut self) {
        self.flags.message_complete = true;
    }
}

pub(crate) fn copy_truncated(destination: &mut MessageText, text: &[u8]) -> Staged {
    let kept = text.len().min(MESSAGE_MAX_LEN);
    let (head, _) = text.split_at(kept);
    *destination = MessageText::from_slice(head).unwrap_or_default();
    if kept < text.len() {
        warn!(
            "message truncated from {} to {} bytes",
            text.len(),
            kept
        );
        Staged::Truncated { kept }
    } else {
        Staged::Whole
    }
}
