//! Hand new messages from any task to the task that owns the display.
//!
//! See [`MessageInbox`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::message::{MessageStore, MessageText, Staged, copy_truncated};

/// Latest-wins mailbox for message text.
///
/// Posting twice before the display task looks replaces the first text, the same way staging
/// twice replaces a pending message. Place it in a `static` to share it between tasks.
///
/// ```rust
/// use marquee_kit::inbox::MessageInbox;
/// use marquee_kit::message::MessageStore;
///
/// static INBOX: MessageInbox = MessageInbox::new();
///
/// INBOX.post("HSBC 58.7");
/// let mut store = MessageStore::with_current("HSBC 58.6");
/// assert!(INBOX.deliver(&mut store).is_some());
/// assert_eq!(store.pending(), b"HSBC 58.7");
/// ```
pub struct MessageInbox {
    signal: Signal<CriticalSectionRawMutex, MessageText>,
}

impl MessageInbox {
    /// Empty inbox.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Post `text`, truncating it the same way as [`MessageStore::stage_message`].
    pub fn post(&self, text: &str) -> Staged {
        let mut message = MessageText::new();
        let staged = copy_truncated(&mut message, text.as_bytes());
        self.signal.signal(message);
        staged
    }

    /// Take the posted text, if any, without waiting.
    pub fn take(&self) -> Option<MessageText> {
        self.signal.try_take()
    }

    /// Wait for a posted text.
    pub async fn wait(&self) -> MessageText {
        self.signal.wait().await
    }

    /// Stage any posted text in `store`.
    pub fn deliver(&self, store: &mut MessageStore) -> Option<Staged> {
        self.take().map(|text| store.stage_message(text))
    }
}

impl Default for MessageInbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MESSAGE_MAX_LEN;

    #[test]
    fn latest_post_wins() {
        let inbox = MessageInbox::new();
        inbox.post("first");
        inbox.post("second");
        assert_eq!(inbox.take().as_deref(), Some(&b"second"[..]));
        assert!(inbox.take().is_none());
    }

    #[test]
    fn long_posts_are_truncated() {
        let inbox = MessageInbox::new();
        let long = "z".repeat(MESSAGE_MAX_LEN + 1);
        assert_eq!(
            inbox.post(&long),
            Staged::Truncated {
                kept: MESSAGE_MAX_LEN
            }
        );
        assert_eq!(inbox.take().map(|text| text.len()), Some(MESSAGE_MAX_LEN));
    }

    #[test]
    fn posting_truncates_like_staging() {
        let inbox = MessageInbox::new();
        let long: String = (b'a'..=b'z')
            .cycle()
            .take(MESSAGE_MAX_LEN + 6)
            .map(char::from)
            .collect();
        let mut staged = MessageStore::new();
        assert_eq!(inbox.post(&long), staged.stage_message(&long));

        let mut delivered = MessageStore::new();
        assert!(inbox.deliver(&mut delivered).is_some());
        assert_eq!(delivered.pending(), staged.pending());
    }

    #[test]
    fn empty_inbox_delivers_nothing() {
        let inbox = MessageInbox::new();
        let mut store = MessageStore::new();
        assert!(inbox.deliver(&mut store).is_none());
        assert!(!store.is_pending_available());
    }
}
