//! Coordinates clipboard reads/writes between a local cache and an outer
//! terminal reached via OSC 52, per selection type and policy mode.
//!
//! The coordinator never touches a real clock: every operation takes the
//! caller's own notion of "now" (`reception`) so behavior stays
//! deterministic and replayable in tests.

use std::collections::VecDeque;
use std::time::Duration;

use vtx_vte::escapes::osc52::SelectionType;
use vtx_vte::feature::Feature;

/// How long a pending system-clipboard request waits before it is given up
/// on and answered from the local cache instead.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

const SELECTION_TYPE_COUNT: usize = 10;

fn selection_index(selection_type: SelectionType) -> usize {
    selection_type as usize
}

/// Numbered buffer selections (`_0`..`_7`) never leave the local cache,
/// regardless of mode or feature bit.
fn is_local_only(selection_type: SelectionType) -> bool {
    !matches!(selection_type, SelectionType::Clipboard | SelectionType::Selection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    System,
    SystemWriteLocalRead,
    SystemWriteNoRead,
    Local,
    LocalWriteNoRead,
    Disabled,
}

/// Caller-supplied originator of a clipboard request, echoed back unchanged
/// on the matching [`Reply`] so the caller can route it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identifier {
    pub session_id: u64,
    pub tab_id: u64,
    pub pane_id: u64,
}

impl Identifier {
    pub fn new(session_id: u64, tab_id: u64, pane_id: u64) -> Self {
        Self { session_id, tab_id, pane_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub identifier: Identifier,
    pub selection_type: SelectionType,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct Request {
    reception: Duration,
    identifier: Identifier,
}

#[derive(Debug, Clone, Default)]
struct SelectionState {
    data: Vec<u8>,
    requests: VecDeque<Request>,
    system_working: bool,
}

enum ReadAction {
    Ignore,
    ReadLocal,
    RequestSystemReadLocal,
    ReadSystem,
}

enum WriteAction {
    Ignore,
    WriteLocal,
    WriteSystem,
}

/// Per-selection local cache plus pending-request bookkeeping for the
/// subset of selections (`Clipboard`, `Selection`) that may be forwarded to
/// a real terminal via OSC 52.
pub struct Clipboard {
    mode: ClipboardMode,
    features: Feature,
    state: [SelectionState; SELECTION_TYPE_COUNT],
    replies: Vec<Reply>,
}

impl Clipboard {
    pub fn new(mode: ClipboardMode, features: Feature) -> Self {
        Self {
            mode,
            features,
            state: std::array::from_fn(|_| SelectionState::default()),
            replies: Vec::new(),
        }
    }

    /// Stores `data` locally per policy; returns whether the caller should
    /// also write it out to the real terminal via OSC 52.
    pub fn set(&mut self, selection_type: SelectionType, data: Vec<u8>, reception: Duration) -> bool {
        let write_system = match self.action_for_write(selection_type) {
            WriteAction::Ignore => false,
            WriteAction::WriteSystem => {
                self.state[selection_index(selection_type)].data = data;
                true
            }
            WriteAction::WriteLocal => {
                self.state[selection_index(selection_type)].data = data;
                false
            }
        };
        self.expire(reception);
        write_system
    }

    /// Registers a read request, replying immediately from the local cache
    /// when policy allows it; returns whether the caller should query the
    /// real terminal via OSC 52.
    pub fn request(&mut self, selection_type: SelectionType, identifier: Identifier, reception: Duration) -> bool {
        self.expire(reception);

        let mut request_system = false;
        let data = match self.action_for_read(selection_type) {
            ReadAction::Ignore => Some(Vec::new()),
            ReadAction::RequestSystemReadLocal => {
                request_system = true;
                Some(self.state[selection_index(selection_type)].data.clone())
            }
            ReadAction::ReadLocal => Some(self.state[selection_index(selection_type)].data.clone()),
            ReadAction::ReadSystem => {
                request_system = true;
                None
            }
        };

        match data {
            Some(data) => self.replies.push(Reply { identifier, selection_type, data }),
            None => self.state[selection_index(selection_type)].requests.push_back(Request { reception, identifier }),
        }

        request_system
    }

    /// Records a system-clipboard response. An empty payload is treated as
    /// a probable permission denial and leaves the local cache untouched,
    /// but still marks the system clipboard as reachable.
    pub fn got_response(&mut self, selection_type: SelectionType, data: Vec<u8>, reception: Duration) {
        let state = &mut self.state[selection_index(selection_type)];
        state.system_working = true;
        if !data.is_empty() {
            state.data = data;
        }
        if let Some(request) = state.requests.pop_front() {
            self.replies.push(Reply {
                identifier: request.identifier,
                selection_type,
                data: state.data.clone(),
            });
        }
        self.expire(reception);
    }

    /// Drains and returns every reply accumulated so far.
    pub fn take_replies(&mut self, reception: Duration) -> Vec<Reply> {
        self.expire(reception);
        std::mem::take(&mut self.replies)
    }

    fn expire(&mut self, reception: Duration) {
        for (index, state) in self.state.iter_mut().enumerate() {
            while let Some(request) = state.requests.front() {
                if request.reception + REQUEST_TIMEOUT > reception {
                    break;
                }
                let request = state.requests.pop_front().unwrap();
                let selection_type = SELECTION_TYPES[index];
                log::trace!("system clipboard read for {selection_type:?} timed out, falling back to local cache");
                self.replies.push(Reply {
                    identifier: request.identifier,
                    selection_type,
                    data: state.data.clone(),
                });
                state.system_working = false;
            }
        }
    }

    fn action_for_read(&self, selection_type: SelectionType) -> ReadAction {
        match self.mode {
            ClipboardMode::SystemWriteLocalRead | ClipboardMode::Local => return ReadAction::ReadLocal,
            ClipboardMode::SystemWriteNoRead | ClipboardMode::LocalWriteNoRead | ClipboardMode::Disabled => {
                return ReadAction::Ignore
            }
            ClipboardMode::System => {}
        }

        if !self.features.contains(Feature::CLIPBOARD) || is_local_only(selection_type) {
            return ReadAction::ReadLocal;
        }

        if self.state[selection_index(selection_type)].system_working {
            ReadAction::ReadSystem
        } else {
            ReadAction::RequestSystemReadLocal
        }
    }

    fn action_for_write(&self, selection_type: SelectionType) -> WriteAction {
        match self.mode {
            ClipboardMode::Local | ClipboardMode::LocalWriteNoRead => return WriteAction::WriteLocal,
            ClipboardMode::Disabled => return WriteAction::Ignore,
            ClipboardMode::System | ClipboardMode::SystemWriteLocalRead | ClipboardMode::SystemWriteNoRead => {}
        }

        if !self.features.contains(Feature::CLIPBOARD) || is_local_only(selection_type) {
            return WriteAction::WriteLocal;
        }
        WriteAction::WriteSystem
    }
}

const SELECTION_TYPES: [SelectionType; SELECTION_TYPE_COUNT] = [
    SelectionType::Clipboard,
    SelectionType::Selection,
    SelectionType::Buffer0,
    SelectionType::Buffer1,
    SelectionType::Buffer2,
    SelectionType::Buffer3,
    SelectionType::Buffer4,
    SelectionType::Buffer5,
    SelectionType::Buffer6,
    SelectionType::Buffer7,
];

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            requests: VecDeque::new(),
            system_working: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn system_mode_requests_and_expires() {
        let mut clipboard = Clipboard::new(ClipboardMode::System, Feature::CLIPBOARD);
        let id = Identifier::new(1, 2, 3);
        let t = secs(1000);

        clipboard.got_response(SelectionType::Clipboard, b"1".to_vec(), t);
        assert!(clipboard.request(SelectionType::Clipboard, id, t));
        assert!(clipboard.take_replies(t).is_empty());

        clipboard.got_response(SelectionType::Clipboard, b"4".to_vec(), t);
        let replies = clipboard.take_replies(t);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: b"4".to_vec() }]);

        // A fresh request expires once the timeout has elapsed, falling
        // back to the cached local value.
        assert!(clipboard.request(SelectionType::Clipboard, id, t));
        assert!(clipboard.take_replies(t).is_empty());
        let t2 = t + REQUEST_TIMEOUT;
        let replies = clipboard.take_replies(t2);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: b"4".to_vec() }]);

        // The system clipboard is now considered broken, so the next
        // request is answered immediately from the local cache.
        assert!(clipboard.request(SelectionType::Clipboard, id, t2));
        let replies = clipboard.take_replies(t2);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: b"4".to_vec() }]);

        assert!(clipboard.set(SelectionType::Clipboard, b"5".to_vec(), t2));
        assert!(clipboard.request(SelectionType::Clipboard, id, t2));
        let replies = clipboard.take_replies(t2);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: b"5".to_vec() }]);
    }

    #[test]
    fn local_mode_never_requests_system() {
        let mut clipboard = Clipboard::new(ClipboardMode::Local, Feature::CLIPBOARD);
        let id = Identifier::new(1, 2, 3);
        let t = secs(1000);

        assert!(!clipboard.request(SelectionType::Clipboard, id, t));
        let replies = clipboard.take_replies(t);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: Vec::new() }]);

        assert!(!clipboard.set(SelectionType::Clipboard, b"5".to_vec(), t));
        assert!(!clipboard.request(SelectionType::Clipboard, id, t));
        let replies = clipboard.take_replies(t);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: b"5".to_vec() }]);
    }

    #[test]
    fn numbered_buffers_are_always_local() {
        let mut clipboard = Clipboard::new(ClipboardMode::System, Feature::CLIPBOARD);
        let id = Identifier::new(0, 0, 0);
        let t = secs(0);

        assert!(!clipboard.set(SelectionType::Buffer3, b"x".to_vec(), t));
        assert!(!clipboard.request(SelectionType::Buffer3, id, t));
        let replies = clipboard.take_replies(t);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Buffer3, data: b"x".to_vec() }]);
    }

    #[test]
    fn missing_clipboard_feature_downgrades_to_local() {
        let mut clipboard = Clipboard::new(ClipboardMode::System, Feature::empty());
        let id = Identifier::new(0, 0, 0);
        let t = secs(0);

        assert!(!clipboard.set(SelectionType::Clipboard, b"x".to_vec(), t));
        assert!(!clipboard.request(SelectionType::Clipboard, id, t));
    }

    #[test]
    fn disabled_mode_ignores_everything() {
        let mut clipboard = Clipboard::new(ClipboardMode::Disabled, Feature::CLIPBOARD);
        let id = Identifier::new(0, 0, 0);
        let t = secs(0);

        assert!(!clipboard.set(SelectionType::Clipboard, b"x".to_vec(), t));
        assert!(!clipboard.request(SelectionType::Clipboard, id, t));
        let replies = clipboard.take_replies(t);
        assert_eq!(replies, vec![Reply { identifier: id, selection_type: SelectionType::Clipboard, data: Vec::new() }]);
    }
}
