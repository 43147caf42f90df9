//! Inline rename state. One song at most is being edited at a time.

use drummer_proto::protocol::SongId;

/// Generation stamp of one edit session. A rename reply only resolves the
/// session it was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: EditId,
    pub song_id: SongId,
    pub draft: String,
    /// A rename request for this session is in flight.
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Why `begin_save` refused to produce a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejected {
    NotEditing,
    BlankName,
    InFlight,
}

#[derive(Debug, Default)]
pub struct EditController {
    state: EditState,
    next_id: u64,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode for `song_id`, seeding the draft with its current name.
    /// Any other session is discarded.
    pub fn start(&mut self, song_id: SongId, current_name: &str) {
        self.next_id += 1;
        self.state = EditState::Editing(EditSession {
            id: EditId(self.next_id),
            song_id,
            draft: current_name.to_string(),
            saving: false,
        });
    }

    /// Ignored while idle or while the session's save is in flight.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        if let EditState::Editing(session) = &mut self.state {
            if !session.saving {
                session.draft = text.into();
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    /// Cancel only if the session targets `song_id`.
    pub fn cancel_for(&mut self, song_id: &str) {
        if self.is_editing(song_id) {
            self.cancel();
        }
    }

    pub fn editing(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self, song_id: &str) -> bool {
        self.editing().is_some_and(|s| s.song_id == song_id)
    }

    /// Validate the draft and mark the session as saving.
    ///
    /// The name is returned exactly as typed; only the blank check trims.
    pub fn begin_save(&mut self) -> Result<(EditId, SongId, String), SaveRejected> {
        let EditState::Editing(session) = &mut self.state else {
            return Err(SaveRejected::NotEditing);
        };
        if session.saving {
            return Err(SaveRejected::InFlight);
        }
        if session.draft.trim().is_empty() {
            return Err(SaveRejected::BlankName);
        }
        session.saving = true;
        Ok((session.id, session.song_id.clone(), session.draft.clone()))
    }

    /// Resolve the in-flight save of session `id`.
    ///
    /// On success the editor goes idle; on failure the session stays open
    /// with its draft. Replies for any other session are ignored. Returns
    /// whether the reply matched the live session.
    pub fn finish_save(&mut self, id: EditId, succeeded: bool) -> bool {
        let EditState::Editing(session) = &mut self.state else {
            return false;
        };
        if session.id != id || !session.saving {
            return false;
        }
        if succeeded {
            self.state = EditState::Idle;
        } else {
            session.saving = false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_seeds_draft_and_replaces_previous() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        edit.start("b".into(), "Beta");
        let session = edit.editing().unwrap();
        assert_eq!(session.song_id, "b");
        assert_eq!(session.draft, "Beta");
        assert!(!edit.is_editing("a"));
    }

    #[test]
    fn test_update_draft_ignored_when_idle() {
        let mut edit = EditController::new();
        edit.update_draft("ghost");
        assert!(edit.editing().is_none());
    }

    #[test]
    fn test_blank_draft_rejected() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        edit.update_draft("   ");
        assert_eq!(edit.begin_save(), Err(SaveRejected::BlankName));
        assert!(!edit.editing().unwrap().saving);
    }

    #[test]
    fn test_second_save_while_in_flight() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        edit.update_draft(" Alpha 2 ");
        let (_, song_id, name) = edit.begin_save().unwrap();
        assert_eq!(song_id, "a");
        assert_eq!(name, " Alpha 2 ");
        assert_eq!(edit.begin_save(), Err(SaveRejected::InFlight));
    }

    #[test]
    fn test_finish_save_failure_keeps_draft() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        edit.update_draft("New");
        let (id, _, _) = edit.begin_save().unwrap();
        assert!(edit.finish_save(id, false));
        let session = edit.editing().unwrap();
        assert_eq!(session.draft, "New");
        assert!(!session.saving);
    }

    #[test]
    fn test_finish_save_for_other_song_keeps_session() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        let (id, _, _) = edit.begin_save().unwrap();
        edit.start("b".into(), "Beta");
        assert!(!edit.finish_save(id, true));
        assert!(edit.is_editing("b"));
    }

    #[test]
    fn test_reply_for_earlier_session_on_same_song() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        let (old, _, _) = edit.begin_save().unwrap();
        edit.cancel();
        edit.start("a".into(), "Alpha");
        edit.update_draft("Second draft");

        assert!(!edit.finish_save(old, true));
        let session = edit.editing().unwrap();
        assert_eq!(session.draft, "Second draft");
        assert!(!session.saving);
    }

    #[test]
    fn test_draft_frozen_while_saving() {
        let mut edit = EditController::new();
        edit.start("a".into(), "Alpha");
        edit.update_draft("Alpha 2");
        edit.begin_save().unwrap();
        edit.update_draft("Alpha 23");
        assert_eq!(edit.editing().unwrap().draft, "Alpha 2");
    }

    #[test]
    fn test_not_editing() {
        let mut edit = EditController::new();
        assert_eq!(edit.begin_save(), Err(SaveRejected::NotEditing));
    }
}
