//! Inline edit state machine.
//!
//! At most one link is in edit mode. Starting an edit on another link drops
//! the unsaved draft of the previous one.

use crate::client::LinkService;
use crate::directory::LinkDirectory;
use crate::errors::{ErrorKind, ServiceError};
use crate::models::Link;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub short_code: String,
    pub draft_long_url: String,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("no link is being edited")]
    NoActiveSession,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActiveSession => ErrorKind::Validation,
            Self::Service(err) => err.kind(),
        }
    }
}

/// Snapshot of a session taken when its save request goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub short_code: String,
    pub long_url: String,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct EditController {
    state: EditState,
    epoch: u64,
}

impl EditController {
    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing(session) => Some(session),
        }
    }

    pub fn is_editing(&self, short_code: &str) -> bool {
        self.session()
            .is_some_and(|session| session.short_code == short_code)
    }

    pub fn start_edit(&mut self, link: &Link) {
        self.epoch += 1;
        self.state = EditState::Editing(EditSession {
            short_code: link.short_code.clone(),
            draft_long_url: link.long_url.clone(),
            epoch: self.epoch,
        });
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        match &mut self.state {
            EditState::Editing(session) => {
                session.draft_long_url = text.into();
                Ok(())
            }
            EditState::Idle => Err(EditError::NoActiveSession),
        }
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    pub fn begin_commit(&self) -> Result<PendingCommit, EditError> {
        let session = self.session().ok_or(EditError::NoActiveSession)?;
        Ok(PendingCommit {
            short_code: session.short_code.clone(),
            long_url: session.draft_long_url.clone(),
            epoch: session.epoch,
        })
    }

    /// Applies the outcome of a save.
    ///
    /// A success only closes the session it was issued for; if the user
    /// moved on to another session meanwhile, that session is left alone.
    /// A failure never touches the session, so the draft can be retried.
    pub fn finish_commit(
        &mut self,
        pending: &PendingCommit,
        result: Result<Link, ServiceError>,
    ) -> Result<Link, EditError> {
        let link = result?;
        let current = self
            .session()
            .is_some_and(|session| session.epoch == pending.epoch);
        if current {
            self.state = EditState::Idle;
        } else {
            debug!(short_code = %pending.short_code, "save landed after the session moved on");
        }
        Ok(link)
    }

    pub async fn commit(&mut self, service: &dyn LinkService) -> Result<Link, EditError> {
        let pending = self.begin_commit()?;
        let result = service
            .update_link(&pending.short_code, &pending.long_url)
            .await;
        self.finish_commit(&pending, result)
    }

    /// Drops the session if its link disappeared from the directory.
    ///
    /// Returns `true` when a session was dropped.
    pub fn reconcile(&mut self, directory: &LinkDirectory) -> bool {
        let orphaned = self
            .session()
            .is_some_and(|session| !directory.contains(&session.short_code));
        if orphaned {
            self.cancel();
        }
        orphaned
    }
}
