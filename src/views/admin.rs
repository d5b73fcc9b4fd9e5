use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ClientError;
use crate::models::message::{MessageDraft, MessageId, PastorMessage};
use crate::services::auth::Session;
use crate::services::pastor_messages::PastorMessageApi;
use crate::views::render::{AlertKind, Block, Button, Page};

/// Where non-admin sessions are sent instead of the panel.
pub const LOGIN_PATH: &str = "/login";

pub const PAGE_TITLE: &str = "Admin Portal - Pastor Messages";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this message?";
pub const LIST_FAILED_TEXT: &str = "Failed to fetch messages";
pub const DRAFT_INCOMPLETE_TEXT: &str = "Title and message are required";
pub const EMPTY_LIST_TEXT: &str = "No messages found. Create your first message above!";
pub const LOADING_TEXT: &str = "Loading messages...";
pub const STALE_TEXT: &str = "Showing the last loaded messages; they may be out of date.";

#[derive(Debug, thiserror::Error)]
#[error("admin access required, redirecting to {redirect}")]
pub struct AccessDenied {
    pub redirect: &'static str,
}

/// The single visible status line. Error and success can never show together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Error(String),
    Success(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Error(t) | Status::Success(t) => t,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

/// Mutating operations offered by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    Activate,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Activate => "activate",
        }
    }

    pub fn success_text(self) -> &'static str {
        match self {
            Action::Create => "Message created successfully!",
            Action::Update => "Message updated successfully!",
            Action::Delete => "Message deleted successfully!",
            Action::Activate => "Message activated successfully!",
        }
    }

    pub fn fallback_text(self) -> String {
        format!("Failed to {} message", self.verb())
    }

    pub fn auth_missing_text(self) -> String {
        format!("You must be logged in as admin to {} messages", self.verb())
    }
}

/// Interactive yes/no question asked before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Everything the panel displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminState {
    pub messages: Vec<PastorMessage>,
    /// Busy flag: an operation is in flight and every action is disabled.
    pub loading: bool,
    /// The last refresh failed and `messages` is what was loaded before it.
    pub stale: bool,
    pub status: Option<Status>,
    pub draft: MessageDraft,
    /// `None` = create mode, `Some(id)` = editing that message.
    pub editing: Option<MessageId>,
}

#[derive(Debug)]
struct Inner {
    state: AdminState,
    generation: u64,
    mounted: bool,
}

/// Identifies one in-flight operation; results for an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

/// Admin CRUD panel over the pastor-messages collection.
///
/// Clones are handles onto the same panel, so one task can render while
/// another runs an operation. The collection is re-fetched after every
/// successful mutation; the backend alone decides which message is active.
#[derive(Debug, Clone)]
pub struct AdminPanel {
    api: PastorMessageApi,
    session: Session,
    inner: Arc<Mutex<Inner>>,
}

impl AdminPanel {
    /// Check the session role, then load the collection.
    pub async fn mount(api: PastorMessageApi, session: Session) -> Result<Self, AccessDenied> {
        if !session.is_admin() {
            tracing::warn!("Non-admin session tried to open the admin panel");
            return Err(AccessDenied {
                redirect: LOGIN_PATH,
            });
        }

        let panel = Self {
            api,
            session,
            inner: Arc::new(Mutex::new(Inner {
                state: AdminState::default(),
                generation: 0,
                mounted: true,
            })),
        };
        panel.refresh().await;
        Ok(panel)
    }

    /// Tear the panel down. Responses still in flight are discarded on arrival.
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.mounted = false;
        inner.generation += 1;
        inner.state.loading = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    pub fn snapshot(&self) -> AdminState {
        self.lock().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        let inner = self.lock();
        !inner.mounted || inner.state.loading
    }

    // ── Draft editing ───────────────────────────────────────────────────────

    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().state.draft.title = title.into();
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.lock().state.draft.message = message.into();
    }

    pub fn set_active(&self, is_active: bool) {
        self.lock().state.draft.is_active = is_active;
    }

    /// Copy a listed message into the draft and switch to update mode.
    /// Returns false when busy or when the id is not in the current list.
    pub fn start_edit(&self, id: MessageId) -> bool {
        let mut inner = self.lock();
        if !inner.mounted || inner.state.loading {
            return false;
        }
        let Some(draft) = inner
            .state
            .messages
            .iter()
            .find(|m| m.id == id)
            .map(MessageDraft::from)
        else {
            return false;
        };
        inner.state.draft = draft;
        inner.state.editing = Some(id);
        true
    }

    pub fn cancel_edit(&self) {
        let mut inner = self.lock();
        inner.state.editing = None;
        inner.state.draft = MessageDraft::default();
    }

    // ── Operations ──────────────────────────────────────────────────────────

    /// List: re-fetch the whole collection.
    pub async fn refresh(&self) {
        let Some(ticket) = self.begin() else {
            return;
        };
        self.reload(ticket).await;
    }

    /// Create or update, depending on the edit mode.
    pub async fn submit(&self) {
        let Some(ticket) = self.begin() else {
            return;
        };
        let (editing, draft) = {
            let inner = self.lock();
            (inner.state.editing, inner.state.draft.clone())
        };
        let action = if editing.is_some() {
            Action::Update
        } else {
            Action::Create
        };

        if !draft.is_complete() {
            self.finish(ticket, |s| {
                s.status = Some(Status::Error(DRAFT_INCOMPLETE_TEXT.into()));
            });
            return;
        }
        if !self.has_credentials(ticket, action) {
            return;
        }

        let result = match editing {
            Some(id) => self.api.update(&self.session, id, &draft).await,
            None => self.api.create(&self.session, &draft).await,
        };
        let result = result.map(|saved| match saved {
            Some(m) => tracing::info!("Saved pastor message {}", m.id),
            None => tracing::info!("Saved pastor message"),
        });
        self.settle(ticket, action, result).await;
    }

    /// Delete after the user confirms. Declining is not an error and changes nothing.
    pub async fn delete(&self, id: MessageId, confirm: &impl Confirm) {
        if self.is_busy() {
            return;
        }
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!("Delete of pastor message {} cancelled", id);
            return;
        }
        let Some(ticket) = self.begin() else {
            return;
        };
        if !self.has_credentials(ticket, Action::Delete) {
            return;
        }
        let result = self.api.delete(&self.session, id).await;
        self.settle(ticket, Action::Delete, result).await;
    }

    pub async fn activate(&self, id: MessageId) {
        let Some(ticket) = self.begin() else {
            return;
        };
        if !self.has_credentials(ticket, Action::Activate) {
            return;
        }
        let result = self.api.activate(&self.session, id).await;
        self.settle(ticket, Action::Activate, result).await;
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim the busy flag and clear the status. `None` if busy or unmounted.
    fn begin(&self) -> Option<Ticket> {
        let mut inner = self.lock();
        if !inner.mounted || inner.state.loading {
            return None;
        }
        inner.generation += 1;
        inner.state.loading = true;
        inner.state.status = None;
        Some(Ticket(inner.generation))
    }

    /// Apply `f` if `ticket` is still the current operation of a mounted panel.
    fn apply(&self, ticket: Ticket, f: impl FnOnce(&mut AdminState)) -> bool {
        let mut inner = self.lock();
        if !inner.mounted || inner.generation != ticket.0 {
            tracing::debug!("Discarding late response for operation {}", ticket.0);
            return false;
        }
        f(&mut inner.state);
        true
    }

    fn finish(&self, ticket: Ticket, f: impl FnOnce(&mut AdminState)) {
        self.apply(ticket, |s| {
            f(s);
            s.loading = false;
        });
    }

    fn has_credentials(&self, ticket: Ticket, action: Action) -> bool {
        if self.session.is_logged_in() {
            return true;
        }
        self.finish(ticket, |s| {
            s.status = Some(Status::Error(action.auth_missing_text()));
        });
        false
    }

    async fn reload(&self, ticket: Ticket) {
        let result = self.api.list().await;
        if let Err(e) = &result {
            tracing::error!("Error fetching messages: {}", e);
        }
        self.finish(ticket, |s| match result {
            Ok(messages) => {
                s.messages = messages;
                s.stale = false;
            }
            Err(e) => {
                s.stale = true;
                s.status = Some(Status::Error(list_error_text(&e)));
            }
        });
    }

    async fn settle(&self, ticket: Ticket, action: Action, result: Result<(), ClientError>) {
        match result {
            Ok(()) => {
                let applied = self.apply(ticket, |s| {
                    s.status = Some(Status::Success(action.success_text().into()));
                    if matches!(action, Action::Create | Action::Update) {
                        s.draft = MessageDraft::default();
                        s.editing = None;
                    }
                });
                if applied {
                    self.reload(ticket).await;
                }
            }
            Err(e) => {
                tracing::error!("Error trying to {} message: {}", action.verb(), e);
                let text = match e {
                    ClientError::AuthMissing => action.auth_missing_text(),
                    e => e.user_message(&action.fallback_text()),
                };
                self.finish(ticket, |s| s.status = Some(Status::Error(text)));
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    pub fn render(&self) -> Page {
        render_state(&self.snapshot())
    }
}

fn list_error_text(e: &ClientError) -> String {
    match e {
        ClientError::Server { .. } => LIST_FAILED_TEXT.to_string(),
        e => e.user_message(LIST_FAILED_TEXT),
    }
}

pub fn render_state(state: &AdminState) -> Page {
    let enabled = !state.loading;
    let mut page = Page::new();
    page.heading(1, PAGE_TITLE);

    if let Some(status) = &state.status {
        let kind = if status.is_error() {
            AlertKind::Error
        } else {
            AlertKind::Success
        };
        page.push(Block::Alert {
            kind,
            text: status.text().to_string(),
        });
    }

    let editing = state.editing.is_some();
    page.heading(2, if editing { "Edit Message" } else { "Create New Message" })
        .push(Block::Field {
            label: "Title:".into(),
            value: state.draft.title.clone(),
        })
        .push(Block::Field {
            label: "Message:".into(),
            value: state.draft.message.clone(),
        })
        .push(Block::Checkbox {
            label: "Set as Active Message".into(),
            checked: state.draft.is_active,
        });

    let submit = match (state.loading, editing) {
        (true, _) => "Saving...",
        (false, true) => "Update Message",
        (false, false) => "Create Message",
    };
    page.push(Block::Button(Button::new(submit, enabled)));
    if editing {
        page.push(Block::Button(Button::new("Cancel", true)));
    }

    page.heading(2, "All Pastor Messages");
    if state.loading {
        page.paragraph(LOADING_TEXT);
    } else {
        if state.stale {
            page.paragraph(STALE_TEXT);
        }
        if state.messages.is_empty() {
            page.paragraph(EMPTY_LIST_TEXT);
        }
    }

    for m in &state.messages {
        let mut actions = vec![Button::new("Edit", enabled)];
        if !m.is_active {
            actions.push(Button::new("Activate", enabled));
        }
        actions.push(Button::new("Delete", enabled));
        page.push(Block::Card {
            title: m.title.clone(),
            active: m.is_active,
            body: m.message.clone(),
            actions,
        });
    }

    page
}
