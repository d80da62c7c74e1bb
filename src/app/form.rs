//! Add/edit form controller.
//!
//! The form is either closed, open to add a new user, or open to edit an
//! existing one. Submitting writes into the [`WorkingSet`] only; nothing is
//! sent back to the endpoint.
use tracing::{info, warn};

use crate::model::{UserId, UserRecord, WorkingSet};

/// Editable draft fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DraftField {
    Id,
    Name,
    Email,
}

/// Transient record bound to the form inputs.
///
/// `username` is kept equal to `name` followed by `id`; it is never set directly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    username: String,
}

impl DraftRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_record(record: &UserRecord) -> Self {
        let mut draft = Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            username: String::new(),
        };
        draft.recompute_username();
        draft
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty() && self.email.is_empty() && self.username.is_empty()
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
        self.after_edit(field);
    }

    pub fn push_char(&mut self, field: DraftField, c: char) {
        self.field_mut(field).push(c);
        self.after_edit(field);
    }

    pub fn pop_char(&mut self, field: DraftField) {
        self.field_mut(field).pop();
        self.after_edit(field);
    }

    fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Id => &mut self.id,
            DraftField::Name => &mut self.name,
            DraftField::Email => &mut self.email,
        }
    }

    fn after_edit(&mut self, field: DraftField) {
        if matches!(field, DraftField::Name | DraftField::Id) {
            self.recompute_username();
        }
    }

    fn recompute_username(&mut self) {
        self.username = format!("{}{}", self.name, self.id);
    }
}

/// Which control of the open form has keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Name,
    Email,
    Cancel,
    Submit,
}

impl FormFocus {
    pub fn next(self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Email,
            FormFocus::Email => FormFocus::Cancel,
            FormFocus::Cancel => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormFocus::Name => FormFocus::Submit,
            FormFocus::Email => FormFocus::Name,
            FormFocus::Cancel => FormFocus::Email,
            FormFocus::Submit => FormFocus::Cancel,
        }
    }

    /// The draft field behind this control, if it is a text input.
    pub fn field(self) -> Option<DraftField> {
        match self {
            FormFocus::Name => Some(DraftField::Name),
            FormFocus::Email => Some(DraftField::Email),
            FormFocus::Cancel | FormFocus::Submit => None,
        }
    }
}

/// What a submit did to the working set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(UserId),
    Updated(UserId),
    /// The edited record was no longer in the set.
    Missing(UserId),
}

#[derive(Clone, Debug, Default)]
pub enum FormState {
    #[default]
    Closed,
    OpenForAdd {
        draft: DraftRecord,
        focus: FormFocus,
    },
    OpenForEdit {
        target: UserId,
        draft: DraftRecord,
        focus: FormFocus,
    },
}

impl FormState {
    /// Open with an all-empty draft, whatever the previous state was.
    pub fn open_add() -> Self {
        FormState::OpenForAdd {
            draft: DraftRecord::empty(),
            focus: FormFocus::default(),
        }
    }

    pub fn open_edit(record: &UserRecord) -> Self {
        FormState::OpenForEdit {
            target: record.id.clone(),
            draft: DraftRecord::from_record(record),
            focus: FormFocus::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, FormState::OpenForEdit { .. })
    }

    pub fn draft(&self) -> Option<&DraftRecord> {
        match self {
            FormState::Closed => None,
            FormState::OpenForAdd { draft, .. } | FormState::OpenForEdit { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut DraftRecord> {
        match self {
            FormState::Closed => None,
            FormState::OpenForAdd { draft, .. } | FormState::OpenForEdit { draft, .. } => Some(draft),
        }
    }

    pub fn focus(&self) -> Option<FormFocus> {
        match self {
            FormState::Closed => None,
            FormState::OpenForAdd { focus, .. } | FormState::OpenForEdit { focus, .. } => Some(*focus),
        }
    }

    pub fn set_focus(&mut self, to: FormFocus) {
        if let FormState::OpenForAdd { focus, .. } | FormState::OpenForEdit { focus, .. } = self {
            *focus = to;
        }
    }

    /// Drop the draft and close. The working set is untouched.
    pub fn cancel(&mut self) {
        *self = FormState::Closed;
    }

    /// Apply the draft to `users` and close the form.
    ///
    /// Adding prepends a record with a freshly generated id. Editing merges the
    /// draft's name and email into the record with the target id. Returns
    /// `None` if the form was not open.
    pub fn submit(&mut self, users: &mut WorkingSet) -> Option<SubmitOutcome> {
        match std::mem::take(self) {
            FormState::Closed => None,
            FormState::OpenForAdd { draft, .. } => {
                let id = users.fresh_id();
                users.prepend(UserRecord {
                    id: id.clone(),
                    name: draft.name,
                    email: draft.email,
                });
                info!(%id, "user created");
                Some(SubmitOutcome::Created(id))
            }
            FormState::OpenForEdit { target, draft, .. } => {
                let updated = users.update_by_id(&target, |record| {
                    record.name = draft.name;
                    record.email = draft.email;
                });
                if updated {
                    info!(id = %target, "user updated");
                    Some(SubmitOutcome::Updated(target))
                } else {
                    warn!(id = %target, "edited user is no longer present");
                    Some(SubmitOutcome::Missing(target))
                }
            }
        }
    }
}
