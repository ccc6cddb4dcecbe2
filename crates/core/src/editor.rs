//! Admin editor state machine.
//!
//! One form buffer per editor. `Closed -> Creating | Editing(id)`, a guarded
//! submit that either closes the editor (success) or leaves the buffer intact
//! (failure), and a two-step delete. The async driver that talks to the store
//! lives in `folio-db`.

use validator::Validate;

use crate::content::{Certificate, ContactMessage, ContentItem, ContentKind, DesignAsset, Experience, Skill};
use crate::error::CoreError;
use crate::types::DocId;

/// A content kind that can be edited through a form buffer.
pub trait Editable: ContentKind {
    type Form: Validate + Clone + Default + Send + Sync + std::fmt::Debug;

    fn to_form(&self) -> Self::Form;
    fn from_form(form: &Self::Form) -> Self;
}

/// Kinds whose form buffer is the record itself.
macro_rules! edit_in_place {
    ($($kind:ty),* $(,)?) => {
        $(
            impl Editable for $kind {
                type Form = $kind;

                fn to_form(&self) -> Self::Form {
                    self.clone()
                }

                fn from_form(form: &Self::Form) -> Self {
                    form.clone()
                }
            }
        )*
    };
}

edit_in_place!(Experience, Skill, Certificate, DesignAsset, ContactMessage);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Closed,
    Creating,
    Editing(DocId),
}

/// The store call a submit resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitPlan<T> {
    Create(T),
    Update(DocId, T),
}

#[derive(Debug)]
pub struct Editor<T: Editable> {
    mode: EditorMode,
    buffer: Option<T::Form>,
    submitting: bool,
    pending_delete: Option<DocId>,
}

impl<T: Editable> Default for Editor<T> {
    fn default() -> Self {
        Self {
            mode: EditorMode::Closed,
            buffer: None,
            submitting: false,
            pending_delete: None,
        }
    }
}

impl<T: Editable> Editor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn buffer(&self) -> Option<&T::Form> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut T::Form> {
        self.buffer.as_mut()
    }

    pub fn editing_id(&self) -> Option<&DocId> {
        match &self.mode {
            EditorMode::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Open a blank form. Discards any open buffer.
    pub fn open_create(&mut self) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.mode = EditorMode::Creating;
        self.buffer = Some(T::Form::default());
        Ok(())
    }

    /// Load `item` into the form. Discards any open buffer.
    pub fn open_edit(&mut self, item: &ContentItem<T>) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.mode = EditorMode::Editing(item.id.clone());
        self.buffer = Some(item.fields.to_form());
        Ok(())
    }

    /// Close the form and drop the buffer. Refused while a submit is in
    /// flight; the outcome of that submit decides whether the form closes.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.close();
        Ok(())
    }

    fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.buffer = None;
    }

    /// Validate the buffer and mark a submit in flight.
    ///
    /// Fails without side effects when the editor is closed, a submit is
    /// already in flight, or a required field is blank.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan<T>, CoreError> {
        if self.submitting {
            return Err(CoreError::Conflict("A submit is already in progress".into()));
        }
        let form = match (&self.mode, &self.buffer) {
            (EditorMode::Closed, _) | (_, None) => {
                return Err(CoreError::Validation("No form is open".into()));
            }
            (_, Some(form)) => form,
        };
        form.validate()?;
        let record = T::from_form(form);
        let plan = match &self.mode {
            EditorMode::Editing(id) => SubmitPlan::Update(id.clone(), record),
            _ => SubmitPlan::Create(record),
        };
        self.submitting = true;
        Ok(plan)
    }

    /// Record the outcome of the in-flight submit. Success closes the editor;
    /// failure keeps the buffer so the user can retry.
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.submitting = false;
        if succeeded {
            self.close();
        }
    }

    /// First step of a delete. Nothing is removed until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: DocId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&DocId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Hand out the id to delete. Errors when nothing was requested.
    pub fn confirm_delete(&mut self) -> Result<DocId, CoreError> {
        self.pending_delete
            .take()
            .ok_or_else(|| CoreError::Validation("No delete awaiting confirmation".into()))
    }

    fn ensure_idle(&self) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::Conflict("A submit is already in progress".into()));
        }
        Ok(())
    }
}
