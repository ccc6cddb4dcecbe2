//! Async driver for the admin editor.
//!
//! Wraps the pure [`Editor`] state machine around a [`CollectionRepo`]:
//! validation happens before any store call, a submit in flight blocks a
//! second one, and a failed write leaves the form open for retry.

use std::sync::Arc;

use folio_core::content::ContentItem;
use folio_core::editor::{Editable, Editor, SubmitPlan};
use folio_core::error::CoreError;
use folio_core::types::DocId;

use crate::repositories::CollectionRepo;
use crate::store::DocumentStore;

/// How the admin list is refreshed after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshStrategy {
    /// A mounted [`LiveView`](crate::binder::LiveView) picks the change up.
    #[default]
    Live,
    /// Re-read the collection once after every successful write.
    Refetch,
}

pub struct AdminEditor<T: Editable> {
    editor: Editor<T>,
    repo: CollectionRepo<T>,
    refresh: RefreshStrategy,
    items: Vec<ContentItem<T>>,
}

impl<T: Editable> AdminEditor<T> {
    pub fn new(store: Arc<dyn DocumentStore>, refresh: RefreshStrategy) -> Self {
        Self {
            editor: Editor::new(),
            repo: CollectionRepo::new(store),
            refresh,
            items: Vec::new(),
        }
    }

    pub fn editor(&self) -> &Editor<T> {
        &self.editor
    }

    /// Form fields of the open editor.
    pub fn form_mut(&mut self) -> Option<&mut T::Form> {
        self.editor.buffer_mut()
    }

    pub fn open_create(&mut self) -> Result<(), CoreError> {
        self.editor.open_create()
    }

    pub fn open_edit(&mut self, item: &ContentItem<T>) -> Result<(), CoreError> {
        self.editor.open_edit(item)
    }

    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.editor.cancel()
    }

    /// Items from the last refetch. Always empty under
    /// [`RefreshStrategy::Live`].
    pub fn items(&self) -> &[ContentItem<T>] {
        &self.items
    }

    pub async fn refetch(&mut self) -> Result<(), CoreError> {
        self.items = self.repo.list().await?;
        Ok(())
    }

    /// Validate and write the open form. Returns the id written.
    pub async fn submit(&mut self) -> Result<DocId, CoreError> {
        let plan = self.editor.begin_submit()?;
        let result = match plan {
            SubmitPlan::Create(fields) => self.repo.create(&fields).await,
            SubmitPlan::Update(id, fields) => self.repo.update(&id, &fields).await,
        };
        match result {
            Ok(item) => {
                self.editor.finish_submit(true);
                self.after_write().await;
                Ok(item.id)
            }
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION.name(), error = %e, "Submit failed");
                self.editor.finish_submit(false);
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self, id: DocId) {
        self.editor.request_delete(id);
    }

    pub fn cancel_delete(&mut self) {
        self.editor.cancel_delete();
    }

    /// Perform the delete requested earlier. No undo.
    pub async fn confirm_delete(&mut self) -> Result<DocId, CoreError> {
        let id = self.editor.confirm_delete()?;
        self.repo.delete(&id).await?;
        self.after_write().await;
        Ok(id)
    }

    async fn after_write(&mut self) {
        if self.refresh == RefreshStrategy::Refetch {
            if let Err(e) = self.refetch().await {
                tracing::warn!(collection = T::COLLECTION.name(), error = %e, "Refetch after write failed");
            }
        }
    }
}
