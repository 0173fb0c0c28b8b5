//! Progress notes and the public feeds built from them.

use std::collections::HashMap;
use std::sync::Arc;

use backlog_core::error::CoreError;
use backlog_core::pagination::{Page, PageRequest};
use backlog_core::types::DbId;
use backlog_core::validation::validate_note_content;
use backlog_db::models::progress_note::{CreateProgressNote, ProgressNote, UpdateProgressNote};
use backlog_db::BacklogStore;

use crate::access::{ensure_owner, load_owned_project};
use crate::error::EngineResult;
use crate::media::MediaService;
use crate::views::NoteView;

pub struct NoteService {
    store: Arc<dyn BacklogStore>,
    media: Arc<MediaService>,
}

impl NoteService {
    pub fn new(store: Arc<dyn BacklogStore>, media: Arc<MediaService>) -> Self {
        Self { store, media }
    }

    /// Add a note to a project the caller owns.
    pub async fn create_note(
        &self,
        caller_id: DbId,
        input: &CreateProgressNote,
    ) -> EngineResult<NoteView> {
        validate_note_content(&input.content)?;
        let project = load_owned_project(self.store.as_ref(), input.project_id, caller_id).await?;

        let note = self.store.create_note(caller_id, input).await?;
        tracing::info!(note_id = note.id, project_id = project.id, caller_id, "Created progress note");
        Ok(NoteView::new(note, project.title, Vec::new()))
    }

    /// Owner view of a project's notes, newest first, with presigned image URLs.
    pub async fn list_project_notes(
        &self,
        project_id: DbId,
        caller_id: DbId,
        request: PageRequest,
    ) -> EngineResult<Page<NoteView>> {
        let project = load_owned_project(self.store.as_ref(), project_id, caller_id).await?;
        let (notes, total) = self
            .store
            .list_project_notes_page(project_id, false, request.limit(), request.offset())
            .await?;
        let titles = HashMap::from([(project.id, project.title)]);
        let items = self.into_views(notes, &titles, false).await?;
        Ok(Page::new(items, request, total))
    }

    /// Partial update by the note's author.
    pub async fn update_note(
        &self,
        note_id: DbId,
        caller_id: DbId,
        input: &UpdateProgressNote,
    ) -> EngineResult<NoteView> {
        if let Some(content) = &input.content {
            validate_note_content(content)?;
        }
        let not_found = || CoreError::NotFound {
            entity: "ProgressNote",
            id: note_id,
        };

        let note = self.store.find_note(note_id).await?.ok_or_else(not_found)?;
        ensure_owner("ProgressNote", note.id, note.author_id, caller_id)?;

        let note = self
            .store
            .update_note(note_id, input)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(note_id, caller_id, "Updated progress note");

        let title = self
            .store
            .find_project(note.project_id)
            .await?
            .map(|p| p.title)
            .unwrap_or_default();
        let titles = HashMap::from([(note.project_id, title)]);
        let mut views = self.into_views(vec![note], &titles, false).await?;
        Ok(views.remove(0))
    }

    /// Global feed of public notes with public image URLs.
    pub async fn list_public_notes(&self, request: PageRequest) -> EngineResult<Page<NoteView>> {
        let (notes, total) = self
            .store
            .list_public_notes(request.limit(), request.offset())
            .await?;

        let mut project_ids: Vec<DbId> = notes.iter().map(|n| n.project_id).collect();
        project_ids.sort_unstable();
        project_ids.dedup();
        let titles: HashMap<DbId, String> = self
            .store
            .list_projects_by_ids(&project_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.title))
            .collect();

        let items = self.into_views(notes, &titles, true).await?;
        Ok(Page::new(items, request, total))
    }

    /// Public notes of one project. `NotFound` unless the project is public.
    pub async fn list_public_project_notes(
        &self,
        project_id: DbId,
        request: PageRequest,
    ) -> EngineResult<Page<NoteView>> {
        let project = self
            .store
            .find_public_project(project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        let (notes, total) = self
            .store
            .list_project_notes_page(project_id, true, request.limit(), request.offset())
            .await?;
        let titles = HashMap::from([(project.id, project.title)]);
        let items = self.into_views(notes, &titles, true).await?;
        Ok(Page::new(items, request, total))
    }

    async fn into_views(
        &self,
        notes: Vec<ProgressNote>,
        titles: &HashMap<DbId, String>,
        public_context: bool,
    ) -> EngineResult<Vec<NoteView>> {
        let note_ids: Vec<DbId> = notes.iter().map(|n| n.id).collect();
        let mut images = if note_ids.is_empty() {
            HashMap::new()
        } else {
            self.media.assets_by_note(&note_ids, public_context).await?
        };

        Ok(notes
            .into_iter()
            .map(|note| {
                let title = titles.get(&note.project_id).cloned().unwrap_or_default();
                let note_images = images.remove(&note.id).unwrap_or_default();
                NoteView::new(note, title, note_images)
            })
            .collect())
    }
}
