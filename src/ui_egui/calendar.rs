//! Week calendar view model.
//!
//! Owns the visible window, the cached masters and their expanded
//! occurrences, the live pointer gesture, the editor panel and the toast
//! queue. The host toolkit feeds it pointer and key events plus the grid's
//! on-screen placement, and paints what the render queries return.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use egui::{Key, Modifiers, Pos2, Rect};

use super::drag::DragContext;
use super::event_dialog::{DialogMode, EventDialogState};
use super::gesture::{CreateContext, Gesture, GestureOutcome, HitTarget, PendingCommit};
use super::resize::{HandleRects, ResizeContext};
use super::shortcuts::{shortcut_for, Shortcut};
use super::time_grid::{GridFrame, GridViewport, TimeGrid};
use super::toast::ToastManager;
use crate::models::event::{Event, EventDraft, EventPatch};
use crate::models::occurrence::{Occurrence, OccurrenceKey};
use crate::models::settings::CalendarSettings;
use crate::models::window::VisibleWindow;
use crate::services::event::recurrence::expand_occurrences;
use crate::services::event::{EventStore, StoreError};
use crate::utils::date::{local_date, minute_of_day, minutes_since};

/// Whose calendar is shown and whether the viewer may switch users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMount {
    pub user_id: i64,
    pub is_admin: bool,
}

/// Result of a store write started from the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Committed,
    /// Refused locally; the store was not called
    Rejected,
    /// The store call failed and the view was reloaded
    Failed,
}

/// A timed occurrence placed on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceBlock {
    /// Index into [`WeekCalendar::occurrences`]
    pub index: usize,
    pub day: usize,
    pub rect: Rect,
    pub key: OccurrenceKey,
    pub is_generated_instance: bool,
    /// Being moved or resized right now
    pub is_active: bool,
    /// Has a commit in flight
    pub is_pending: bool,
}

enum SaveRequest {
    Create(EventDraft),
    Update(i64, EventPatch),
}

pub struct WeekCalendar<S: EventStore> {
    store: S,
    mount: CalendarMount,
    settings: CalendarSettings,
    grid: TimeGrid,
    viewport: GridViewport,
    window: VisibleWindow,
    masters: Vec<Event>,
    occurrences: Vec<Occurrence>,
    gesture: Gesture,
    editor: Option<EventDialogState>,
    toasts: ToastManager,
    in_flight: HashSet<i64>,
    loading: bool,
}

impl<S: EventStore> WeekCalendar<S> {
    /// Build the calendar for the week containing `today`. Nothing is loaded
    /// until [`reload`](Self::reload) is awaited.
    pub fn new(store: S, mount: CalendarMount, settings: CalendarSettings, today: NaiveDate) -> Result<Self> {
        settings.validate()?;
        let tz = settings.tz()?;
        let window = VisibleWindow::week_of(today, settings.first_weekday(), tz);

        Ok(Self {
            store,
            mount,
            grid: TimeGrid::from_settings(&settings),
            viewport: GridViewport::default(),
            settings,
            window,
            masters: Vec::new(),
            occurrences: Vec::new(),
            gesture: Gesture::Idle,
            editor: None,
            toasts: ToastManager::new(),
            in_flight: HashSet::new(),
            loading: false,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mount(&self) -> CalendarMount {
        self.mount
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    pub fn timezone(&self) -> Tz {
        self.window.timezone()
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn viewport(&self) -> &GridViewport {
        &self.viewport
    }

    /// Called by the host whenever the grid is laid out or scrolled
    pub fn set_viewport(&mut self, viewport: GridViewport) {
        self.viewport = viewport;
    }

    pub fn masters(&self) -> &[Event] {
        &self.masters
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn editor(&self) -> Option<&EventDialogState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EventDialogState> {
        self.editor.as_mut()
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastManager {
        &mut self.toasts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a commit for this master is still unresolved
    pub fn is_pending(&self, event_id: i64) -> bool {
        self.in_flight.contains(&event_id)
    }

    fn frame(&self) -> GridFrame<'_> {
        GridFrame {
            grid: &self.grid,
            viewport: &self.viewport,
            window: &self.window,
        }
    }

    // ----- Loading and navigation -----

    /// Fetch masters for the visible window and re-expand. On failure the
    /// last good masters are re-expanded so optimistic previews are dropped.
    pub async fn reload(&mut self) -> bool {
        self.loading = true;
        let result = self
            .store
            .list(
                self.mount.user_id,
                self.window.start_utc(),
                self.window.end_utc(),
                true,
            )
            .await;
        self.loading = false;

        let loaded = match result {
            Ok(masters) => {
                log::debug!(
                    "Loaded {} events for user {} from {}",
                    masters.len(),
                    self.mount.user_id,
                    self.window.first_day()
                );
                self.masters = masters;
                true
            }
            Err(e) => {
                log::error!("Failed to load events: {}", e);
                self.toasts.error(format!("Failed to load events: {}", e));
                false
            }
        };

        self.rebuild();
        loaded
    }

    fn rebuild(&mut self) {
        self.occurrences = expand_occurrences(&self.masters, &self.window);
        if let Some((event_id, start, end)) = self.gesture.preview_times() {
            self.apply_preview(event_id, start, end);
        }
    }

    /// Show the week containing `date`
    pub async fn set_visible_week(&mut self, date: NaiveDate) -> bool {
        self.cancel_gesture();
        self.window = VisibleWindow::week_of(date, self.settings.first_weekday(), self.timezone());
        self.reload().await
    }

    pub async fn next_week(&mut self) -> bool {
        self.cancel_gesture();
        self.window = self.window.shifted_weeks(1);
        self.reload().await
    }

    pub async fn previous_week(&mut self) -> bool {
        self.cancel_gesture();
        self.window = self.window.shifted_weeks(-1);
        self.reload().await
    }

    pub async fn go_to_today(&mut self, today: NaiveDate) -> bool {
        self.set_visible_week(today).await
    }

    /// Show another user's calendar. Only admins may switch.
    pub async fn switch_user(&mut self, user_id: i64) -> bool {
        if !self.mount.is_admin {
            log::warn!("User switch to {} refused: not an admin", user_id);
            return false;
        }
        if user_id == self.mount.user_id {
            return true;
        }

        self.cancel_gesture();
        self.editor = None;
        self.mount.user_id = user_id;
        self.masters.clear();
        self.reload().await;
        true
    }

    // ----- Render queries -----

    fn block_for(&self, index: usize) -> Option<OccurrenceBlock> {
        let occurrence = self.occurrences.get(index)?;
        if occurrence.all_day {
            return None;
        }

        let tz = self.timezone();
        let date = local_date(occurrence.start, tz);
        let day = self.window.day_index(date)?;
        let (top, height) = self.grid.block_span(
            minutes_since(date, occurrence.start, tz),
            minutes_since(date, occurrence.end, tz),
            self.settings.min_block_height,
        );

        let is_master = !occurrence.is_generated_instance;
        Some(OccurrenceBlock {
            index,
            day,
            rect: self.viewport.block_rect(day, top, height),
            key: occurrence.key(),
            is_generated_instance: occurrence.is_generated_instance,
            is_active: is_master && self.gesture.event_id() == Some(occurrence.event_id),
            is_pending: is_master && self.in_flight.contains(&occurrence.event_id),
        })
    }

    /// Timed occurrences with their screen rectangles, in paint order
    pub fn blocks(&self) -> Vec<OccurrenceBlock> {
        (0..self.occurrences.len())
            .filter_map(|index| self.block_for(index))
            .collect()
    }

    /// All-day occurrences starting on column `day`
    pub fn all_day_occurrences(&self, day: usize) -> Vec<&Occurrence> {
        let Some(date) = self.window.day(day) else {
            return Vec::new();
        };
        let tz = self.timezone();
        self.occurrences
            .iter()
            .filter(|o| o.all_day && o.date(tz) == date)
            .collect()
    }

    /// Rectangle of the slot being drag-created
    pub fn create_preview(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Creating(ctx) => {
                let (top, height) = self.grid.block_span(ctx.start_minutes, ctx.end_minutes, 0.0);
                Some(self.viewport.block_rect(ctx.day, top, height))
            }
            _ => None,
        }
    }

    /// Column and screen y of the current-time line, when today is visible
    pub fn now_indicator(&self, now: DateTime<Utc>) -> Option<(usize, f32)> {
        let tz = self.timezone();
        let day = self.window.day_index(local_date(now, tz))?;
        let offset = self.grid.now_offset(minute_of_day(now, tz));
        Some((day, self.viewport.origin.y - self.viewport.scroll_offset + offset))
    }

    // ----- Pointer input -----

    /// What lies under `pos`: resize handles first, then block bodies (top
    /// painted first), then the empty slot. `None` outside the day columns.
    pub fn hit_test(&self, pos: Pos2) -> Option<HitTarget> {
        let day = self.viewport.day_at(pos.x)?;
        if pos.y < self.viewport.origin.y || self.viewport.column_y(pos.y) > self.grid.day_height() {
            return None;
        }

        let blocks: Vec<OccurrenceBlock> = self
            .blocks()
            .into_iter()
            .filter(|block| block.day == day)
            .collect();

        for block in blocks.iter().rev().filter(|b| !b.is_generated_instance) {
            if let Some(handle) = HandleRects::for_timed_event(block.rect).hit_test(pos) {
                return Some(HitTarget::Handle {
                    index: block.index,
                    handle,
                });
            }
        }

        if let Some(block) = blocks.iter().rev().find(|b| b.rect.contains(pos)) {
            return Some(HitTarget::Block { index: block.index });
        }

        Some(HitTarget::Empty { day })
    }

    /// Start a gesture. Ignored while another gesture is live or the editor
    /// is open. A press on a generated instance opens its read-only details.
    pub fn pointer_down(&mut self, pos: Pos2) -> GestureOutcome {
        if !self.gesture.is_idle() || self.editor.is_some() {
            return GestureOutcome::None;
        }
        let Some(target) = self.hit_test(pos) else {
            return GestureOutcome::None;
        };
        let threshold = self.settings.drag_threshold;

        match target {
            HitTarget::Empty { day } => {
                if let Some(ctx) = CreateContext::begin(&self.frame(), day, pos) {
                    log::debug!("Creating on day {} at minute {}", day, ctx.start_minutes);
                    self.gesture = Gesture::Creating(ctx);
                }
                GestureOutcome::None
            }
            HitTarget::Block { index } => {
                let Some(block) = self.block_for(index) else {
                    return GestureOutcome::None;
                };
                let occurrence = &self.occurrences[index];

                if occurrence.is_generated_instance {
                    let key = occurrence.key();
                    self.open_edit(key);
                    return GestureOutcome::OpenReadOnly(key);
                }
                if self.in_flight.contains(&occurrence.event_id) {
                    log::debug!("Event {} has a pending commit; ignoring press", occurrence.event_id);
                    return GestureOutcome::None;
                }

                if let Some(ctx) = DragContext::from_occurrence(occurrence, pos, block.rect.min.y, threshold) {
                    self.gesture = Gesture::Moving(ctx);
                }
                GestureOutcome::None
            }
            HitTarget::Handle { index, handle } => {
                let occurrence = &self.occurrences[index];
                if self.in_flight.contains(&occurrence.event_id) {
                    return GestureOutcome::None;
                }

                if let Some(ctx) = ResizeContext::new(occurrence, handle, pos, threshold, self.timezone()) {
                    self.gesture = Gesture::Resizing(ctx);
                }
                GestureOutcome::None
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let frame = GridFrame {
            grid: &self.grid,
            viewport: &self.viewport,
            window: &self.window,
        };
        if let Some((event_id, start, end)) = self.gesture.update(&frame, pos) {
            self.apply_preview(event_id, start, end);
        }
    }

    /// End the gesture. Clicks open the editor; completed drags return the
    /// commit to run (see [`commit`](Self::commit)) and lock the master
    /// until it resolves.
    pub fn pointer_up(&mut self, pos: Pos2) -> GestureOutcome {
        self.pointer_move(pos);

        let gesture = std::mem::take(&mut self.gesture);
        let outcome = gesture.finish(&self.frame());

        match &outcome {
            GestureOutcome::OpenCreate { start, end } => self.open_create(*start, *end),
            GestureOutcome::OpenEdit { event_id } => self.open_master(*event_id),
            GestureOutcome::Commit(pending) => {
                log::info!(
                    "Committing event {}: {} - {}",
                    pending.event_id,
                    pending.start,
                    pending.end
                );
                self.in_flight.insert(pending.event_id);
            }
            GestureOutcome::None | GestureOutcome::OpenReadOnly(_) => {}
        }

        outcome
    }

    /// `pointer_up` followed by the commit it produced, if any
    pub async fn release(&mut self, pos: Pos2) -> GestureOutcome {
        let outcome = self.pointer_up(pos);
        if let GestureOutcome::Commit(pending) = &outcome {
            self.commit(pending.clone()).await;
        }
        outcome
    }

    /// Drop the live gesture and restore the block's original times
    pub fn cancel_gesture(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        if let Some((event_id, start, end)) = gesture.original_times() {
            self.apply_preview(event_id, start, end);
        }
        !gesture.is_idle()
    }

    fn apply_preview(&mut self, event_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) {
        if let Some(occurrence) = self
            .occurrences
            .iter_mut()
            .find(|o| o.event_id == event_id && !o.is_generated_instance)
        {
            occurrence.start = start;
            occurrence.end = end;
        }
    }

    /// Persist a moved or resized master
    pub async fn commit(&mut self, pending: PendingCommit) -> CommitStatus {
        let result = self
            .store
            .update(pending.event_id, EventPatch::times(pending.start, pending.end))
            .await;
        self.in_flight.remove(&pending.event_id);

        match result {
            Ok(event) => {
                log::info!("Event {} updated", event.id);
                self.upsert_master(event);
                self.rebuild();
                self.toasts.success("Event updated");
                CommitStatus::Committed
            }
            Err(e) => {
                self.recover("update event", e).await;
                CommitStatus::Failed
            }
        }
    }

    fn upsert_master(&mut self, event: Event) {
        match self.masters.iter_mut().find(|m| m.id == event.id) {
            Some(existing) => *existing = event,
            None => self.masters.push(event),
        }
    }

    async fn recover(&mut self, action: &str, error: StoreError) {
        log::error!("Failed to {}: {}", action, error);
        self.toasts.error(format!("Failed to {}: {}", action, error));
        self.reload().await;
    }

    // ----- Editor -----

    /// Open a blank draft covering `[start, end)`
    pub fn open_create(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.editor = Some(EventDialogState::new_event(start, end, self.timezone()));
    }

    /// Open the editor for an occurrence. Generated instances open read-only.
    pub fn open_edit(&mut self, key: OccurrenceKey) -> bool {
        let tz = self.timezone();
        let Some(occurrence) = self.occurrences.iter().find(|o| o.key() == key) else {
            return false;
        };

        if occurrence.is_generated_instance {
            let master = self.masters.iter().find(|m| m.id == key.event_id);
            self.editor = Some(EventDialogState::read_only(occurrence, master, tz));
            return true;
        }

        self.open_master(key.event_id);
        self.editor.is_some()
    }

    fn open_master(&mut self, event_id: i64) {
        match self.masters.iter().find(|m| m.id == event_id) {
            Some(event) => {
                self.editor = Some(EventDialogState::from_event(event, self.timezone()));
            }
            None => log::warn!("Event {} is no longer loaded", event_id),
        }
    }

    /// Close the editor, discarding the draft
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validate and save the open draft
    pub async fn submit(&mut self) -> CommitStatus {
        let tz = self.timezone();
        let user_id = self.mount.user_id;
        let Some(editor) = self.editor.as_mut() else {
            return CommitStatus::Rejected;
        };
        if editor.submitting {
            return CommitStatus::Rejected;
        }

        let request = match &editor.mode {
            DialogMode::Create => editor.to_draft(user_id, tz).map(SaveRequest::Create),
            DialogMode::Edit { event_id } => {
                let event_id = *event_id;
                editor
                    .to_patch(tz)
                    .map(|patch| SaveRequest::Update(event_id, patch))
            }
            DialogMode::ReadOnly { .. } => return CommitStatus::Rejected,
        };

        let request = match request {
            Ok(request) => request,
            Err(message) => {
                editor.error_message = Some(message);
                return CommitStatus::Rejected;
            }
        };
        editor.error_message = None;
        editor.submitting = true;

        let result = match request {
            SaveRequest::Create(draft) => self.store.create(draft).await,
            SaveRequest::Update(event_id, patch) => self.store.update(event_id, patch).await,
        };

        match result {
            Ok(event) => {
                log::info!("Saved event {} '{}'", event.id, event.title);
                self.upsert_master(event);
                self.rebuild();
                self.editor = None;
                self.toasts.success("Event saved");
                CommitStatus::Committed
            }
            Err(e) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.submitting = false;
                    editor.error_message = Some(e.to_string());
                }
                self.recover("save event", e).await;
                CommitStatus::Failed
            }
        }
    }

    /// Delete a master and with it the whole series
    pub async fn remove(&mut self, event_id: i64) -> CommitStatus {
        if self.in_flight.contains(&event_id) {
            return CommitStatus::Rejected;
        }

        match self.store.delete(event_id).await {
            Ok(()) => {
                log::info!("Deleted event {}", event_id);
                self.masters.retain(|m| m.id != event_id);
                self.rebuild();
                if self.editor.as_ref().and_then(|e| e.event_id()) == Some(event_id) {
                    self.editor = None;
                }
                self.toasts.success("Event deleted");
                CommitStatus::Committed
            }
            Err(e) => {
                self.recover("delete event", e).await;
                CommitStatus::Failed
            }
        }
    }

    /// Delete the master open in the editor. Not available for read-only
    /// instance details.
    pub async fn delete_selected(&mut self) -> CommitStatus {
        match self.editor.as_ref().and_then(|e| e.event_id()) {
            Some(event_id) => self.remove(event_id).await,
            None => CommitStatus::Rejected,
        }
    }

    // ----- Keyboard -----

    /// Handle a key press; returns whether it was consumed
    pub async fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match shortcut_for(key, modifiers) {
            Some(Shortcut::Close) => {
                if self.cancel_gesture() {
                    true
                } else if self.editor.is_some() {
                    self.close_editor();
                    true
                } else {
                    false
                }
            }
            Some(Shortcut::Save) => {
                if self.editor.is_none() {
                    return false;
                }
                self.submit().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::RepeatKind;
    use crate::services::event::{MockEventStore, SqliteEventStore};
    use crate::ui_egui::event_dialog::TimeField;
    use crate::ui_egui::resize::ResizeHandle;
    use chrono::{Duration, NaiveTime, TimeZone};
    use pretty_assertions::assert_eq;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn master(id: i64, start: DateTime<Utc>, minutes: i64, kind: RepeatKind) -> Event {
        Event {
            id,
            user_id: 42,
            created_by: 1,
            title: "Checkup".to_string(),
            description: None,
            start,
            end: start + Duration::minutes(minutes),
            all_day: false,
            repeat_kind: kind,
            repeat_until: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn viewport() -> GridViewport {
        GridViewport {
            origin: Pos2::ZERO,
            column_width: 100.0,
            scroll_offset: 0.0,
            columns: 7,
        }
    }

    fn mock_listing(events: Vec<Event>) -> MockEventStore {
        let mut store = MockEventStore::new();
        store
            .expect_list()
            .returning(move |_, _, _, _| Ok(events.clone()));
        store
    }

    async fn load_calendar<S: EventStore>(store: S, is_admin: bool) -> WeekCalendar<S> {
        let mount = CalendarMount {
            user_id: 42,
            is_admin,
        };
        let mut calendar = WeekCalendar::new(store, mount, CalendarSettings::default(), monday()).unwrap();
        calendar.set_viewport(viewport());
        calendar.reload().await;
        calendar
    }

    #[tokio::test]
    async fn test_reload_expands_masters() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::Daily)]);
        let calendar = load_calendar(store, false).await;

        assert_eq!(calendar.occurrences().len(), 7);
        assert_eq!(calendar.blocks().len(), 7);
        assert!(!calendar.is_loading());
    }

    #[tokio::test]
    async fn test_hit_test_order() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 60, RepeatKind::None)]);
        let calendar = load_calendar(store, false).await;

        // Block spans y 720..800 in column 0
        assert!(matches!(
            calendar.hit_test(Pos2::new(50.0, 722.0)),
            Some(HitTarget::Handle { index: 0, .. })
        ));
        assert_eq!(calendar.hit_test(Pos2::new(50.0, 760.0)), Some(HitTarget::Block { index: 0 }));
        assert_eq!(calendar.hit_test(Pos2::new(150.0, 760.0)), Some(HitTarget::Empty { day: 1 }));
        assert_eq!(calendar.hit_test(Pos2::new(50.0, -10.0)), None);
        assert_eq!(calendar.hit_test(Pos2::new(900.0, 100.0)), None);
    }

    #[tokio::test]
    async fn test_late_short_block_is_reachable() {
        let store = mock_listing(vec![master(1, utc(10, 23, 50), 10, RepeatKind::None)]);
        let calendar = load_calendar(store, false).await;

        // Padded to 30px and kept inside the 1920px column
        let rect = calendar.blocks()[0].rect;
        assert_eq!((rect.min.y, rect.max.y), (1890.0, 1920.0));
        assert_eq!(
            calendar.hit_test(Pos2::new(50.0, 1918.0)),
            Some(HitTarget::Handle {
                index: 0,
                handle: ResizeHandle::Bottom
            })
        );
        assert_eq!(calendar.hit_test(Pos2::new(50.0, 1905.0)), Some(HitTarget::Block { index: 0 }));
    }

    #[tokio::test]
    async fn test_click_opens_editor_without_store_calls() {
        // No update/create/delete expectations: any such call panics
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 740.0));
        calendar.pointer_move(Pos2::new(52.0, 742.0));
        let outcome = calendar.release(Pos2::new(52.0, 742.0)).await;

        assert_eq!(outcome, GestureOutcome::OpenEdit { event_id: 1 });
        let editor = calendar.editor().unwrap();
        assert_eq!(editor.mode, DialogMode::Edit { event_id: 1 });
        assert_eq!(editor.title, "Checkup");
        assert_eq!(calendar.occurrences()[0].start, utc(10, 9, 0));
    }

    #[tokio::test]
    async fn test_drag_commits_once_and_caches_result() {
        let mut store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        store
            .expect_update()
            .withf(|id, patch| *id == 1 && *patch == EventPatch::times(utc(10, 9, 15), utc(10, 9, 45)))
            .times(1)
            .returning(|_, patch| {
                let mut event = master(1, utc(10, 9, 0), 30, RepeatKind::None);
                event.apply_patch(&patch);
                Ok(event)
            });
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 740.0));
        calendar.pointer_move(Pos2::new(50.0, 750.0));
        calendar.pointer_move(Pos2::new(50.0, 760.0));
        assert_eq!(calendar.occurrences()[0].start, utc(10, 9, 15));
        assert!(calendar.blocks()[0].is_active);

        let outcome = calendar.release(Pos2::new(50.0, 760.0)).await;

        assert!(matches!(outcome, GestureOutcome::Commit(_)));
        assert!(calendar.gesture().is_idle());
        assert!(!calendar.is_pending(1));
        assert_eq!(calendar.masters()[0].start, utc(10, 9, 15));
        assert_eq!(calendar.occurrences()[0].duration(), Duration::minutes(30));
        assert!(calendar.editor().is_none());
    }

    #[tokio::test]
    async fn test_failed_move_rolls_back() {
        let mut store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        store
            .expect_update()
            .times(1)
            .returning(|_, _| Err(StoreError::Network("connection reset".to_string())));
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 740.0));
        calendar.pointer_move(Pos2::new(250.0, 900.0));
        let outcome = calendar.pointer_up(Pos2::new(250.0, 900.0));
        let GestureOutcome::Commit(pending) = outcome else {
            panic!("expected a commit, got {:?}", outcome);
        };
        assert!(calendar.is_pending(1));

        assert_eq!(calendar.commit(pending).await, CommitStatus::Failed);

        assert_eq!(calendar.occurrences()[0].start, utc(10, 9, 0));
        assert!(!calendar.is_pending(1));
        let banner = calendar.toasts().latest_error().unwrap();
        assert!(banner.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_pending_master_ignores_presses() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 740.0));
        let outcome = calendar.pointer_up(Pos2::new(50.0, 800.0));
        assert!(matches!(outcome, GestureOutcome::Commit(_)));

        // Block moved to 09:45-10:15, y 780..820
        calendar.pointer_down(Pos2::new(50.0, 800.0));
        assert!(calendar.gesture().is_idle());
        assert!(calendar.blocks()[0].is_pending);
    }

    #[tokio::test]
    async fn test_generated_instance_opens_read_only() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::Daily)]);
        let mut calendar = load_calendar(store, false).await;

        let outcome = calendar.pointer_down(Pos2::new(150.0, 740.0));

        assert_eq!(
            outcome,
            GestureOutcome::OpenReadOnly(OccurrenceKey {
                event_id: 1,
                start: utc(11, 9, 0)
            })
        );
        assert!(calendar.gesture().is_idle());
        let editor = calendar.editor().unwrap();
        assert!(editor.is_read_only());
        assert_eq!(calendar.delete_selected().await, CommitStatus::Rejected);
        assert_eq!(calendar.submit().await, CommitStatus::Rejected);
    }

    #[tokio::test]
    async fn test_escape_cancels_drag() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 740.0));
        calendar.pointer_move(Pos2::new(50.0, 1000.0));
        assert_ne!(calendar.occurrences()[0].start, utc(10, 9, 0));

        assert!(calendar.handle_key(Key::Escape, Modifiers::NONE).await);

        assert!(calendar.gesture().is_idle());
        assert_eq!(calendar.occurrences()[0].start, utc(10, 9, 0));
        assert_eq!(calendar.pointer_up(Pos2::new(50.0, 1000.0)), GestureOutcome::None);
    }

    #[tokio::test]
    async fn test_resize_bottom_above_top_keeps_one_slot() {
        let store = mock_listing(vec![master(1, utc(10, 9, 0), 60, RepeatKind::None)]);
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(50.0, 798.0));
        calendar.pointer_move(Pos2::new(50.0, 300.0));

        let occurrence = &calendar.occurrences()[0];
        assert_eq!((occurrence.start, occurrence.end), (utc(10, 9, 0), utc(10, 9, 15)));
    }

    #[tokio::test]
    async fn test_drag_create_opens_prefilled_editor() {
        let store = mock_listing(Vec::new());
        let mut calendar = load_calendar(store, false).await;

        calendar.pointer_down(Pos2::new(150.0, 1840.0));
        calendar.pointer_move(Pos2::new(150.0, 3000.0));
        assert!(calendar.create_preview().is_some());

        let outcome = calendar.pointer_up(Pos2::new(150.0, 3000.0));

        assert_eq!(
            outcome,
            GestureOutcome::OpenCreate {
                start: utc(11, 23, 0),
                end: utc(12, 0, 0)
            }
        );
        let editor = calendar.editor().unwrap();
        assert_eq!(editor.mode, DialogMode::Create);
        assert_eq!(editor.end_time, NaiveTime::MIN);
        assert!(calendar.create_preview().is_none());
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_store() {
        let store = mock_listing(Vec::new());
        let mut calendar = load_calendar(store, false).await;

        calendar.open_create(utc(10, 9, 0), utc(10, 10, 0));
        assert_eq!(calendar.submit().await, CommitStatus::Rejected);
        assert_eq!(
            calendar.editor().unwrap().error_message.as_deref(),
            Some("Title is required")
        );
    }

    #[tokio::test]
    async fn test_submit_create_and_delete_with_sqlite() {
        let store = SqliteEventStore::in_memory(1).unwrap();
        let mut calendar = load_calendar(store, false).await;

        calendar.open_create(utc(12, 9, 0), utc(12, 9, 30));
        let editor = calendar.editor_mut().unwrap();
        editor.title = "Checkup".to_string();
        editor.step_hours(TimeField::End, 1);

        assert!(calendar.handle_key(Key::S, Modifiers::COMMAND).await);

        assert!(calendar.editor().is_none());
        assert_eq!(calendar.occurrences().len(), 1);
        assert_eq!(calendar.occurrences()[0].end, utc(12, 10, 30));
        let event_id = calendar.masters()[0].id;

        assert!(calendar.open_edit(calendar.occurrences()[0].key()));
        assert_eq!(calendar.delete_selected().await, CommitStatus::Committed);
        assert!(calendar.occurrences().is_empty());
        assert!(calendar.editor().is_none());
        assert_eq!(calendar.remove(event_id).await, CommitStatus::Failed);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_editor_open() {
        let mut store = mock_listing(vec![master(1, utc(10, 9, 0), 30, RepeatKind::None)]);
        store
            .expect_update()
            .returning(|id, _| Err(StoreError::NotFound(id)));
        let mut calendar = load_calendar(store, false).await;

        calendar.open_edit(calendar.occurrences()[0].key());
        calendar.editor_mut().unwrap().title = "Renamed".to_string();

        assert_eq!(calendar.submit().await, CommitStatus::Failed);
        let editor = calendar.editor().unwrap();
        assert!(!editor.submitting);
        assert!(editor.error_message.is_some());
        assert_eq!(calendar.masters()[0].title, "Checkup");
    }

    #[tokio::test]
    async fn test_switch_user_requires_admin() {
        let store = mock_listing(Vec::new());
        let mut calendar = load_calendar(store, false).await;
        assert!(!calendar.switch_user(7).await);
        assert_eq!(calendar.mount().user_id, 42);

        let mut store = MockEventStore::new();
        store.expect_list().returning(|user_id, _, _, _| {
            Ok(if user_id == 7 {
                vec![master(3, utc(10, 9, 0), 30, RepeatKind::None)]
            } else {
                Vec::new()
            })
        });
        let mut calendar = load_calendar(store, true).await;
        assert!(calendar.switch_user(7).await);
        assert_eq!(calendar.mount().user_id, 7);
        assert_eq!(calendar.occurrences().len(), 1);
    }

    #[tokio::test]
    async fn test_week_navigation_requests_new_window() {
        let mut store = MockEventStore::new();
        store
            .expect_list()
            .withf(|_, start, _, include_repeating| *start == utc(10, 0, 0) && *include_repeating)
            .times(2)
            .returning(|_, _, _, _| Ok(Vec::new()));
        store
            .expect_list()
            .withf(|_, start, end, _| *start == utc(17, 0, 0) && *end == utc(24, 0, 0))
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));
        let mut calendar = load_calendar(store, false).await;

        calendar.next_week().await;
        assert_eq!(calendar.window().first_day(), NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        calendar.previous_week().await;
        assert_eq!(calendar.window().first_day(), monday());
    }

    #[tokio::test]
    async fn test_now_indicator_only_for_visible_days() {
        let calendar = load_calendar(mock_listing(Vec::new()), false).await;

        assert_eq!(calendar.now_indicator(utc(12, 9, 30)), Some((2, 760.0)));
        assert_eq!(calendar.now_indicator(utc(20, 9, 30)), None);
    }

    #[tokio::test]
    async fn test_all_day_occurrences_stay_off_the_grid() {
        let mut event = master(1, utc(11, 0, 0), 24 * 60, RepeatKind::None);
        event.all_day = true;
        let calendar = load_calendar(mock_listing(vec![event]), false).await;

        assert!(calendar.blocks().is_empty());
        assert_eq!(calendar.all_day_occurrences(1).len(), 1);
        assert!(calendar.all_day_occurrences(0).is_empty());
    }
}
