//! Interactive report editor.
//!
//! The editor owns only transient interaction state. The document itself
//! lives with the [`ReportHost`]; every mutation is delivered as a whole
//! replacement value through [`ReportHost::on_change`].
//!
//! Pointer gestures follow one lifecycle:
//!
//! ```text
//! pointer-down ──► GestureSession::start ──► attach move + up listeners
//!                                            capture pointer
//! pointer-move ──► mutate host value (move/resize) or ghost (palette)
//! pointer-up   ──► GestureSession::finish ──► detach both listeners
//! ```
//!
//! A session is consumed when it finishes, and the listener handles it holds
//! can only be detached by value, so each attach is matched by exactly one
//! detach on every exit path (up, cancel, superseding gesture).

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockKind, BlockPatch};
use crate::document::ReportBuilderValue;
use crate::event::PointerEvent;
use crate::geometry::{
    block_layout, canvas_size, clamp_geometry, clamp_move, clamp_resize, create_block,
    BlockLayout, CanvasFrame, CanvasSize, GeometryPatch, PageOrientation, Point,
};
use crate::roster::RosterColumn;
use crate::{ReportError, ReportResult};

/// The page that owns the report document.
pub trait ReportHost {
    /// Current document.
    fn value(&self) -> &ReportBuilderValue;

    /// Replace the document.
    fn on_change(&mut self, value: ReportBuilderValue);

    /// Toggle a table column in the export selection.
    fn on_toggle_column(&mut self, column: RosterColumn);
}

/// Kind of document-level listener a gesture installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerKind {
    /// Pointer-move listener.
    PointerMove,
    /// Pointer-up listener.
    PointerUp,
}

/// Token for an attached listener. Detaching consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a listener handle must be detached"]
pub struct ListenerHandle {
    id: u64,
    kind: ListenerKind,
}

impl ListenerHandle {
    /// Kind of listener this handle refers to.
    #[must_use]
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

/// Registry of document-level listeners.
#[derive(Debug, Default)]
pub struct DocumentListeners {
    next_id: u64,
    active: Vec<(u64, ListenerKind)>,
    attached: usize,
    detached: usize,
}

impl DocumentListeners {
    /// Attach a listener.
    pub fn attach(&mut self, kind: ListenerKind) -> ListenerHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.active.push((id, kind));
        self.attached += 1;
        ListenerHandle { id, kind }
    }

    /// Detach a listener.
    pub fn detach(&mut self, handle: ListenerHandle) {
        if let Some(pos) = self.active.iter().position(|(id, _)| *id == handle.id) {
            self.active.swap_remove(pos);
            self.detached += 1;
        }
    }

    /// Number of currently attached listeners.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.len()
    }

    /// Number of currently attached listeners of `kind`.
    #[must_use]
    pub fn active_of(&self, kind: ListenerKind) -> usize {
        self.active.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Total attaches since creation.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.attached
    }

    /// Total detaches since creation.
    #[must_use]
    pub fn detached(&self) -> usize {
        self.detached
    }
}

/// What an active gesture is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Dragging a palette item; `ghost` follows the pointer in client space.
    PaletteAdd {
        /// Kind of block to create on drop.
        kind: BlockKind,
        /// Ghost position in client coordinates.
        ghost: Point,
    },
    /// Dragging a block by its body.
    Move {
        /// Block being moved.
        id: BlockId,
        /// Pointer offset from the block origin at pointer-down.
        offset: Point,
    },
    /// Dragging a block's resize corner.
    Resize {
        /// Block being resized.
        id: BlockId,
        /// Pointer position at pointer-down, in client coordinates.
        start: Point,
        /// Width at pointer-down.
        start_width: f32,
        /// Height at pointer-down.
        start_height: f32,
    },
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Self::PaletteAdd { .. } => "palette-add",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
        }
    }

    fn targets(&self, block: &BlockId) -> bool {
        match self {
            Self::PaletteAdd { .. } => false,
            Self::Move { id, .. } | Self::Resize { id, .. } => id == block,
        }
    }
}

/// One pointer gesture from down to up, holding its captured pointer and
/// both document listeners.
#[derive(Debug)]
pub struct GestureSession {
    pointer_id: u32,
    gesture: Gesture,
    move_listener: ListenerHandle,
    up_listener: ListenerHandle,
}

impl GestureSession {
    fn start(pointer_id: u32, gesture: Gesture, listeners: &mut DocumentListeners) -> Self {
        tracing::debug!("Starting {} gesture for pointer {pointer_id}", gesture.name());
        Self {
            pointer_id,
            gesture,
            move_listener: listeners.attach(ListenerKind::PointerMove),
            up_listener: listeners.attach(ListenerKind::PointerUp),
        }
    }

    fn finish(self, listeners: &mut DocumentListeners) -> Gesture {
        listeners.detach(self.move_listener);
        listeners.detach(self.up_listener);
        tracing::debug!(
            "Finished {} gesture for pointer {}",
            self.gesture.name(),
            self.pointer_id
        );
        self.gesture
    }

    /// Captured pointer id.
    #[must_use]
    pub fn pointer_id(&self) -> u32 {
        self.pointer_id
    }

    /// The gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }
}

/// Result of feeding a pointer event to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// No active gesture for this pointer.
    Ignored,
    /// The palette ghost moved.
    GhostMoved(Point),
    /// A block's geometry changed.
    Updated(BlockId, BlockLayout),
    /// A palette drop created a block.
    Added(BlockId),
    /// The gesture ended without a further mutation.
    Ended,
}

/// Transient editor state around a host-owned report.
#[derive(Debug)]
pub struct ReportEditor {
    orientation: PageOrientation,
    frame: CanvasFrame,
    selected: Option<BlockId>,
    session: Option<GestureSession>,
    listeners: DocumentListeners,
}

impl Default for ReportEditor {
    fn default() -> Self {
        Self::new(PageOrientation::default())
    }
}

impl ReportEditor {
    /// Create an editor whose canvas sits at the client origin.
    #[must_use]
    pub fn new(orientation: PageOrientation) -> Self {
        Self {
            orientation,
            frame: CanvasFrame::at(0.0, 0.0, canvas_size(orientation)),
            selected: None,
            session: None,
            listeners: DocumentListeners::default(),
        }
    }

    /// Set the canvas's client-space frame.
    #[must_use]
    pub fn with_frame(mut self, frame: CanvasFrame) -> Self {
        self.frame = frame;
        self
    }

    /// Current orientation.
    #[must_use]
    pub fn orientation(&self) -> PageOrientation {
        self.orientation
    }

    /// Canvas size for the current orientation.
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        canvas_size(self.orientation)
    }

    /// Canvas frame in client space.
    #[must_use]
    pub fn frame(&self) -> CanvasFrame {
        self.frame
    }

    /// Update the canvas frame, e.g. after a scroll or relayout.
    pub fn set_frame(&mut self, frame: CanvasFrame) {
        self.frame = frame;
    }

    /// Selected block, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    /// Active gesture session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Pointer captured by the active gesture.
    #[must_use]
    pub fn captured_pointer(&self) -> Option<u32> {
        self.session.as_ref().map(GestureSession::pointer_id)
    }

    /// Document listener registry.
    #[must_use]
    pub fn listeners(&self) -> &DocumentListeners {
        &self.listeners
    }

    /// Switch orientation. The frame keeps its origin and border.
    pub fn set_orientation(&mut self, orientation: PageOrientation) {
        self.orientation = orientation;
        let border = self.frame.border_left;
        self.frame =
            CanvasFrame::at(self.frame.left, self.frame.top, self.canvas()).with_border(border);
        tracing::debug!("Orientation set to {orientation:?}");
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Select a block.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not in the host document.
    pub fn select(&mut self, host: &dyn ReportHost, id: &BlockId) -> ReportResult<()> {
        if host.value().block(id).is_none() {
            return Err(ReportError::BlockNotFound(id.to_string()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Click on empty canvas: clear the selection.
    pub fn click_canvas(&mut self) {
        self.selected = None;
    }

    // ---------------------------------------------------------------------
    // Document edits
    // ---------------------------------------------------------------------

    /// Append an auto-flow block (palette click).
    pub fn add_block(&mut self, host: &mut dyn ReportHost, kind: BlockKind) -> BlockId {
        let value = host.value();
        let block = create_block(kind, &value.blocks, None, self.canvas());
        let id = block.id.clone();
        let next = value.with_block_added(block);
        host.on_change(next);
        tracing::debug!("Added block {id}");
        id
    }

    /// Remove a block, clearing the selection and ending any gesture on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn remove_block(&mut self, host: &mut dyn ReportHost, id: &BlockId) -> ReportResult<()> {
        let next = host.value().with_block_removed(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.session.as_ref().is_some_and(|s| s.gesture.targets(id)) {
            self.end_gesture();
        }
        host.on_change(next);
        tracing::debug!("Removed block {id}");
        Ok(())
    }

    /// Replace the text of a text block.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is missing or not a text block.
    pub fn set_block_text(
        &mut self,
        host: &mut dyn ReportHost,
        id: &BlockId,
        text: impl Into<String>,
    ) -> ReportResult<()> {
        let block = host
            .value()
            .block(id)
            .ok_or_else(|| ReportError::BlockNotFound(id.to_string()))?;
        if block.kind != BlockKind::Text {
            return Err(ReportError::InvalidOperation(format!(
                "{id} is a {} block and has no text",
                block.kind.as_str()
            )));
        }
        let next = host.value().with_block_updated(id, &BlockPatch::text(text))?;
        host.on_change(next);
        Ok(())
    }

    /// Apply a position/size edit, clamped into the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn set_block_geometry(
        &mut self,
        host: &mut dyn ReportHost,
        id: &BlockId,
        patch: GeometryPatch,
    ) -> ReportResult<BlockLayout> {
        let layout = self.layout_of(host, id)?;
        let clamped = clamp_geometry(patch, layout, self.canvas());
        self.commit_layout(host, id, clamped)?;
        Ok(clamped)
    }

    /// Set the report title.
    pub fn set_title(&mut self, host: &mut dyn ReportHost, title: impl Into<String>) {
        let mut next = host.value().clone();
        next.title = title.into();
        host.on_change(next);
    }

    /// Set the report subtitle.
    pub fn set_subtitle(&mut self, host: &mut dyn ReportHost, subtitle: impl Into<String>) {
        let mut next = host.value().clone();
        next.subtitle = subtitle.into();
        host.on_change(next);
    }

    /// Toggle a table column through the host.
    pub fn toggle_column(&mut self, host: &mut dyn ReportHost, column: RosterColumn) {
        host.on_toggle_column(column);
    }

    // ---------------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------------

    /// Pointer-down on a palette item.
    ///
    /// Returns `false` when the event is not a primary-button press.
    pub fn begin_palette_drag(&mut self, kind: BlockKind, event: &PointerEvent) -> bool {
        if !event.is_primary() {
            return false;
        }
        self.begin(
            event.pointer_id,
            Gesture::PaletteAdd {
                kind,
                ghost: event.client(),
            },
        );
        true
    }

    /// Pointer-down on a block body. Selects the block.
    ///
    /// Returns `Ok(false)` when the event is not a primary-button press.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn begin_block_drag(
        &mut self,
        host: &dyn ReportHost,
        id: &BlockId,
        event: &PointerEvent,
    ) -> ReportResult<bool> {
        if !event.is_primary() {
            return Ok(false);
        }
        let layout = self.layout_of(host, id)?;
        let pointer = self.frame.to_canvas(event.client());
        self.selected = Some(id.clone());
        self.begin(
            event.pointer_id,
            Gesture::Move {
                id: id.clone(),
                offset: Point::new(pointer.x - layout.x, pointer.y - layout.y),
            },
        );
        Ok(true)
    }

    /// Pointer-down on a block's resize corner.
    ///
    /// Returns `Ok(false)` when the event is not a primary-button press.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not found.
    pub fn begin_resize(
        &mut self,
        host: &dyn ReportHost,
        id: &BlockId,
        event: &PointerEvent,
    ) -> ReportResult<bool> {
        if !event.is_primary() {
            return Ok(false);
        }
        let layout = self.layout_of(host, id)?;
        self.begin(
            event.pointer_id,
            Gesture::Resize {
                id: id.clone(),
                start: event.client(),
                start_width: layout.width,
                start_height: layout.height,
            },
        );
        Ok(true)
    }

    /// Document pointer-move.
    ///
    /// # Errors
    ///
    /// Returns an error if the block under gesture can no longer be updated.
    pub fn pointer_move(
        &mut self,
        host: &mut dyn ReportHost,
        event: &PointerEvent,
    ) -> ReportResult<GestureOutcome> {
        let Some(session) = self.session.as_mut() else {
            return Ok(GestureOutcome::Ignored);
        };
        if session.pointer_id != event.pointer_id {
            return Ok(GestureOutcome::Ignored);
        }
        let canvas = canvas_size(self.orientation);
        match &mut session.gesture {
            Gesture::PaletteAdd { ghost, .. } => {
                *ghost = event.client();
                Ok(GestureOutcome::GhostMoved(*ghost))
            }
            Gesture::Move { id, offset } => {
                let id = id.clone();
                let offset = *offset;
                let layout = self.layout_of(host, &id)?;
                let pointer = self.frame.to_canvas(event.client());
                let target = Point::new(pointer.x - offset.x, pointer.y - offset.y);
                let moved = clamp_move(layout, target, canvas);
                self.commit_layout(host, &id, moved)?;
                Ok(GestureOutcome::Updated(id, moved))
            }
            Gesture::Resize {
                id,
                start,
                start_width,
                start_height,
            } => {
                let id = id.clone();
                let delta = Point::new(event.client_x - start.x, event.client_y - start.y);
                let (start_width, start_height) = (*start_width, *start_height);
                let layout = self.layout_of(host, &id)?;
                let resized = clamp_resize(layout, start_width, start_height, delta, canvas);
                self.commit_layout(host, &id, resized)?;
                Ok(GestureOutcome::Updated(id, resized))
            }
        }
    }

    /// Document pointer-up: ends the gesture, dropping a palette item if the
    /// release point is inside the canvas frame.
    pub fn pointer_up(&mut self, host: &mut dyn ReportHost, event: &PointerEvent) -> GestureOutcome {
        if self.captured_pointer() != Some(event.pointer_id) {
            return GestureOutcome::Ignored;
        }
        match self.end_gesture() {
            Some(Gesture::PaletteAdd { kind, .. }) => {
                let client = event.client();
                if !self.frame.contains(client) {
                    tracing::debug!("Palette drop outside canvas, abandoning");
                    return GestureOutcome::Ended;
                }
                let at = self.frame.to_canvas(client);
                let value = host.value();
                let block = create_block(kind, &value.blocks, Some(at), self.canvas());
                let id = block.id.clone();
                let next = value.with_block_added(block);
                host.on_change(next);
                tracing::debug!("Dropped block {id} at ({}, {})", at.x, at.y);
                GestureOutcome::Added(id)
            }
            Some(_) => GestureOutcome::Ended,
            None => GestureOutcome::Ignored,
        }
    }

    /// Pointer-cancel or lost capture: ends the gesture without a drop.
    /// Live move and resize updates already applied are kept.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> GestureOutcome {
        if self.captured_pointer() != Some(event.pointer_id) {
            return GestureOutcome::Ignored;
        }
        match self.end_gesture() {
            Some(_) => GestureOutcome::Ended,
            None => GestureOutcome::Ignored,
        }
    }

    /// Dispatch any pointer event to the matching handler.
    ///
    /// Down events are not dispatched here; they need a target (palette
    /// item, block body or corner) and go through the `begin_*` methods.
    ///
    /// # Errors
    ///
    /// Returns an error if a move cannot be applied.
    pub fn handle_pointer(
        &mut self,
        host: &mut dyn ReportHost,
        event: &PointerEvent,
    ) -> ReportResult<GestureOutcome> {
        use crate::event::PointerPhase;
        match event.phase {
            PointerPhase::Down => Ok(GestureOutcome::Ignored),
            PointerPhase::Move => self.pointer_move(host, event),
            PointerPhase::Up => Ok(self.pointer_up(host, event)),
            PointerPhase::Cancel => Ok(self.pointer_cancel(event)),
        }
    }

    fn begin(&mut self, pointer_id: u32, gesture: Gesture) {
        self.end_gesture();
        self.session = Some(GestureSession::start(
            pointer_id,
            gesture,
            &mut self.listeners,
        ));
    }

    fn end_gesture(&mut self) -> Option<Gesture> {
        self.session
            .take()
            .map(|session| session.finish(&mut self.listeners))
    }

    fn layout_of(&self, host: &dyn ReportHost, id: &BlockId) -> ReportResult<BlockLayout> {
        let value = host.value();
        value
            .index_of(id)
            .and_then(|index| block_layout(&value.blocks, index))
            .ok_or_else(|| ReportError::BlockNotFound(id.to_string()))
    }

    fn commit_layout(
        &self,
        host: &mut dyn ReportHost,
        id: &BlockId,
        layout: BlockLayout,
    ) -> ReportResult<()> {
        let patch = BlockPatch {
            x: Some(layout.x),
            y: Some(layout.y),
            width: Some(layout.width),
            height: Some(layout.height),
            ..BlockPatch::default()
        };
        let next = host.value().with_block_updated(id, &patch)?;
        host.on_change(next);
        Ok(())
    }
}
