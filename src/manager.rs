use std::sync::Arc;

use egui::Pos2;
use log::{debug, info, warn};

use crate::command::{Command, CommandContext, CommandHistory};
use crate::config::EngineConfig;
use crate::coords::{CoordinateMapper, DomainPoint};
use crate::drawing::{Drawing, DrawingKind};
use crate::error::{RecordError, ToolError};
use crate::event::{AnnotationEvent, EventBus, HistoryEvent};
use crate::id_generator::{DrawingId, generate_id};
use crate::input::PointerEvent;
use crate::navigation::NavigationLock;
use crate::persistence::{DrawingRecord, ImportReport, PersistenceResult, decode_records, encode_records};
use crate::render::{OverlaySurface, RenderBridge, Scene};
use crate::state::{ManagerState, Phase};
use crate::tools::{ToolRegistry, ToolSettings};

/// Outcome of a tool selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelection {
    Activated(DrawingKind),
    /// The active tool was selected again and switched off
    Deactivated(DrawingKind),
    /// A gesture is in progress; nothing changed
    Ignored,
}

/// Owns the committed drawings and drives the pointer state machine.
///
/// All operations are meant to be called from the UI thread, one input event at a
/// time. Only the in-progress drawing is ever mutated in place; committed drawings
/// change through [`Command`]s so every change can be undone.
pub struct DrawingManager {
    config: EngineConfig,
    registry: ToolRegistry,
    state: ManagerState,
    drawings: Vec<Drawing>,
    bridge: Box<dyn RenderBridge>,
    events: Arc<EventBus>,
    navigation: NavigationLock,
    history: CommandHistory,
    hovered: Option<DrawingId>,
}

impl std::fmt::Debug for DrawingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingManager")
            .field("state", &self.state)
            .field("drawings", &self.drawings.len())
            .field("attached", &self.bridge.attached_count())
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

impl DrawingManager {
    /// Manager with the built-in tools registered.
    pub fn new(
        config: EngineConfig,
        bridge: Box<dyn RenderBridge>,
        events: Arc<EventBus>,
        navigation: NavigationLock,
    ) -> Self {
        let config = config.validated();
        let registry = ToolRegistry::with_defaults(&ToolSettings::from(&config));
        Self {
            config,
            registry,
            state: ManagerState::Idle,
            drawings: Vec::new(),
            bridge,
            events,
            navigation,
            history: CommandHistory::new(),
            hovered: None,
        }
    }

    /// Replace the tool registry. Only valid before the first gesture.
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_history(mut self, history: CommandHistory) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn active_tool(&self) -> Option<DrawingKind> {
        self.state.active_kind()
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn in_progress(&self) -> Option<&Drawing> {
        self.state.in_progress()
    }

    /// Committed drawings in z-order (last is topmost).
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn get(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    pub fn hovered(&self) -> Option<DrawingId> {
        self.hovered
    }

    pub fn bridge(&self) -> &dyn RenderBridge {
        self.bridge.as_ref()
    }

    pub fn navigation(&self) -> &NavigationLock {
        &self.navigation
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Tool selection ---

    /// Activate the tool for `kind`, or switch it off if it is already active.
    pub fn select_tool(&mut self, kind: DrawingKind) -> Result<ToolSelection, ToolError> {
        if self.state.is_drawing() {
            debug!("Ignoring selection of {} during a gesture", kind);
            return Ok(ToolSelection::Ignored);
        }
        if self.state.active_kind() == Some(kind) {
            self.deselect_tool();
            return Ok(ToolSelection::Deactivated(kind));
        }

        let tool = self.registry.get(kind)?.clone();
        self.deselect_tool();
        info!("Activated {} tool", tool.name());
        self.state = ManagerState::Armed { tool };
        self.events.emit(AnnotationEvent::ToolActivated { kind });
        Ok(ToolSelection::Activated(kind))
    }

    /// [`Self::select_tool`] by name, e.g. `"FibRetracement"`.
    pub fn select_tool_named(&mut self, tag: &str) -> Result<ToolSelection, ToolError> {
        let kind: DrawingKind = tag.parse()?;
        self.select_tool(kind)
    }

    /// Cancel any gesture and go back to `Idle`. Returns false if no tool was active.
    pub fn deselect_tool(&mut self) -> bool {
        self.cancel_drawing();
        match std::mem::take(&mut self.state) {
            ManagerState::Armed { tool } => {
                debug!("Deactivated {} tool", tool.name());
                self.events.emit(AnnotationEvent::ToolDeactivated { kind: tool.kind() });
                true
            }
            state => {
                self.state = state;
                false
            }
        }
    }

    // --- Gesture ---

    /// Start a gesture at `at`. No-op unless a tool is armed.
    pub fn begin_drawing(&mut self, at: DomainPoint) -> bool {
        let tool = match &self.state {
            ManagerState::Armed { tool } => tool.clone(),
            ManagerState::Idle => {
                debug!("Pointer down without an active tool");
                return false;
            }
            ManagerState::Drawing { .. } => {
                debug!("Pointer down during a gesture");
                return false;
            }
        };
        if !at.is_finite() {
            debug!("Ignoring gesture start at non-finite point {:?}", at);
            return false;
        }

        let navigation = self.navigation.acquire();
        let drawing = tool.create_drawing(at, self.config.style_for(tool.kind()));
        let kind = tool.kind();
        self.state = ManagerState::Drawing {
            tool,
            drawing,
            navigation,
        };
        self.events.emit(AnnotationEvent::GestureStarted { kind });
        self.bridge.request_repaint();
        true
    }

    /// Move the in-progress drawing. No-op outside a gesture.
    pub fn update_drawing(&mut self, at: DomainPoint) -> bool {
        let ManagerState::Drawing { tool, drawing, .. } = &mut self.state else {
            return false;
        };
        if !at.is_finite() {
            return false;
        }
        tool.update_drawing_data(drawing, at);
        self.bridge.request_repaint();
        true
    }

    /// Finish the gesture at `at`, store the drawing and return its new id.
    pub fn commit_drawing(&mut self, at: DomainPoint) -> Option<DrawingId> {
        self.finish_gesture(Some(at))
    }

    /// `None` keeps the trailing anchor where the last update left it.
    fn finish_gesture(&mut self, at: Option<DomainPoint>) -> Option<DrawingId> {
        let (tool, mut drawing, navigation) = match std::mem::take(&mut self.state) {
            ManagerState::Drawing {
                tool,
                drawing,
                navigation,
            } => (tool, drawing, navigation),
            state => {
                self.state = state;
                debug!("Commit without a gesture");
                return None;
            }
        };
        drop(navigation);
        self.state = ManagerState::Armed { tool: tool.clone() };

        match at.filter(DomainPoint::is_finite) {
            Some(at) => tool.finalize_drawing_data(&mut drawing, at),
            None => tool.refresh_derived(&mut drawing),
        }

        let id = generate_id();
        let kind = drawing.kind();
        drawing.assign_id(id);

        let mut ctx = CommandContext::new(&mut self.drawings, self.bridge.as_mut());
        if let Err(err) = self.history.execute(Command::AddDrawing(drawing), &mut ctx) {
            warn!("Failed to store {} drawing: {}", kind, err);
            return None;
        }

        info!("Committed {} drawing {}", kind, id);
        self.events.emit(AnnotationEvent::GestureFinished { id, kind });
        self.bridge.request_repaint();
        Some(id)
    }

    /// Discard the in-progress drawing. Returns false if there was none.
    pub fn cancel_drawing(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ManagerState::Drawing { tool, navigation, .. } => {
                drop(navigation);
                debug!("Cancelled {} gesture", tool.name());
                let kind = tool.kind();
                self.state = ManagerState::Armed { tool };
                self.events.emit(AnnotationEvent::GestureCancelled { kind });
                self.bridge.request_repaint();
                true
            }
            state => {
                self.state = state;
                false
            }
        }
    }

    /// Feed one pointer event. Returns true if it was consumed by a gesture.
    pub fn handle_pointer(&mut self, event: PointerEvent, mapper: &dyn CoordinateMapper) -> bool {
        match event {
            PointerEvent::Down(pos) => match mapper.screen_to_domain(pos) {
                Some(at) => self.begin_drawing(at),
                None => false,
            },
            PointerEvent::Move(pos) if self.is_drawing() => match mapper.screen_to_domain(pos) {
                Some(at) => self.update_drawing(at),
                None => true,
            },
            PointerEvent::Move(pos) => {
                self.update_hover(Some(pos), mapper);
                false
            }
            PointerEvent::Up(pos) if self.is_drawing() => {
                self.finish_gesture(mapper.screen_to_domain(pos)).is_some()
            }
            PointerEvent::Up(_) => false,
            PointerEvent::Leave if self.is_drawing() => self.cancel_drawing(),
            PointerEvent::Leave => {
                self.update_hover(None, mapper);
                false
            }
        }
    }

    fn update_hover(&mut self, pos: Option<Pos2>, mapper: &dyn CoordinateMapper) {
        let hovered = pos.and_then(|pos| self.hit_test(pos, mapper));
        if hovered != self.hovered {
            self.hovered = hovered;
            self.events.emit(AnnotationEvent::HoverChanged { id: hovered });
        }
    }

    /// Topmost committed drawing under `point`.
    pub fn hit_test(&self, point: Pos2, mapper: &dyn CoordinateMapper) -> Option<DrawingId> {
        let tolerance = self.config.hit_tolerance;
        self.drawings.iter().rev().find_map(|drawing| {
            let tool = self.registry.get(drawing.kind()).ok()?;
            if tool.hit_test(drawing, point, tolerance, mapper) {
                drawing.id()
            } else {
                None
            }
        })
    }

    // --- Collection ---

    /// Remove one drawing. Unknown ids are ignored.
    pub fn remove_drawing(&mut self, id: DrawingId) -> bool {
        let Some(index) = self.drawings.iter().position(|d| d.id() == Some(id)) else {
            debug!("No drawing {} to remove", id);
            return false;
        };
        let command = Command::RemoveDrawing {
            drawing: self.drawings[index].clone(),
            index,
        };
        let mut ctx = CommandContext::new(&mut self.drawings, self.bridge.as_mut());
        if let Err(err) = self.history.execute(command, &mut ctx) {
            warn!("Failed to remove drawing {}: {}", id, err);
            return false;
        }

        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.events.emit(AnnotationEvent::DrawingRemoved { id });
        self.bridge.request_repaint();
        true
    }

    /// Remove every drawing and return how many there were.
    pub fn clear_all(&mut self) -> usize {
        let count = self.drawings.len();
        if count == 0 {
            return 0;
        }
        let command = Command::ClearAll {
            drawings: self.drawings.clone(),
        };
        let mut ctx = CommandContext::new(&mut self.drawings, self.bridge.as_mut());
        if let Err(err) = self.history.execute(command, &mut ctx) {
            warn!("Failed to clear drawings: {}", err);
            return 0;
        }

        info!("Cleared {} drawings", count);
        self.hovered = None;
        self.events.emit(AnnotationEvent::CollectionCleared { count });
        self.bridge.request_repaint();
        count
    }

    pub fn undo(&mut self) -> bool {
        self.step_history(HistoryEvent::Undone)
    }

    pub fn redo(&mut self) -> bool {
        self.step_history(HistoryEvent::Redone)
    }

    fn step_history(&mut self, direction: HistoryEvent) -> bool {
        if self.is_drawing() {
            debug!("Ignoring {:?} during a gesture", direction);
            return false;
        }
        let mut ctx = CommandContext::new(&mut self.drawings, self.bridge.as_mut());
        let result = match direction {
            HistoryEvent::Undone => self.history.undo(&mut ctx),
            HistoryEvent::Redone => self.history.redo(&mut ctx),
        };
        if let Err(err) = result {
            debug!("{:?} not applied: {}", direction, err);
            return false;
        }

        self.hovered = None;
        self.events.emit(AnnotationEvent::HistoryChanged(direction));
        self.bridge.request_repaint();
        true
    }

    // --- Persistence ---

    /// Records for every committed drawing, in z-order.
    pub fn export_all(&self) -> Vec<DrawingRecord> {
        self.drawings
            .iter()
            .filter_map(|drawing| {
                let tool = self.registry.get(drawing.kind()).ok()?;
                Some(tool.serialize(drawing))
            })
            .collect()
    }

    pub fn export_json(&self) -> PersistenceResult<String> {
        encode_records(&self.export_all())
    }

    /// Import a JSON array of records. Bad records are skipped, not fatal.
    pub fn import_all(&mut self, json: &str) -> PersistenceResult<ImportReport> {
        let records = decode_records(json)?;
        Ok(self.import_records(records))
    }

    /// Import a saved session as the baseline: the restored drawings cannot be undone
    /// and any earlier history is dropped.
    pub fn restore_all(&mut self, json: &str) -> PersistenceResult<ImportReport> {
        let report = self.import_all(json)?;
        self.history.clear();
        Ok(report)
    }

    /// Append every valid record on top of the collection with a fresh id.
    pub fn import_records<I>(&mut self, records: I) -> ImportReport
    where
        I: IntoIterator<Item = Result<DrawingRecord, RecordError>>,
    {
        let mut report = ImportReport::default();
        let mut batch = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let drawing = record.and_then(|record| {
                let tool = self.registry.resolve(&record.kind)?;
                tool.deserialize(&record, &self.config.style_for(tool.kind()))
            });
            match drawing {
                Ok(mut drawing) => {
                    let id = generate_id();
                    drawing.assign_id(id);
                    report.imported.push(id);
                    batch.push(drawing);
                }
                Err(err) => {
                    warn!("Skipping record {}: {}", index, err);
                    report.skipped.push((index, err));
                }
            }
        }

        if !batch.is_empty() {
            let mut ctx = CommandContext::new(&mut self.drawings, self.bridge.as_mut());
            if let Err(err) = self.history.execute(Command::ImportBatch { drawings: batch }, &mut ctx) {
                warn!("Failed to store imported drawings: {}", err);
                report.imported.clear();
            }
            self.bridge.request_repaint();
        }

        info!(
            "Imported {} drawings, skipped {}",
            report.imported_count(),
            report.skipped_count()
        );
        self.events.emit(AnnotationEvent::ImportFinished {
            imported: report.imported_count(),
            skipped: report.skipped_count(),
        });
        report
    }

    // --- Rendering ---

    /// Paint every attached drawing, then the in-progress one.
    pub fn paint(&mut self, surface: &mut dyn OverlaySurface, mapper: &dyn CoordinateMapper) {
        let scene = Scene {
            drawings: &self.drawings,
            in_progress: self.state.in_progress(),
            registry: &self.registry,
            mapper,
        };
        self.bridge.paint(&scene, surface);
    }

    /// Start a host frame; true if a repaint was pending.
    pub fn begin_frame(&mut self) -> bool {
        self.bridge.begin_frame()
    }

    /// Tear down: end the gesture, switch the tool off, detach every render hook.
    pub fn destroy(&mut self) {
        self.deselect_tool();
        for id in self.drawings.iter().filter_map(Drawing::id) {
            self.bridge.detach(id);
        }
        self.drawings.clear();
        self.history.clear();
        self.hovered = None;
        debug!("Drawing manager destroyed");
    }
}
