//! The layout editor: one canvas with its store, view, tools, and settings.
//!
//! Host events enter through the `handle_*` methods in `input`; everything
//! else (store edits, calibration, measurement, view commands) is exposed
//! here. Every change marks the render loop dirty and `frame` rebuilds the
//! display list on demand.

use crate::board::{EquipmentStore, PropertyEdit};
use crate::calibration::Calibration;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Bounds, Point, Size};
use crate::input::coords::{CoordinateContext, CoordinateConverter};
use crate::input::{CanvasInput, DragOrchestrator, DragPreview, DropTarget};
use crate::measure::{MeasureKind, MeasureTool, Measurement, RealScale};
use crate::perf::{HitTestProfiler, PerfMonitor};
use crate::reference_image::ReferenceImage;
use crate::render::{Frame, RenderLoop, RenderStyle, Scene};
use crate::settings::EditorSettings;
use crate::settings_watcher::{SettingsEvent, SettingsWatcher};
use crate::snapshot::{ProjectSnapshot, SNAPSHOT_VERSION, new_project_id};
use crate::types::{EquipmentDefinition, InstanceId, PlacedEquipment};
use crate::units::LengthUnit;
use crate::viewport::ViewTransform;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Default surface when the host has not reported one yet
const DEFAULT_SURFACE: Size = Size::new(800.0, 600.0);

pub struct LayoutEditor {
    pub(crate) project_id: String,
    pub(crate) project_name: String,
    pub(crate) store: EquipmentStore,
    pub(crate) view: ViewTransform,
    pub(crate) calibration: Calibration,
    pub(crate) measure: MeasureTool,
    pub(crate) settings: EditorSettings,
    pub(crate) style: RenderStyle,
    pub(crate) orchestrator: DragOrchestrator,
    pub(crate) render: RenderLoop,
    pub(crate) hit_profiler: HitTestProfiler,
    pub(crate) canvas_input: CanvasInput,
    /// Canvas surface rectangle in window coordinates
    pub(crate) surface: Bounds,
    pub(crate) reference: Option<ReferenceImage>,
    settings_watcher: Option<SettingsWatcher>,
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl LayoutEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_orchestrator(settings, DragOrchestrator::default())
    }

    /// Build an editor that shares `orchestrator` with a sidebar.
    pub fn with_orchestrator(settings: EditorSettings, orchestrator: DragOrchestrator) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!("Invalid settings, using defaults: {:#}", e);
                EditorSettings::default()
            }
        };
        orchestrator.set_threshold(settings.drag_threshold);
        Self {
            project_id: new_project_id(),
            project_name: String::from("Untitled Layout"),
            store: EquipmentStore::new(settings.pixels_per_foot),
            view: ViewTransform::with_scale_bounds(settings.min_scale, settings.max_scale),
            calibration: Calibration::new(),
            measure: MeasureTool::new(),
            style: settings.render_style(),
            settings,
            orchestrator,
            render: RenderLoop::new(),
            hit_profiler: HitTestProfiler::new(),
            canvas_input: CanvasInput::default(),
            surface: Bounds::new(Point::ORIGIN, Point::new(DEFAULT_SURFACE.width, DEFAULT_SURFACE.height)),
            reference: None,
            settings_watcher: None,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Handle to the shared drag session, for the sidebar.
    pub fn orchestrator(&self) -> DragOrchestrator {
        self.orchestrator.clone()
    }

    /// Frame timing from the render loop.
    pub fn perf(&self) -> &PerfMonitor {
        self.render.perf()
    }

    /// Candidate pruning for hit tests driven by pointer presses.
    pub fn hit_profiler(&self) -> &HitTestProfiler {
        &self.hit_profiler
    }

    pub fn store(&self) -> &EquipmentStore {
        &self.store
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn measure_tool(&self) -> &MeasureTool {
        &self.measure
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn reference_image(&self) -> Option<&ReferenceImage> {
        self.reference.as_ref()
    }

    pub fn canvas_input(&self) -> CanvasInput {
        self.canvas_input
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    // ------------------------------------------------------------------------
    // Surface
    // ------------------------------------------------------------------------

    /// Report where the canvas surface sits in the window.
    pub fn set_surface(&mut self, origin: Point, size: Size) -> bool {
        if !origin.is_finite() || !size.is_finite() || size.width <= 0.0 || size.height <= 0.0 {
            warn!(?origin, ?size, "Rejected invalid surface rectangle");
            return false;
        }
        self.surface = Bounds::new(origin, Point::new(origin.x + size.width, origin.y + size.height));
        self.mark_dirty();
        true
    }

    pub fn surface_rect(&self) -> Bounds {
        self.surface
    }

    pub fn surface_size(&self) -> Size {
        self.surface.size()
    }

    pub(crate) fn coords(&self) -> CoordinateContext<'_> {
        CoordinateContext::new(&self.view, self.surface.min)
    }

    pub fn mark_dirty(&mut self) {
        self.render.mark_dirty();
    }

    // ------------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------------

    /// Place `definition` at a canvas position, bypassing the drag machinery.
    pub fn add_equipment(&mut self, definition: &EquipmentDefinition, at: Point) -> LayoutResult<InstanceId> {
        self.store.add(definition, at)
    }

    pub fn move_equipment(&mut self, id: &InstanceId, at: Point) -> LayoutResult<()> {
        self.store.move_to(id, at)
    }

    pub fn rotate_equipment(&mut self, id: &InstanceId, degrees: f64) -> LayoutResult<()> {
        self.store.rotate(id, degrees)
    }

    /// Rotate the selection by `delta` degrees.
    pub fn rotate_selected(&mut self, delta: f64) -> LayoutResult<()> {
        let id = self
            .store
            .selected()
            .cloned()
            .ok_or_else(|| LayoutError::UnknownEquipment(String::from("<no selection>")))?;
        self.store.rotate_by(&id, delta)
    }

    pub fn remove_equipment(&mut self, id: &InstanceId) -> LayoutResult<PlacedEquipment> {
        self.store.remove(id)
    }

    pub fn remove_selected(&mut self) -> Option<PlacedEquipment> {
        self.store.remove_selected()
    }

    pub fn select(&mut self, id: Option<&InstanceId>) -> LayoutResult<()> {
        self.store.select(id)
    }

    pub fn update_properties(&mut self, id: &InstanceId, edit: PropertyEdit) -> LayoutResult<()> {
        self.store.update_properties(id, edit)
    }

    pub fn bring_to_front(&mut self, id: &InstanceId) -> LayoutResult<()> {
        self.store.bring_to_front(id)
    }

    pub fn clear_layout(&mut self) {
        self.orchestrator.cancel();
        self.canvas_input.reset();
        self.store.clear();
    }

    // ------------------------------------------------------------------------
    // Calibration
    // ------------------------------------------------------------------------

    pub fn start_calibration(&mut self) {
        self.measure.deactivate();
        self.calibration.start();
        self.mark_dirty();
    }

    /// Enter the real length of the drawn line; returns pixels per unit.
    pub fn set_calibration_distance(&mut self, distance: f64, unit: LengthUnit) -> LayoutResult<f64> {
        let scale = self.calibration.set_real_distance(distance, unit)?;
        self.mark_dirty();
        Ok(scale)
    }

    pub fn edit_calibration(&mut self) -> LayoutResult<()> {
        self.calibration.edit()?;
        self.mark_dirty();
        Ok(())
    }

    pub fn save_calibration(&mut self) -> LayoutResult<()> {
        self.calibration.save()?;
        self.canvas_input.reset();
        self.mark_dirty();
        info!(scale = self.calibration.scale(), "Calibration saved");
        Ok(())
    }

    pub fn cancel_calibration(&mut self) {
        self.calibration.cancel();
        self.canvas_input.reset();
        self.mark_dirty();
    }

    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
        self.canvas_input.reset();
        self.mark_dirty();
    }

    // ------------------------------------------------------------------------
    // Measurement
    // ------------------------------------------------------------------------

    /// Scale used to turn canvas pixels into real units.
    pub fn real_scale(&self) -> RealScale {
        RealScale::resolve(&self.calibration, self.store.pixels_per_foot())
    }

    pub fn start_measure(&mut self, kind: MeasureKind) {
        self.measure.activate(kind);
        self.mark_dirty();
    }

    pub fn stop_measure(&mut self) {
        self.measure.deactivate();
        self.mark_dirty();
    }

    /// Finish a perimeter or area measurement.
    pub fn close_measurement(&mut self) -> LayoutResult<Measurement> {
        let measurement = self.measure.close(self.real_scale(), self.settings.measurement_unit)?;
        self.mark_dirty();
        Ok(measurement)
    }

    // ------------------------------------------------------------------------
    // Reference image
    // ------------------------------------------------------------------------

    /// Show `image` under the layout and zoom to its ground resolution.
    pub fn set_reference_image(&mut self, image: ReferenceImage) {
        self.view.set_offset(Point::ORIGIN);
        if !self.view.set_scale(image.initial_view_scale()) {
            warn!(meters_per_pixel = image.meters_per_pixel, "Reference image scale ignored");
        }
        debug!(scale = self.view.scale(), "Reference image loaded");
        self.reference = Some(image);
        self.mark_dirty();
    }

    /// Decode an image file and use it as the reference.
    pub fn load_reference_image(
        &mut self,
        path: impl AsRef<Path>,
        meters_per_pixel: f64,
        confidence: f64,
    ) -> anyhow::Result<()> {
        let image = ReferenceImage::open(path, meters_per_pixel, confidence)?;
        self.set_reference_image(image);
        Ok(())
    }

    pub fn clear_reference_image(&mut self) {
        if self.reference.take().is_some() {
            self.mark_dirty();
        }
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Replace the settings. Invalid settings are rejected as a whole.
    pub fn apply_settings(&mut self, settings: EditorSettings) -> anyhow::Result<()> {
        settings.validate()?;
        self.store.set_pixels_per_foot(settings.pixels_per_foot)?;
        self.view.set_scale_bounds(settings.min_scale, settings.max_scale);
        self.orchestrator.set_threshold(settings.drag_threshold);
        self.style = settings.render_style();
        self.settings = settings;
        self.mark_dirty();
        Ok(())
    }

    /// Start watching a settings file for hot reload.
    pub fn watch_settings(&mut self, path: impl Into<PathBuf>) -> anyhow::Result<()> {
        self.settings_watcher = Some(SettingsWatcher::new(path)?);
        Ok(())
    }

    /// Apply pending settings file changes. Returns true if settings changed.
    pub fn check_settings_reload(&mut self) -> bool {
        let Some(watcher) = self.settings_watcher.as_mut() else {
            return false;
        };
        let Some(event) = watcher.poll() else {
            return false;
        };
        let path = watcher.path().to_path_buf();
        match event {
            SettingsEvent::Modified | SettingsEvent::Created => {
                info!("Settings file changed, reloading...");
                let result = EditorSettings::load_from(&path).and_then(|s| self.apply_settings(s));
                match result {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Settings reload failed: {:#}", e);
                        false
                    }
                }
            }
            SettingsEvent::Deleted => {
                warn!("Settings file deleted");
                false
            }
            SettingsEvent::Error(e) => {
                error!("Settings watch error: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            version: SNAPSHOT_VERSION,
            id: self.project_id.clone(),
            name: self.project_name.clone(),
            equipment: self.store.items().to_vec(),
            selected: self.store.selected().cloned(),
            view: self.view,
            calibration: self.calibration.line().copied(),
        }
    }

    /// Replace the editor state with `snapshot`. Nothing changes on error.
    pub fn restore(&mut self, snapshot: ProjectSnapshot) -> LayoutResult<()> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LayoutError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        if !snapshot.view.is_valid() {
            return Err(LayoutError::NonFinite { field: "view" });
        }
        let calibration = match snapshot.calibration {
            Some(line) => Calibration::from_line(line)?,
            None => Calibration::new(),
        };
        self.store.restore(snapshot.equipment, snapshot.selected)?;

        let mut view = ViewTransform::with_scale_bounds(self.settings.min_scale, self.settings.max_scale);
        view.set_scale(snapshot.view.scale());
        view.set_offset(snapshot.view.offset());
        self.view = view;
        self.calibration = calibration;
        self.measure.deactivate();
        self.orchestrator.cancel();
        self.canvas_input.reset();
        self.project_id = snapshot.id;
        self.project_name = snapshot.name;
        self.mark_dirty();
        info!(items = self.store.len(), "Restored project");
        Ok(())
    }

    pub fn export_json(&self) -> LayoutResult<String> {
        self.snapshot().to_json()
    }

    pub fn import_json(&mut self, json: &str) -> LayoutResult<()> {
        self.restore(ProjectSnapshot::from_json(json)?)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Floating preview for the running drag, if it is past the threshold.
    pub fn drag_preview(&self) -> Option<DragPreview> {
        if !self.orchestrator.is_dragging() {
            return None;
        }
        let session = self.orchestrator.session()?;
        DragPreview::for_session(&session, &self.store, &self.coords())
    }

    /// Current display list. The flag is true when it was rebuilt.
    pub fn frame(&mut self) -> (&Frame, bool) {
        let store_dirty = self.store.take_dirty();
        let preview = self.drag_preview();
        let show_measure = self.measure.is_active() || self.measure.result().is_some();
        let scene = Scene {
            store: &self.store,
            view: &self.view,
            surface: self.surface.size(),
            calibration: &self.calibration,
            reference: self.reference.as_ref(),
            measure: show_measure.then_some(&self.measure),
            preview: preview.as_ref(),
            style: &self.style,
        };
        self.render.frame(&scene, store_dirty)
    }

    pub fn needs_redraw(&self) -> bool {
        self.render.is_dirty() || self.store.is_dirty()
    }

    fn snap(&self, at: Point) -> Point {
        if self.settings.snap_to_grid {
            at.snapped(self.settings.grid_size)
        } else {
            at
        }
    }
}

impl DropTarget for LayoutEditor {
    fn surface_rect(&self) -> Bounds {
        self.surface
    }

    fn window_to_canvas(&self, window_pos: Point) -> Point {
        CoordinateConverter::window_to_canvas(window_pos, &self.coords())
    }

    fn default_placement(&self) -> Point {
        self.view.screen_to_canvas(self.surface.size().center())
    }

    fn place(&mut self, definition: &EquipmentDefinition, at: Point) -> LayoutResult<InstanceId> {
        let at = self.snap(at);
        self.store.add(definition, at)
    }

    fn relocate(&mut self, id: &InstanceId, at: Point) -> LayoutResult<()> {
        let at = self.snap(at);
        self.store.move_to(id, at)
    }
}
