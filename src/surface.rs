//! The annotation surface: one image, its polygons and the gestures over them.
//!
//! The surface owns every piece of per-image state and is the only place
//! where store mutations happen. Each mutation is followed by the same
//! sequence: restyle the layer, send the `selection` message, persist the
//! pixel coordinates and notify listeners with a fresh snapshot.

use tiny_skia::Pixmap;

use crate::canvas::render_scene;
use crate::config::SurfaceOptions;
use crate::constants::{gesture::CLICK_TOLERANCE, zoom::FACTOR};
use crate::coords::CoordinateMapper;
use crate::drawing::{DrawingLayer, LayerAction, LayerConfig, LayerFactory, StyledPolygon};
use crate::error::{AnnotatorError, Result};
use crate::host::{HostBridge, PersistedSettings, SELECTION_MESSAGE};
use crate::image_load::{LoadOutcome, LoadTicket, LoadTracker, decode_image_frame};
use crate::input::{KeyEvent, PointerEvent, PointerEventKind};
use crate::mode::{DrawMode, DrawModeController, KeyOutcome};
use crate::model::{AnnotationSet, ImageFrame};
use crate::palette::{ColorPolicy, Palette, PolygonStyle};
use crate::seed::SeedData;
use crate::store::PolygonStore;
use crate::zoom_math::ViewTransform;

/// Notification sent to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// An image finished loading and the layer is ready.
    Loaded,
    /// The polygons changed (or were committed); carries the new snapshot.
    Changed(AnnotationSet),
}

/// Subscriber callback.
pub type Listener = Box<dyn FnMut(&SurfaceEvent)>;

/// State that only exists while an image is loaded.
struct LoadedImage {
    mapper: CoordinateMapper,
    layer: Box<dyn DrawingLayer>,
    colors: ColorPolicy,
    view: ViewTransform,
    /// Last screen position of a view-mode drag.
    pan_anchor: Option<(f64, f64)>,
    press: Option<Press>,
}

/// Screen position of the pointer press in progress.
struct Press {
    x: f64,
    y: f64,
    dragged: bool,
}

impl Press {
    fn distance_to(&self, event: &PointerEvent) -> f64 {
        (event.x - self.x).hypot(event.y - self.y)
    }
}

impl LoadedImage {
    /// Follow the press through a gesture. True when `event` ends a click.
    fn track_press(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                self.press = Some(Press {
                    x: event.x,
                    y: event.y,
                    dragged: false,
                });
                false
            }
            PointerEventKind::Move => {
                if let Some(press) = &mut self.press {
                    press.dragged |= press.distance_to(event) > CLICK_TOLERANCE;
                }
                false
            }
            PointerEventKind::Up => self
                .press
                .take()
                .is_some_and(|press| !press.dragged && press.distance_to(event) <= CLICK_TOLERANCE),
        }
    }
}

/// Interactive polygon annotation over a single image.
pub struct AnnotationSurface {
    options: SurfaceOptions,
    seed: Option<SeedData>,
    factory: LayerFactory,
    host: Box<dyn HostBridge>,
    loads: LoadTracker,
    modes: DrawModeController,
    store: PolygonStore,
    image: Option<LoadedImage>,
    listeners: Vec<Listener>,
}

impl AnnotationSurface {
    /// Create an unloaded surface. Options are validated here.
    pub fn new(
        options: SurfaceOptions,
        seed: Option<SeedData>,
        factory: LayerFactory,
        host: Box<dyn HostBridge>,
    ) -> Result<Self> {
        options.validate()?;
        log::debug!(
            "Annotation surface created (hull: {}, display width: {}, seed polygons: {})",
            options.hull_algorithm.name(),
            options.display_width,
            seed.as_ref().map_or(0, |s| s.polygons().len())
        );

        Ok(Self {
            options,
            seed,
            factory,
            host,
            loads: LoadTracker::new(),
            modes: DrawModeController::new(),
            store: PolygonStore::new(),
            image: None,
            listeners: Vec::new(),
        })
    }

    /// Register a listener for [`SurfaceEvent`]s.
    pub fn subscribe(&mut self, listener: impl FnMut(&SurfaceEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Start loading a new image.
    ///
    /// The current layer, frames and polygons are dropped immediately and
    /// any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        if self.image.take().is_some() {
            log::info!("Discarding current image for a new load");
        }
        self.store.clear();
        self.loads.begin()
    }

    /// Complete a load with the image's pixel dimensions.
    ///
    /// On error nothing is installed and the surface stays unloaded.
    pub fn finish_load(&mut self, ticket: LoadTicket, frame: ImageFrame) -> Result<LoadOutcome> {
        if !self.loads.is_current(ticket) || self.image.is_some() {
            log::info!(
                "Ignoring stale image load (generation {})",
                ticket.generation()
            );
            return Ok(LoadOutcome::Stale);
        }

        let mapper = CoordinateMapper::fit_width(frame, self.options.display_width)?;

        let mut store = PolygonStore::new();
        if let Some(seed) = &self.seed {
            store.seed(seed.polygons(), seed.colors(), &mapper)?;
        }

        let mut layer = (self.factory)(&LayerConfig::new(mapper, &self.options));
        layer.set_mode(self.modes.mode());

        self.store = store;
        self.image = Some(LoadedImage {
            mapper,
            layer,
            colors: ColorPolicy::new(self.store.is_tracking_colors()),
            view: ViewTransform::identity(),
            pan_anchor: None,
            press: None,
        });
        self.restyle();
        self.loads.log_finished(&frame);

        self.emit(SurfaceEvent::Loaded);
        if self.seed.as_ref().is_some_and(|s| !s.is_empty()) {
            self.publish();
        }
        Ok(LoadOutcome::Loaded)
    }

    /// Complete a load from encoded image bytes.
    pub fn finish_load_bytes(&mut self, ticket: LoadTicket, bytes: &[u8]) -> Result<LoadOutcome> {
        if !self.loads.is_current(ticket) {
            log::info!(
                "Ignoring stale image bytes (generation {})",
                ticket.generation()
            );
            return Ok(LoadOutcome::Stale);
        }
        let frame = decode_image_frame(bytes).inspect_err(|e| {
            log::error!("Failed to load image: {}", e);
        })?;
        self.finish_load(ticket, frame)
    }

    /// Handle a key press. Returns true when the host should suppress the
    /// key's default action.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let outcome = self.modes.key_down(event);
        match outcome {
            KeyOutcome::ModeChanged(mode) => self.push_mode(mode),
            KeyOutcome::CyclePalette(direction) => {
                if let Some(image) = &mut self.image {
                    image.colors.cycle(direction);
                    self.restyle();
                }
            }
            KeyOutcome::Ignored => {}
        }
        outcome.prevent_default()
    }

    /// Handle a key release.
    pub fn key_up(&mut self, event: &KeyEvent) {
        if let KeyOutcome::ModeChanged(mode) = self.modes.key_up(event) {
            self.push_mode(mode);
        }
    }

    /// Handle a pointer event in screen coordinates relative to the canvas.
    ///
    /// A click that changes nothing still commits the current snapshot.
    ///
    /// Returns the error of a store update that a layer action could not
    /// apply; the store is left unchanged in that case.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<()> {
        let Some(image) = &mut self.image else {
            return Ok(());
        };
        let clicked = image.track_press(&event);

        if self.modes.mode().is_view() {
            match event.kind {
                PointerEventKind::Down => image.pan_anchor = Some((event.x, event.y)),
                PointerEventKind::Move => {
                    if let Some((ax, ay)) = image.pan_anchor {
                        image.view = image
                            .view
                            .pan_by(event.x - ax, event.y - ay)
                            .clamp_to(&image.mapper.display_frame());
                        image.pan_anchor = Some((event.x, event.y));
                    }
                }
                PointerEventKind::Up => image.pan_anchor = None,
            }
            if clicked {
                self.publish();
            }
            return Ok(());
        }

        let position = image.view.screen_to_display(event.x, event.y);
        let action = image
            .layer
            .pointer(event.kind, position, self.store.as_slice());
        match action {
            Some(action) => self.apply(action),
            None => {
                if clicked {
                    self.publish();
                }
                Ok(())
            }
        }
    }

    /// Zoom around the cursor. Negative `delta` (wheel up) zooms in.
    pub fn wheel(&mut self, delta: f64, cursor_x: f64, cursor_y: f64) {
        let Some(image) = &mut self.image else {
            return;
        };
        let zoom = if delta < 0.0 {
            image.view.zoom * FACTOR
        } else if delta > 0.0 {
            image.view.zoom / FACTOR
        } else {
            return;
        };
        image.view = image
            .view
            .zoom_to_cursor(zoom, cursor_x, cursor_y)
            .clamp_to(&image.mapper.display_frame());
        log::trace!("Zoom {:.2}", image.view.zoom);
    }

    /// Explicit commit: publish the current snapshot without a mutation.
    pub fn commit(&mut self) {
        if self.image.is_some() {
            self.publish();
        }
    }

    /// Current polygons in pixel space.
    pub fn snapshot(&self) -> Option<AnnotationSet> {
        let image = self.image.as_ref()?;
        Some(self.store.snapshot(&image.mapper))
    }

    pub fn mode(&self) -> Option<DrawMode> {
        self.image.as_ref().map(|_| self.modes.mode())
    }

    pub fn palette(&self) -> Option<Palette> {
        self.image.as_ref().map(|image| image.colors.active())
    }

    /// Per-polygon styles in store order.
    pub fn styles(&self) -> Option<Vec<PolygonStyle>> {
        self.image
            .as_ref()
            .map(|image| image.colors.styles(&self.store))
    }

    pub fn view(&self) -> Option<ViewTransform> {
        self.image.as_ref().map(|image| image.view)
    }

    pub fn mapper(&self) -> Option<&CoordinateMapper> {
        self.image.as_ref().map(|image| &image.mapper)
    }

    /// Raster preview of the current scene at display size.
    pub fn render_preview(&self) -> Option<Pixmap> {
        let image = self.image.as_ref()?;
        render_scene(image.layer.scene(), &image.mapper)
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    fn push_mode(&mut self, mode: DrawMode) {
        if let Some(image) = &mut self.image {
            image.layer.set_mode(mode);
            image.pan_anchor = None;
        }
    }

    fn apply(&mut self, action: LayerAction) -> Result<()> {
        let was_tracking = self.store.is_tracking_colors();
        let result = match action {
            LayerAction::Created(points) => self.store.insert(points).map(|index| {
                log::info!("Created polygon {}", index);
            }),
            LayerAction::Edited(index, points) => {
                self.store.replace_at(index, points).map(|()| {
                    log::info!("Edited polygon {}", index);
                })
            }
            LayerAction::Destroyed(index) => self.store.remove_at(index).map(|_| {
                log::info!("Deleted polygon {}", index);
            }),
        };

        if let Err(e) = result {
            let out_of_range = matches!(e, AnnotatorError::OutOfRange { .. });
            if out_of_range {
                log::error!("Layer referenced a missing polygon: {}", e);
            }
            debug_assert!(!out_of_range, "layer action out of range: {}", e);
            return Err(e);
        }

        let lost_colors = was_tracking && !self.store.is_tracking_colors();
        if let Some(image) = self.image.as_mut().filter(|_| lost_colors) {
            image.colors.downgrade();
        }
        self.restyle();
        self.publish();
        Ok(())
    }

    /// Push styled polygons to the layer.
    fn restyle(&mut self) {
        let Some(image) = &mut self.image else {
            return;
        };
        let scene: Vec<StyledPolygon> = self
            .store
            .iter()
            .zip(image.colors.styles(&self.store))
            .map(|(polygon, style)| StyledPolygon {
                points: polygon.points.clone(),
                style,
            })
            .collect();
        image.layer.render(&scene);
        self.store.clear_dirty();
    }

    /// Send the snapshot to the host and to listeners.
    fn publish(&mut self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };

        match serde_json::to_value(&snapshot) {
            Ok(payload) => self.host.send_message(SELECTION_MESSAGE, &payload),
            Err(e) => log::error!("Failed to serialize selection: {}", e),
        }

        let polygon_count = snapshot.len();
        self.host.persist(
            PersistedSettings::from(&snapshot),
            Box::new(move |result| match result {
                Ok(()) => log::debug!("Persisted {} polygons", polygon_count),
                Err(e) => log::warn!("Failed to persist annotations: {}", e),
            }),
        );

        self.emit(SurfaceEvent::Changed(snapshot));
    }

    fn emit(&mut self, event: SurfaceEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
