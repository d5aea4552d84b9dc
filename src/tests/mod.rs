//! Integration tests for the annotation surface.
//!
//! These drive a full [`AnnotationSurface`] through loads, key presses and
//! pointer gestures with a recording host in place of a real one.

mod surface_tests;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::{
    AnnotationSurface, DrawMode, DrawingLayer, ImageFrame, LayerAction, LayerConfig, LayerFactory,
    LoadOutcome, PersistedSettings, PersistenceError, PixelPoint, PointerEvent, PointerEventKind,
    SeedData, StyledPolygon, SurfaceEvent, SurfaceOptions, free_draw_factory,
};
use crate::host::{HostBridge, PersistCallback};
use crate::model::{AnnotatedPolygon, DisplayPoint};

/// Everything the host received.
#[derive(Debug, Default)]
pub struct HostLog {
    pub persisted: Vec<PersistedSettings>,
    pub messages: Vec<(String, Value)>,
}

/// Host that records calls and optionally fails every persist.
pub struct RecordingHost {
    log: Rc<RefCell<HostLog>>,
    failure: Option<String>,
}

impl HostBridge for RecordingHost {
    fn persist(&self, settings: PersistedSettings, on_done: PersistCallback) {
        self.log.borrow_mut().persisted.push(settings);
        match &self.failure {
            Some(message) => on_done(Err(PersistenceError::new(message.clone()))),
            None => on_done(Ok(())),
        }
    }

    fn send_message(&self, kind: &str, payload: &Value) {
        self.log
            .borrow_mut()
            .messages
            .push((kind.to_string(), payload.clone()));
    }
}

/// A surface wired to a recording host and an event recorder.
pub struct Harness {
    pub surface: AnnotationSurface,
    pub host: Rc<RefCell<HostLog>>,
    pub events: Rc<RefCell<Vec<SurfaceEvent>>>,
}

impl Harness {
    pub fn new(seed: Option<SeedData>) -> Self {
        Self::build(options(), seed, free_draw_factory(), None)
    }

    pub fn failing(seed: Option<SeedData>) -> Self {
        Self::build(
            options(),
            seed,
            free_draw_factory(),
            Some("quota exceeded".to_string()),
        )
    }

    pub fn build(
        options: SurfaceOptions,
        seed: Option<SeedData>,
        factory: LayerFactory,
        failure: Option<String>,
    ) -> Self {
        let host = Rc::new(RefCell::new(HostLog::default()));
        let recording = RecordingHost {
            log: Rc::clone(&host),
            failure,
        };
        let mut surface = AnnotationSurface::new(options, seed, factory, Box::new(recording))
            .expect("valid options");

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        surface.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            surface,
            host,
            events,
        }
    }

    /// Load an 800x400 image (display 400x200).
    pub fn load(&mut self) {
        let ticket = self.surface.begin_load();
        let outcome = self
            .surface
            .finish_load(ticket, ImageFrame::new(800, 400).unwrap())
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
    }

    /// Press and release at the same screen position.
    pub fn click(&mut self, x: f64, y: f64) {
        self.surface.pointer(PointerEvent::down(x, y)).unwrap();
        self.surface.pointer(PointerEvent::up(x, y)).unwrap();
    }

    /// Draw a closed rectangular stroke through screen space.
    pub fn stroke_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
        self.surface.pointer(PointerEvent::down(x0, y0)).unwrap();
        for pair in corners.windows(2) {
            let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
            for step in 1..=4 {
                let t = f64::from(step) / 4.0;
                let event = PointerEvent::moved(ax + (bx - ax) * t, ay + (by - ay) * t);
                self.surface.pointer(event).unwrap();
            }
        }
        self.surface.pointer(PointerEvent::up(x0, y0)).unwrap();
    }

    pub fn changed_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Changed(_)))
            .count()
    }
}

pub fn options() -> SurfaceOptions {
    SurfaceOptions::default().with_display_width(400.0)
}

/// Axis-aligned square in pixel space.
pub fn pixel_square(x: f64, y: f64, size: f64) -> Vec<PixelPoint> {
    vec![
        PixelPoint::new(x, y),
        PixelPoint::new(x + size, y),
        PixelPoint::new(x + size, y + size),
        PixelPoint::new(x, y + size),
    ]
}

/// Layer that answers every pointer release with a fixed action.
pub struct ScriptedLayer {
    mode: DrawMode,
    action: Option<LayerAction>,
    scene: Vec<StyledPolygon>,
}

impl ScriptedLayer {
    pub fn factory(action: LayerAction) -> LayerFactory {
        Box::new(move |_config: &LayerConfig| {
            Box::new(ScriptedLayer {
                mode: DrawMode::default(),
                action: Some(action.clone()),
                scene: Vec::new(),
            }) as Box<dyn DrawingLayer>
        })
    }
}

impl DrawingLayer for ScriptedLayer {
    fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    fn mode(&self) -> DrawMode {
        self.mode
    }

    fn pointer(
        &mut self,
        kind: PointerEventKind,
        _position: DisplayPoint,
        _polygons: &[AnnotatedPolygon],
    ) -> Option<LayerAction> {
        match kind {
            PointerEventKind::Up => self.action.clone(),
            _ => None,
        }
    }

    fn render(&mut self, polygons: &[StyledPolygon]) {
        self.scene = polygons.to_vec();
    }

    fn scene(&self) -> &[StyledPolygon] {
        &self.scene
    }
}
