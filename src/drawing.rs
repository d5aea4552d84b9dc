//! Free-hand drawing layer.
//!
//! The layer turns pointer gestures into [`LayerAction`]s. It never mutates
//! the polygon store itself; the surface applies each action and then hands
//! the restyled scene back through [`DrawingLayer::render`].

use crate::constants::gesture::{CLICK_TOLERANCE, HANDLE_HIT_RADIUS};
use crate::constants::polygon::MIN_VERTICES;
use crate::config::SurfaceOptions;
use crate::coords::CoordinateMapper;
use crate::hull::{HullAlgorithm, polygon_area, simplify};
use crate::input::PointerEventKind;
use crate::mode::DrawMode;
use crate::model::{AnnotatedPolygon, DisplayPoint, DrawingPoint};
use crate::palette::PolygonStyle;

/// Everything a layer needs to know about the loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConfig {
    pub mapper: CoordinateMapper,
    pub hull_algorithm: HullAlgorithm,
    pub concavity: f64,
    pub smooth_factor: f64,
}

impl LayerConfig {
    pub fn new(mapper: CoordinateMapper, options: &SurfaceOptions) -> Self {
        Self {
            mapper,
            hull_algorithm: options.hull_algorithm,
            concavity: options.concavity,
            smooth_factor: options.smooth_factor,
        }
    }
}

/// A completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerAction {
    /// A new outline was drawn.
    Created(Vec<DrawingPoint>),
    /// The polygon at the index got new vertices.
    Edited(usize, Vec<DrawingPoint>),
    /// The polygon at the index was clicked in a delete mode.
    Destroyed(usize),
}

/// A polygon as it is currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPolygon {
    pub points: Vec<DrawingPoint>,
    pub style: PolygonStyle,
}

/// Interactive layer over the image.
pub trait DrawingLayer {
    /// Switch gesture set. Any gesture in progress is abandoned.
    fn set_mode(&mut self, mode: DrawMode);

    fn mode(&self) -> DrawMode;

    /// Feed a pointer event in display space. `polygons` is the current
    /// store content in index order.
    fn pointer(
        &mut self,
        kind: PointerEventKind,
        position: DisplayPoint,
        polygons: &[AnnotatedPolygon],
    ) -> Option<LayerAction>;

    /// Replace the drawn scene.
    fn render(&mut self, polygons: &[StyledPolygon]);

    /// The scene from the last [`render`](DrawingLayer::render) call.
    fn scene(&self) -> &[StyledPolygon];
}

/// Builds a layer for a freshly loaded image.
pub type LayerFactory = Box<dyn Fn(&LayerConfig) -> Box<dyn DrawingLayer>>;

/// Factory for the built-in [`FreeDrawLayer`].
pub fn free_draw_factory() -> LayerFactory {
    Box::new(|config: &LayerConfig| {
        Box::new(FreeDrawLayer::new(*config)) as Box<dyn DrawingLayer>
    })
}

/// Gesture in progress.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Pointer is down in a create and/or delete mode.
    Stroke {
        start: DisplayPoint,
        samples: Vec<DisplayPoint>,
        moved: bool,
    },
    /// Pointer went down on a vertex in edit mode.
    DraggingVertex {
        index: usize,
        vertex: usize,
        start: DisplayPoint,
        points: Vec<DrawingPoint>,
        moved: bool,
    },
}

/// Layer that creates polygons from free-hand strokes, deletes them on
/// click and moves their vertices in edit mode.
#[derive(Debug, Clone)]
pub struct FreeDrawLayer {
    config: LayerConfig,
    mode: DrawMode,
    gesture: Gesture,
    scene: Vec<StyledPolygon>,
}

impl FreeDrawLayer {
    pub fn new(config: LayerConfig) -> Self {
        Self {
            config,
            mode: DrawMode::default(),
            gesture: Gesture::Idle,
            scene: Vec::new(),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn press(&mut self, position: DisplayPoint, polygons: &[AnnotatedPolygon]) {
        self.gesture = if self.mode.allows_edit() {
            self.hit_vertex(position, polygons)
                .map_or(Gesture::Idle, |(index, vertex)| Gesture::DraggingVertex {
                    index,
                    vertex,
                    start: position,
                    points: polygons[index].points.clone(),
                    moved: false,
                })
        } else if self.mode.allows_create() || self.mode.allows_delete() {
            Gesture::Stroke {
                start: position,
                samples: vec![position],
                moved: false,
            }
        } else {
            Gesture::Idle
        };
    }

    fn drag(&mut self, position: DisplayPoint) {
        let mapper = self.config.mapper;
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Stroke {
                start,
                samples,
                moved,
            } => {
                samples.push(position);
                *moved |= start.distance_to(&position) > CLICK_TOLERANCE;
            }
            Gesture::DraggingVertex {
                vertex,
                start,
                points,
                moved,
                ..
            } => {
                *moved |= start.distance_to(&position) > CLICK_TOLERANCE;
                if *moved {
                    points[*vertex] = mapper.display_to_drawing(position);
                }
            }
        }
    }

    fn release(
        &mut self,
        position: DisplayPoint,
        polygons: &[AnnotatedPolygon],
    ) -> Option<LayerAction> {
        self.drag(position);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => None,
            Gesture::Stroke { moved: false, .. } if self.mode.allows_delete() => {
                let target = self.config.mapper.display_to_drawing(position);
                let hit = polygons.iter().rposition(|poly| poly.contains(&target));
                if let Some(index) = hit {
                    log::debug!("Delete click on polygon {}", index);
                }
                hit.map(LayerAction::Destroyed)
            }
            Gesture::Stroke {
                moved: true,
                samples,
                ..
            } if self.mode.allows_create() => self.outline(&samples).map(LayerAction::Created),
            Gesture::Stroke { .. } => None,
            Gesture::DraggingVertex {
                index,
                points,
                moved,
                ..
            } => moved.then(|| {
                log::debug!("Vertex drag finished on polygon {}", index);
                LayerAction::Edited(index, points)
            }),
        }
    }

    /// Topmost polygon with a vertex within the handle radius, and that vertex.
    fn hit_vertex(
        &self,
        position: DisplayPoint,
        polygons: &[AnnotatedPolygon],
    ) -> Option<(usize, usize)> {
        let target = self.config.mapper.display_to_drawing(position);
        let radius = self.config.mapper.display_distance_to_drawing(HANDLE_HIT_RADIUS);
        polygons
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, poly)| match poly.nearest_vertex(&target) {
                Some((vertex, distance)) if distance <= radius => Some((index, vertex)),
                _ => None,
            })
    }

    /// Turn stroke samples into a polygon outline, or `None` for a
    /// degenerate stroke.
    fn outline(&self, samples: &[DisplayPoint]) -> Option<Vec<DrawingPoint>> {
        let points: Vec<DrawingPoint> = samples
            .iter()
            .map(|p| self.config.mapper.display_to_drawing(*p))
            .collect();
        let hull = self
            .config
            .hull_algorithm
            .build(&points, self.config.concavity);
        let outline = simplify(&hull, self.config.smooth_factor);

        if outline.len() < MIN_VERTICES || polygon_area(&outline) <= f64::EPSILON {
            log::debug!(
                "Discarding degenerate stroke ({} samples, {} outline points)",
                samples.len(),
                outline.len()
            );
            return None;
        }
        log::debug!(
            "Stroke of {} samples became a {} hull with {} vertices",
            samples.len(),
            self.config.hull_algorithm.name(),
            outline.len()
        );
        Some(outline)
    }
}

impl DrawingLayer for FreeDrawLayer {
    fn set_mode(&mut self, mode: DrawMode) {
        if self.mode != mode && self.is_drawing() {
            log::debug!("Mode change abandoned gesture in progress");
        }
        self.mode = mode;
        self.gesture = Gesture::Idle;
    }

    fn mode(&self) -> DrawMode {
        self.mode
    }

    fn pointer(
        &mut self,
        kind: PointerEventKind,
        position: DisplayPoint,
        polygons: &[AnnotatedPolygon],
    ) -> Option<LayerAction> {
        if self.mode.is_view() {
            return None;
        }
        match kind {
            PointerEventKind::Down => {
                self.press(position, polygons);
                None
            }
            PointerEventKind::Move => {
                self.drag(position);
                None
            }
            PointerEventKind::Up => self.release(position, polygons),
        }
    }

    fn render(&mut self, polygons: &[StyledPolygon]) {
        self.scene = polygons.to_vec();
    }

    fn scene(&self) -> &[StyledPolygon] {
        &self.scene
    }
}
