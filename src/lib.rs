//! regiondraw - polygon region annotation over a single image
//!
//! An [`AnnotationSurface`] shows an image at a fixed display width and
//! lets the user draw free-hand regions on it. Regions are kept in a
//! y-up drawing space and reported back in image pixel coordinates, with
//! optional per-region colors taken from seed data.

mod canvas;
mod color_utils;
mod config;
mod constants;
mod coords;
mod drawing;
mod error;
mod host;
mod hull;
mod image_load;
mod input;
mod mode;
mod model;
mod palette;
mod seed;
mod store;
mod surface;
mod zoom_math;

#[cfg(test)]
mod tests;

pub use canvas::render_scene;
pub use color_utils::{Color, Hsl, categorical};
pub use config::{CONFIG_VERSION, LogLevel, SurfaceOptions};
pub use coords::CoordinateMapper;
pub use drawing::{
    DrawingLayer, FreeDrawLayer, LayerAction, LayerConfig, LayerFactory, StyledPolygon,
    free_draw_factory,
};
pub use error::{AnnotatorError, PersistenceError, Result};
pub use host::{DetachedHost, HostBridge, PersistCallback, PersistedSettings, SELECTION_MESSAGE};
pub use hull::{HullAlgorithm, concave_hull, convex_hull, polygon_area, simplify};
pub use image_load::{LoadOutcome, LoadTicket, decode_image_frame};
pub use input::{Key, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
pub use mode::{DrawMode, DrawModeController, KeyOutcome};
pub use model::{
    AnnotatedPolygon, AnnotationSet, DisplayFrame, DisplayPoint, DrawingPoint, ImageFrame,
    PixelPoint, contains_point,
};
pub use palette::{ColorPolicy, Palette, PolygonStyle};
pub use seed::SeedData;
pub use store::PolygonStore;
pub use surface::{AnnotationSurface, Listener, SurfaceEvent};
pub use zoom_math::ViewTransform;
