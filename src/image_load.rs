//! Image load bookkeeping.
//!
//! A load is started with [`LoadTracker::begin`] and finished with the
//! returned ticket. Starting another load invalidates every older ticket,
//! so a slow decode for a replaced image can never overwrite the current one.

use std::io::Cursor;

use web_time::Instant;

use crate::error::Result;
use crate::model::ImageFrame;

/// Handle for one pending image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of completing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image is now current.
    Loaded,
    /// A newer load was started; this completion was dropped.
    Stale,
}

/// Issues tickets and decides whether a completion is still wanted.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    generation: u64,
    started: Option<Instant>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, invalidating all earlier tickets.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.started = Some(Instant::now());
        log::debug!("Image load {} started", self.generation);
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Whether `ticket` belongs to the most recent load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Log how long the current load took.
    pub fn log_finished(&self, frame: &ImageFrame) {
        if let Some(started) = self.started {
            log::info!(
                "Image {}x{} ready in {:.1}ms",
                frame.pixel_width(),
                frame.pixel_height(),
                started.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
}

/// Read the pixel dimensions of an encoded image without decoding the pixels.
pub fn decode_image_frame(bytes: &[u8]) -> Result<ImageFrame> {
    let start = Instant::now();
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    let format = reader.format();
    let (width, height) = reader.into_dimensions()?;
    log::debug!(
        "Probed {:?} image ({} bytes): {}x{} in {:.2}ms",
        format,
        bytes.len(),
        width,
        height,
        start.elapsed().as_secs_f64() * 1000.0
    );
    ImageFrame::new(width, height)
}
