mod store;
mod worker;

use std::fmt;

use thiserror::Error;

// Re-export types from the layout library
pub use sticker_layout::{
    DragResolution, LayoutPlan, OrderSummary, PlacedSticker, PlacementId, RasterOutput,
    SheetOptions, SheetStatistics, SourceRef, StickerError, ValidationResult,
};
pub use worker::worker_task;

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum SheetCommand {
    /// Plan a layout and start an editing session
    Open {
        options: SheetOptions,
        aspect_ratio: f32,
        desired_count: Option<usize>,
    },
    AddSticker {
        session_id: SessionId,
        source: SourceRef,
    },
    RemoveSticker {
        session_id: SessionId,
        id: PlacementId,
    },
    RotateSticker {
        session_id: SessionId,
        id: PlacementId,
    },
    /// Live feedback while dragging; queued previews are coalesced
    PreviewDrag {
        session_id: SessionId,
        id: PlacementId,
        start: (f32, f32),
        delta: (f32, f32),
    },
    Relocate {
        session_id: SessionId,
        id: PlacementId,
        x: f32,
        y: f32,
    },
    AutoArrange {
        session_id: SessionId,
    },
    /// Remove every placement, cancelling any raster in flight
    Clear {
        session_id: SessionId,
    },
    CalculateStats {
        session_id: SessionId,
    },
    /// Full-resolution print raster
    Rasterize {
        session_id: SessionId,
    },
    /// Reduced proof that also shows unresolved placements
    RenderPreview {
        session_id: SessionId,
        max_edge_px: u32,
    },
    /// Abandon any raster in flight without touching the placements
    CancelRaster {
        session_id: SessionId,
    },
    Close {
        session_id: SessionId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum SheetUpdate {
    Opened {
        session_id: SessionId,
        plan: LayoutPlan,
        max_stickers: usize,
    },
    StickerAdded {
        session_id: SessionId,
        id: PlacementId,
    },
    /// Placements after any mutation
    SheetChanged {
        session_id: SessionId,
        placements: Vec<PlacedSticker>,
        validation: ValidationResult,
    },
    DragPreview {
        session_id: SessionId,
        id: PlacementId,
        resolution: DragResolution,
    },
    StatsCalculated {
        session_id: SessionId,
        stats: SheetStatistics,
    },
    Rasterized {
        session_id: SessionId,
        output: RasterOutput,
        summary: OrderSummary,
    },
    PreviewRendered {
        session_id: SessionId,
        output: RasterOutput,
    },
    RasterCancelled {
        session_id: SessionId,
    },
    Closed {
        session_id: SessionId,
    },
    Error {
        session_id: Option<SessionId>,
        message: String,
    },
}

/// Handle to an open editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Unknown {0}")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Sheet(#[from] StickerError),
}
