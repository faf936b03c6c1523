//! Error types.
//!
//! [`FusionError`] covers fatal configuration problems detected before or
//! during a fusion run. Per-pixel degenerate cases never surface here; they
//! resolve to holes. [`DatasetError`] covers the file adapters.
use crate::camera::CameraError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("no views supplied")]
    NoViews,
    #[error("view count mismatch: {depth} depth maps, {confidence} confidence maps, {cameras} cameras")]
    ViewCountMismatch {
        depth: usize,
        confidence: usize,
        cameras: usize,
    },
    #[error("maps have no pixels ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid of {pixels} pixels exceeds the 2^32 pixel limit")]
    GridTooLarge { pixels: usize },
    #[error("view {view}: {what} is {found:?}, expected {expected:?} (width, height)")]
    DimensionMismatch {
        view: usize,
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("reference view {reference} out of range ({views} views)")]
    ReferenceOutOfRange { reference: usize, views: usize },
    #[error("view set of reference {reference} names view {index}, only {views} views exist")]
    SupportingViewOutOfRange {
        reference: usize,
        index: usize,
        views: usize,
    },
    #[error("reference view {reference} has no supporting views")]
    EmptyViewSet { reference: usize },
    #[error("view {view}: {source}")]
    Camera {
        view: usize,
        #[source]
        source: CameraError,
    },
    #[error("{name} window size {size} must be odd and >= 1")]
    InvalidWindow { name: &'static str, size: usize },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("camera {path}: {source}")]
    Camera {
        path: PathBuf,
        #[source]
        source: CameraError,
    },
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset {root}: {message}")]
    Layout { root: PathBuf, message: String },
    #[error(transparent)]
    Fusion(#[from] FusionError),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
