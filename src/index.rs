//! The backend seam and the index handles the factory hands out.
//!
//! Concrete index engines (the clustering, quantization, and graph kernels)
//! live outside this crate. What crosses the boundary is [`IndexBackend`]:
//! a backend knows its family tag and can dump or restore its complete
//! state as a [`BinarySet`]. How the bytes inside each segment are encoded
//! is the backend's business alone.
//!
//! Callers never hold a backend directly. The factory wraps it in a
//! [`VectorIndex`] handle whose shape records how the index may be used:
//!
//! - [`VectorIndex::Flat`]: brute-force scan, add/search only, no
//!   training phase.
//! - [`VectorIndex::Mix`]: trained and populated on one device, persisted
//!   in a form that can be reconstituted on another.
//! - [`VectorIndex::Plain`]: everything else, bound to its family tag.

use thiserror::Error;

use crate::family::IndexFamily;
use crate::segment::{BinarySegment, BinarySet};

/// Faults raised by an index backend while producing or consuming segments.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend failed to encode or decode its state.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An internal backend fault distinct from a serialization problem.
    #[error("backend fault: {0}")]
    Internal(String),
}

/// The persistence contract every concrete index backend fulfills.
pub trait IndexBackend: Send {
    /// The family this backend implements.
    fn backend_type(&self) -> IndexFamily;

    /// Dump the complete state as named segments. Payload buffers are
    /// shared with the backend, not copied.
    fn serialize(&self) -> Result<BinarySet, BackendError>;

    /// Restore state from a segment set produced by [`IndexBackend::serialize`].
    fn load(&mut self, segments: BinarySet) -> Result<(), BackendError>;
}

/// Device-agnostic staging backend.
///
/// Owns the segment payloads an upstream training pipeline produced for a
/// given family and shuttles them through serialize/load without copying.
/// GPU-resident families additionally record the device ordinal the
/// pipeline targeted.
pub struct SegmentStore {
    family: IndexFamily,
    device: Option<i64>,
    segments: BinarySet,
}

impl SegmentStore {
    pub fn new(family: IndexFamily) -> Self {
        Self {
            family,
            device: None,
            segments: BinarySet::new(),
        }
    }

    pub fn on_device(family: IndexFamily, device: i64) -> Self {
        Self {
            family,
            device: Some(device),
            segments: BinarySet::new(),
        }
    }

    /// Deposit a segment produced by the upstream pipeline.
    pub fn stage(&mut self, segment: BinarySegment) {
        self.segments.append(segment);
    }

    /// The GPU ordinal this backend targets, if any.
    pub fn device(&self) -> Option<i64> {
        self.device
    }
}

impl IndexBackend for SegmentStore {
    fn backend_type(&self) -> IndexFamily {
        self.family
    }

    fn serialize(&self) -> Result<BinarySet, BackendError> {
        // Segment payloads are Arc-shared; this clones headers only.
        Ok(self.segments.clone())
    }

    fn load(&mut self, segments: BinarySet) -> Result<(), BackendError> {
        self.segments = segments;
        Ok(())
    }
}

/// Brute-force handle: add and search only, nothing to train.
pub struct FlatIndex {
    backend: Box<dyn IndexBackend>,
}

impl FlatIndex {
    pub fn new(backend: Box<dyn IndexBackend>) -> Self {
        Self { backend }
    }
}

/// Handle for an index trained on one device whose persisted form is
/// device-independent.
pub struct MixIndex {
    backend: Box<dyn IndexBackend>,
    family: IndexFamily,
}

impl MixIndex {
    pub fn new(backend: Box<dyn IndexBackend>, family: IndexFamily) -> Self {
        Self { backend, family }
    }

    /// The CPU-resident family the persisted form can be reconstituted as.
    pub fn portable_family(&self) -> IndexFamily {
        self.family.to_cpu()
    }
}

/// Uniform handle binding a backend to its family tag.
pub struct PlainIndex {
    backend: Box<dyn IndexBackend>,
    family: IndexFamily,
}

impl PlainIndex {
    pub fn new(backend: Box<dyn IndexBackend>, family: IndexFamily) -> Self {
        Self { backend, family }
    }
}

/// An index handle: a concrete backend plus the usage shape the factory
/// chose for its family.
pub enum VectorIndex {
    Flat(FlatIndex),
    Mix(MixIndex),
    Plain(PlainIndex),
}

impl VectorIndex {
    /// The family tag persisted with this index.
    pub fn family(&self) -> IndexFamily {
        match self {
            VectorIndex::Flat(_) => IndexFamily::Flat,
            VectorIndex::Mix(index) => index.family,
            VectorIndex::Plain(index) => index.family,
        }
    }

    /// Whether this index has a training phase at all.
    pub fn supports_training(&self) -> bool {
        !matches!(self, VectorIndex::Flat(_))
    }

    /// Whether the persisted form may be reconstituted on a different
    /// device than the index was trained on.
    pub fn device_portable(&self) -> bool {
        matches!(self, VectorIndex::Mix(_))
    }

    pub fn serialize(&self) -> Result<BinarySet, BackendError> {
        match self {
            VectorIndex::Flat(index) => index.backend.serialize(),
            VectorIndex::Mix(index) => index.backend.serialize(),
            VectorIndex::Plain(index) => index.backend.serialize(),
        }
    }

    pub fn load(&mut self, segments: BinarySet) -> Result<(), BackendError> {
        match self {
            VectorIndex::Flat(index) => index.backend.load(segments),
            VectorIndex::Mix(index) => index.backend.load(segments),
            VectorIndex::Plain(index) => index.backend.load(segments),
        }
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("family", &self.family())
            .field("supports_training", &self.supports_training())
            .field("device_portable", &self.device_portable())
            .finish()
    }
}
