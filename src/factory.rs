//! Maps an index family plus configuration to a concrete handle.
//!
//! Dispatch is a single exhaustive match over [`IndexFamily`], so adding a
//! family without deciding its wrapping shape fails to compile. Three
//! shapes exist: the brute-force flat handle (no training), the two mix
//! handles (device-portable persisted form), and the uniform handle for
//! everything else. GPU-resident backends are parameterized by the
//! `gpu_id` configuration key, defaulting to device 0.

use crate::config::IndexParams;
use crate::family::IndexFamily;
use crate::format::FormatError;
use crate::index::{FlatIndex, MixIndex, PlainIndex, SegmentStore, VectorIndex};
use crate::segment::BinarySet;

/// Build a fresh handle for `family`.
///
/// Returns `None` for [`IndexFamily::Invalid`]: an unrecognized family is a
/// configuration error, not a transient failure, and callers must treat it
/// as such.
pub fn create(family: IndexFamily, params: &IndexParams) -> Option<VectorIndex> {
    let gpu_device = params.get_int_or("gpu_id", 0);
    match family {
        IndexFamily::Invalid => None,
        IndexFamily::Flat => Some(VectorIndex::Flat(FlatIndex::new(Box::new(
            SegmentStore::new(IndexFamily::Flat),
        )))),
        IndexFamily::IvfFlatCpu => Some(plain(SegmentStore::new(family), family)),
        IndexFamily::IvfFlatGpu => {
            Some(plain(SegmentStore::on_device(family, gpu_device), family))
        }
        // The flat mix backend is pinned to device 0; only the scalar-quantized
        // mix honors gpu_id.
        IndexFamily::IvfFlatMix => Some(VectorIndex::Mix(MixIndex::new(
            Box::new(SegmentStore::on_device(IndexFamily::IvfFlatGpu, 0)),
            IndexFamily::IvfFlatMix,
        ))),
        IndexFamily::IvfSq8Cpu => Some(plain(SegmentStore::new(family), family)),
        IndexFamily::IvfSq8Gpu => {
            Some(plain(SegmentStore::on_device(family, gpu_device), family))
        }
        IndexFamily::IvfSq8Mix => Some(VectorIndex::Mix(MixIndex::new(
            Box::new(SegmentStore::on_device(IndexFamily::IvfSq8Gpu, gpu_device)),
            IndexFamily::IvfSq8Mix,
        ))),
        IndexFamily::IvfPqCpu => Some(plain(SegmentStore::new(family), family)),
        IndexFamily::IvfPqGpu => {
            Some(plain(SegmentStore::on_device(family, gpu_device), family))
        }
        IndexFamily::KdTreeCpu => Some(plain(SegmentStore::new(family), family)),
        IndexFamily::NsgMix => Some(plain(SegmentStore::on_device(family, gpu_device), family)),
    }
}

fn plain(store: SegmentStore, family: IndexFamily) -> VectorIndex {
    VectorIndex::Plain(PlainIndex::new(Box::new(store), family))
}

/// Rebuild a handle of `family` from its persisted segments.
///
/// Used exclusively by the codec's read path.
pub fn reconstruct(family: IndexFamily, segments: BinarySet) -> Result<VectorIndex, FormatError> {
    let mut index = create(family, &IndexParams::new())
        .ok_or_else(|| FormatError::UnknownFamily(family.tag()))?;
    index.load(segments)?;
    Ok(index)
}
