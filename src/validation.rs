//! Hardware-bound parameter clamping.
//!
//! GPU-resident clustered backends silently truncate or degrade when asked
//! to probe more clusters than the device supports, so the limit is
//! normalized here instead of letting the backend misbehave. The ceiling
//! depends on the compute toolkit the crate was built against.
//!
//! Like [`crate::tuning::fill`], this is a pure configuration-in,
//! configuration-out transform; run it after the auto-fill.

use crate::config::IndexParams;
use crate::family::IndexFamily;

/// Most clusters a GPU search may probe per query.
#[cfg(feature = "cuda-legacy")]
pub const GPU_MAX_NPROBE: i64 = 1024;
#[cfg(not(feature = "cuda-legacy"))]
pub const GPU_MAX_NPROBE: i64 = 2048;

/// Clamp configuration values to hardware bounds for `family`.
///
/// Only the GPU-resident clustered families are affected; everything else
/// passes through unchanged.
pub fn validate(family: IndexFamily, mut params: IndexParams) -> IndexParams {
    if family.is_gpu_clustered() {
        let nprobe = params.get_int_or("nprobe", 0);
        if nprobe != 0 && nprobe > GPU_MAX_NPROBE {
            tracing::warn!(
                "when searching with GPU, nprobe should be no more than {GPU_MAX_NPROBE}, \
                 but you passed {nprobe}; searching with {GPU_MAX_NPROBE} instead"
            );
            params.set("nprobe", GPU_MAX_NPROBE);
        }
    }
    params
}
