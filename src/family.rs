//! Index family identifiers and device-affinity conversion.
//!
//! Every concrete index backend is identified by an [`IndexFamily`] value
//! that names both the algorithm (flat scan, inverted-file clustering with
//! optional quantization, kd-tree, graph) and the device the backend lives
//! on. The "mix" families denote an index trained and populated on the GPU
//! whose persisted form is device-independent.
//!
//! The i32 discriminant doubles as the on-disk tag written at the start of
//! every persisted index file (see [`crate::format`]), so variants must
//! never be renumbered.

use std::fmt;

use serde::Serialize;

/// Identifies a concrete index backend and its device affinity.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IndexFamily {
    /// Unrecognized or uninitialized. The factory refuses to build it.
    Invalid = 0,
    /// Brute-force flat scan. No training phase.
    Flat = 1,
    /// Inverted-file clustering, CPU resident.
    IvfFlatCpu = 2,
    /// Inverted-file clustering, GPU resident.
    IvfFlatGpu = 3,
    /// Inverted-file clustering trained on GPU, persisted device-independent.
    IvfFlatMix = 4,
    /// Scalar-quantized inverted file, CPU resident.
    IvfSq8Cpu = 5,
    /// Scalar-quantized inverted file, GPU resident.
    IvfSq8Gpu = 6,
    /// Scalar-quantized inverted file trained on GPU, persisted device-independent.
    IvfSq8Mix = 7,
    /// Product-quantized inverted file, CPU resident.
    IvfPqCpu = 8,
    /// Product-quantized inverted file, GPU resident.
    IvfPqGpu = 9,
    /// KD-tree with random neighborhood graph, CPU resident.
    KdTreeCpu = 10,
    /// NSG graph built with GPU assistance, persisted device-independent.
    NsgMix = 11,
}

impl IndexFamily {
    /// All families a persisted file may legally carry.
    pub const ALL: [IndexFamily; 12] = [
        IndexFamily::Invalid,
        IndexFamily::Flat,
        IndexFamily::IvfFlatCpu,
        IndexFamily::IvfFlatGpu,
        IndexFamily::IvfFlatMix,
        IndexFamily::IvfSq8Cpu,
        IndexFamily::IvfSq8Gpu,
        IndexFamily::IvfSq8Mix,
        IndexFamily::IvfPqCpu,
        IndexFamily::IvfPqGpu,
        IndexFamily::KdTreeCpu,
        IndexFamily::NsgMix,
    ];

    /// The fixed-width tag written to disk.
    #[inline]
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Resolve an on-disk tag back to a family.
    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.tag() == tag)
    }

    /// Map a GPU or mixed family to its CPU-resident equivalent.
    ///
    /// Families without a CPU counterpart (including the product-quantized
    /// pair) map to themselves.
    pub fn to_cpu(self) -> Self {
        match self {
            IndexFamily::IvfFlatGpu | IndexFamily::IvfFlatMix => IndexFamily::IvfFlatCpu,
            IndexFamily::IvfSq8Gpu | IndexFamily::IvfSq8Mix => IndexFamily::IvfSq8Cpu,
            other => other,
        }
    }

    /// Map a CPU or mixed family to its GPU-resident equivalent.
    ///
    /// Symmetric inverse of [`IndexFamily::to_cpu`] for the flat-cluster and
    /// scalar-quantized groups; identity for everything else.
    pub fn to_gpu(self) -> Self {
        match self {
            IndexFamily::IvfFlatMix | IndexFamily::IvfFlatCpu => IndexFamily::IvfFlatGpu,
            IndexFamily::IvfSq8Mix | IndexFamily::IvfSq8Cpu => IndexFamily::IvfSq8Gpu,
            other => other,
        }
    }

    /// True for the GPU-resident clustered families whose search parameters
    /// are bounded by device limits (see [`crate::validation`]).
    pub fn is_gpu_clustered(self) -> bool {
        matches!(
            self,
            IndexFamily::IvfFlatGpu | IndexFamily::IvfSq8Gpu | IndexFamily::IvfPqGpu
        )
    }
}

impl fmt::Display for IndexFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexFamily::Invalid => "invalid",
            IndexFamily::Flat => "flat",
            IndexFamily::IvfFlatCpu => "ivf_flat_cpu",
            IndexFamily::IvfFlatGpu => "ivf_flat_gpu",
            IndexFamily::IvfFlatMix => "ivf_flat_mix",
            IndexFamily::IvfSq8Cpu => "ivf_sq8_cpu",
            IndexFamily::IvfSq8Gpu => "ivf_sq8_gpu",
            IndexFamily::IvfSq8Mix => "ivf_sq8_mix",
            IndexFamily::IvfPqCpu => "ivf_pq_cpu",
            IndexFamily::IvfPqGpu => "ivf_pq_gpu",
            IndexFamily::KdTreeCpu => "kdtree_cpu",
            IndexFamily::NsgMix => "nsg_mix",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for family in IndexFamily::ALL {
            assert_eq!(IndexFamily::from_tag(family.tag()), Some(family));
        }
        assert_eq!(IndexFamily::from_tag(99), None);
        assert_eq!(IndexFamily::from_tag(-1), None);
    }

    #[test]
    fn test_to_cpu_mapping() {
        assert_eq!(IndexFamily::IvfFlatGpu.to_cpu(), IndexFamily::IvfFlatCpu);
        assert_eq!(IndexFamily::IvfFlatMix.to_cpu(), IndexFamily::IvfFlatCpu);
        assert_eq!(IndexFamily::IvfSq8Gpu.to_cpu(), IndexFamily::IvfSq8Cpu);
        assert_eq!(IndexFamily::IvfSq8Mix.to_cpu(), IndexFamily::IvfSq8Cpu);
        // PQ pair has no CPU/GPU conversion.
        assert_eq!(IndexFamily::IvfPqGpu.to_cpu(), IndexFamily::IvfPqGpu);
        assert_eq!(IndexFamily::Flat.to_cpu(), IndexFamily::Flat);
    }

    #[test]
    fn test_to_gpu_mapping() {
        assert_eq!(IndexFamily::IvfFlatCpu.to_gpu(), IndexFamily::IvfFlatGpu);
        assert_eq!(IndexFamily::IvfFlatMix.to_gpu(), IndexFamily::IvfFlatGpu);
        assert_eq!(IndexFamily::IvfSq8Cpu.to_gpu(), IndexFamily::IvfSq8Gpu);
        assert_eq!(IndexFamily::IvfSq8Mix.to_gpu(), IndexFamily::IvfSq8Gpu);
        assert_eq!(IndexFamily::KdTreeCpu.to_gpu(), IndexFamily::KdTreeCpu);
        assert_eq!(IndexFamily::NsgMix.to_gpu(), IndexFamily::NsgMix);
    }

    #[test]
    fn test_device_mapping_involution() {
        for family in IndexFamily::ALL {
            assert_eq!(family.to_gpu().to_cpu(), family.to_cpu());
            assert_eq!(family.to_cpu().to_gpu(), family.to_gpu());
        }
    }
}
