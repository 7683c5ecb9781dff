//! Attune – Vector index persistence, factory selection, and parameter auto-tuning
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Index Factory (factory)                     │
//! │     family + configuration → concrete handle (CPU/GPU/mix)  │
//! ├──────────────────────────┬──────────────────────────────────┤
//! │  Auto-Tuner (tuning)     │   Validator (validation)         │
//! │  scale-aware defaults    │   hardware-bound clamping        │
//! ├──────────────────────────┴──────────────────────────────────┤
//! │                 Binary Codec (format)                       │
//! │     [family tag] [name len][name][data len][data] ...       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A caller asks the factory for an index, finalizing its configuration
//! through the tune-then-validate pipeline:
//!
//! ```
//! use attune::{factory, tuning, validation, IndexFamily, IndexParams};
//!
//! let family = IndexFamily::IvfSq8Gpu;
//! let params = IndexParams::new().with("dim", 128);
//! let params = validation::validate(family, tuning::fill(family, 500_000, params));
//! let index = factory::create(family, &params).expect("known family");
//! assert_eq!(index.family(), family);
//! ```
//!
//! After training and populating the index elsewhere, the codec persists it
//! to a single file and later reconstructs it, re-invoking the factory to
//! rebuild the correct concrete type before loading the saved segments.

pub mod config;
pub mod factory;
pub mod family;
pub mod format;
pub mod index;
pub mod segment;
pub mod tuning;
pub mod validation;

pub use config::{IndexParams, ParamValue};
pub use family::IndexFamily;
pub use format::{read_index, write_index, FormatError};
pub use index::{BackendError, IndexBackend, SegmentStore, VectorIndex};
pub use segment::{BinarySegment, BinarySet};
