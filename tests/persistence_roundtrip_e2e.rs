//! End-to-end persistence round-trip: factory → codec write → codec read →
//! re-serialize, asserting byte identity of the persisted form.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

use attune::{factory, read_index, tuning, validation, write_index};
use attune::{BinarySegment, BinarySet, IndexFamily, IndexParams};

fn random_payload(len: usize, rng: &mut StdRng) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

fn populated_index(family: IndexFamily, rng: &mut StdRng) -> attune::VectorIndex {
    let mut segments = BinarySet::new();
    segments.append(BinarySegment::new("raw_vectors", random_payload(4096, rng)));
    segments.append(BinarySegment::new("centroids", random_payload(512, rng)));
    segments.append(BinarySegment::new("codebook", random_payload(128, rng)));

    let mut index = factory::create(family, &IndexParams::new()).unwrap();
    index.load(segments).unwrap();
    index
}

#[test]
fn test_roundtrip_preserves_family_and_segments() {
    let dir = tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for family in IndexFamily::ALL {
        if family == IndexFamily::Invalid {
            continue;
        }
        let path = dir.path().join(format!("{family}.idx"));
        let index = populated_index(family, &mut rng);
        let original = index.serialize().unwrap();

        write_index(&index, &path).unwrap();
        let loaded = read_index(&path).unwrap().expect("index present");

        assert_eq!(loaded.family(), family);
        assert_eq!(loaded.serialize().unwrap(), original, "{family}");
    }
}

#[test]
fn test_reserialized_file_is_byte_identical() {
    let dir = tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let first = dir.path().join("first.idx");
    let second = dir.path().join("second.idx");

    let index = populated_index(IndexFamily::IvfSq8Mix, &mut rng);
    write_index(&index, &first).unwrap();

    let loaded = read_index(&first).unwrap().unwrap();
    write_index(&loaded, &second).unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_segment_order_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ordered.idx");

    let mut segments = BinarySet::new();
    for name in ["graph", "raw_vectors", "ids", "centroids"] {
        segments.append(BinarySegment::new(name, vec![0u8; 10]));
    }
    let mut index = factory::create(IndexFamily::NsgMix, &IndexParams::new()).unwrap();
    index.load(segments).unwrap();

    write_index(&index, &path).unwrap();
    let loaded = read_index(&path).unwrap().unwrap();

    let names: Vec<String> = loaded
        .serialize()
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, vec!["graph", "raw_vectors", "ids", "centroids"]);
}

#[test]
fn test_tuned_configuration_builds_working_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tuned.idx");

    let family = IndexFamily::IvfFlatGpu;
    let params = IndexParams::new().with("dim", 128).with("nprobe", 4096);
    let params = validation::validate(family, tuning::fill(family, 2_000_000, params));

    // The pipeline clamped nprobe and derived a sane cluster count.
    assert!(params.get_int_or("nprobe", 0) <= validation::GPU_MAX_NPROBE);
    assert_eq!(params.get_int_or("nlist", 0), 32768);

    let mut index = factory::create(family, &params).unwrap();
    let mut segments = BinarySet::new();
    segments.append(BinarySegment::new("centroids", vec![1u8; 64]));
    index.load(segments).unwrap();

    write_index(&index, &path).unwrap();
    assert_eq!(read_index(&path).unwrap().unwrap().family(), family);
}
