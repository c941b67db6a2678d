//! # Packed Roundtrip Test
//!
//! Randomly generated databases covering every attribute type are saved in
//! both byte orders and loaded back:
//! - the loaded tree equals the authored one exactly
//! - swapped and native files differ but load identically
//! - truncated files fail to load and register nothing

use ltsdk_database::{
    AttributeType, AttributeUsage, CreatorDatabase, DatabaseError, DatabaseMgr, DatabaseMgrConfig, Endian, RecordLink,
};
use ltsdk_math::{Vector2, Vector3, Vector4};
use ltsdk_platform::{MemoryInStream, MemoryOutStream};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &["", "rifle", "Grenade Launcher", "überschall", "雷", "a\tb", "snd/fx/boom.wav"];

fn word(rng: &mut StdRng) -> String {
    WORDS[rng.gen_range(0..WORDS.len())].to_string()
}

fn float(rng: &mut StdRng) -> f32 {
    rng.gen_range(-1.0e4f32..1.0e4)
}

fn fill(creator: &mut CreatorDatabase, rng: &mut StdRng) {
    for c in 0..rng.gen_range(1..5) {
        let category = creator.create_category(&format!("Category{c}")).unwrap();
        for r in 0..rng.gen_range(0..6) {
            let record = creator.create_record(category, &format!("Record{r}")).unwrap();
            for (a, &ty) in AttributeType::ALL.iter().enumerate() {
                if rng.gen_bool(0.3) {
                    continue;
                }
                let count = rng.gen_range(1..4);
                let usage = [
                    AttributeUsage::Default,
                    AttributeUsage::Filename,
                    AttributeUsage::Animation,
                    AttributeUsage::ClientFx,
                ][rng.gen_range(0..4)];
                let attribute = creator
                    .create_attribute(record, &format!("Attr{a}"), ty, usage, count)
                    .unwrap();
                if ty == AttributeType::Struct {
                    for i in 0..count {
                        let member = creator
                            .create_struct_member(attribute, i, "Amount", AttributeType::Int32, usage, 1)
                            .unwrap();
                        assert!(creator.set_int32(member, 0, rng.gen()));
                    }
                    continue;
                }
                for i in 0..count {
                    let stored = match ty {
                        AttributeType::Bool => creator.set_bool(attribute, i, rng.gen()),
                        AttributeType::Float => creator.set_float(attribute, i, float(rng)),
                        AttributeType::Int32 => creator.set_int32(attribute, i, rng.gen()),
                        AttributeType::String => creator.set_string(attribute, i, &word(rng)),
                        AttributeType::WString => creator.set_wstring(attribute, i, &word(rng)),
                        AttributeType::Vector2 => creator.set_vector2(attribute, i, Vector2::new(float(rng), float(rng))),
                        AttributeType::Vector3 => {
                            creator.set_vector3(attribute, i, Vector3::new(float(rng), float(rng), float(rng)))
                        }
                        AttributeType::Vector4 => creator.set_vector4(
                            attribute,
                            i,
                            Vector4::new(float(rng), float(rng), float(rng), float(rng)),
                        ),
                        AttributeType::RecordLink => {
                            let link = match rng.gen_range(0..3) {
                                0 => RecordLink::default(),
                                1 => RecordLink::local("Category0", format!("Record{}", rng.gen_range(0..6))),
                                _ => RecordLink::external("Other", "Ammo", word(rng)),
                            };
                            creator.set_record_link(attribute, i, link)
                        }
                        AttributeType::Struct => unreachable!(),
                    };
                    assert!(stored);
                }
            }
        }
    }
}

fn save(creator: &CreatorDatabase, save_endian: Endian) -> Vec<u8> {
    let mgr = DatabaseMgr::with_config(DatabaseMgrConfig {
        save_endian,
        ..DatabaseMgrConfig::default()
    });
    let mut out = MemoryOutStream::new();
    mgr.save_database_to(creator, &mut out).unwrap();
    out.into_inner()
}

#[test]
fn test_random_databases_roundtrip_in_both_byte_orders() {
    for seed in 0..16u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut creator = CreatorDatabase::new();
        fill(&mut creator, &mut rng);
        let expected = creator.to_database("Game");

        for endian in [Endian::Native, Endian::Swapped] {
            let bytes = save(&creator, endian);
            let mut mgr = DatabaseMgr::new();
            let handle = mgr.open_new_database("Game", &mut MemoryInStream::new(bytes)).unwrap();
            assert_eq!(mgr.database(handle), Some(&expected), "seed {seed}, {endian:?}");
        }
    }
}

#[test]
fn test_byte_orders_differ_on_disk() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut creator = CreatorDatabase::new();
    fill(&mut creator, &mut rng);

    let native = save(&creator, Endian::Native);
    let swapped = save(&creator, Endian::Swapped);
    assert_eq!(native.len(), swapped.len());
    assert_eq!(&native[..4], b"LTDB");
    assert_eq!(&swapped[..4], b"LTDB");
    assert_ne!(native[4..8], swapped[4..8]);
}

#[test]
fn test_truncated_file_fails_and_registers_nothing() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut creator = CreatorDatabase::new();
    fill(&mut creator, &mut rng);
    let bytes = save(&creator, Endian::Native);

    let mut mgr = DatabaseMgr::new();
    for cut in [2, 6, bytes.len() / 2, bytes.len() - 1] {
        let result = mgr.open_new_database("Game", &mut MemoryInStream::new(&bytes[..cut]));
        assert!(
            matches!(
                result,
                Err(DatabaseError::Stream(_) | DatabaseError::Corrupt(_) | DatabaseError::InvalidMagic(_))
            ),
            "cut at {cut}: {result:?}"
        );
    }
    assert_eq!(mgr.num_open_databases(), 0);
    assert!(mgr.open_existing_database("Game").is_none());
}
