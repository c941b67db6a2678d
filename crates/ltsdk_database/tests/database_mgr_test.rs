//! # Database Manager Test
//!
//! End-to-end behavior through the public manager API:
//! - swapping values between a base and an override database
//! - unpacked databases are never shared
//! - every read miss degrades to the caller's default

use ltsdk_database::{
    AttributeHandle, AttributeType, AttributeUsage, CreatorDatabase, DatabaseHandle, DatabaseMgr, DatabaseMgrConfig,
};
use ltsdk_math::Vector3;
use ltsdk_platform::{MemoryInStream, MemoryOutStream};

fn weapons(damage: f32, clip: i32, with_range: bool) -> CreatorDatabase {
    let mut creator = CreatorDatabase::new();
    let category = creator.create_category("Weapons").unwrap();
    for (i, name) in ["Pistol", "Rifle"].into_iter().enumerate() {
        let record = creator.create_record(category, name).unwrap();
        let attr = creator
            .create_attribute(record, "Damage", AttributeType::Float, AttributeUsage::Default, 1)
            .unwrap();
        creator.set_float(attr, 0, damage * (i + 1) as f32);
        let attr = creator
            .create_attribute(record, "Clip", AttributeType::Int32, AttributeUsage::Default, 1)
            .unwrap();
        creator.set_int32(attr, 0, clip);
        if with_range {
            let attr = creator
                .create_attribute(record, "Range", AttributeType::Float, AttributeUsage::Default, 1)
                .unwrap();
            creator.set_float(attr, 0, 100.0);
        }
    }
    creator
}

/// Default-on-miss manager, also under the `strict` feature.
fn lenient() -> DatabaseMgr {
    DatabaseMgr::with_config(DatabaseMgrConfig::lenient())
}

fn damage(mgr: &DatabaseMgr, db: DatabaseHandle, record: &str) -> f32 {
    mgr.get_float(mgr.get_attribute_path(db, "Weapons", record, "Damage"), 0, f32::NAN)
}

#[test]
fn test_swap_exchanges_and_restores() {
    let mut mgr = lenient();
    let base = mgr.convert_database(&weapons(10.0, 6, false), "Base");
    let patch = mgr.convert_database(&weapons(1.0, 30, true), "Patch");

    assert!(mgr.swap_database_values(base, patch));
    assert_eq!(damage(&mgr, base, "Rifle"), 2.0);
    assert_eq!(damage(&mgr, patch, "Rifle"), 20.0);
    let clip = mgr.get_attribute_path(base, "Weapons", "Pistol", "Clip");
    assert_eq!(mgr.get_int32(clip, 0, 0), 30);
    // Attributes only the second database has are left alone
    let range = mgr.get_attribute_path(patch, "Weapons", "Pistol", "Range");
    assert_eq!(mgr.get_float(range, 0, 0.0), 100.0);

    assert!(mgr.swap_database_values(base, patch));
    assert_eq!(damage(&mgr, base, "Pistol"), 10.0);
    assert_eq!(damage(&mgr, patch, "Pistol"), 1.0);
}

#[test]
fn test_swap_requires_subset() {
    let mut mgr = lenient();
    let wide = mgr.convert_database(&weapons(10.0, 6, true), "Wide");
    let narrow = mgr.convert_database(&weapons(1.0, 30, false), "Narrow");
    let before = mgr.database(wide).cloned();

    assert!(!mgr.swap_database_values(wide, narrow));
    assert_eq!(mgr.database(wide).cloned(), before);
    assert_eq!(damage(&mgr, narrow, "Pistol"), 1.0);
}

#[test]
fn test_swap_rejects_type_change() {
    let mut mgr = lenient();
    let a = mgr.convert_database(&weapons(10.0, 6, false), "A");

    let mut retyped = CreatorDatabase::new();
    let category = retyped.create_category("Weapons").unwrap();
    for name in ["Pistol", "Rifle"] {
        let record = retyped.create_record(category, name).unwrap();
        retyped
            .create_attribute(record, "Damage", AttributeType::Int32, AttributeUsage::Default, 1)
            .unwrap();
        retyped
            .create_attribute(record, "Clip", AttributeType::Int32, AttributeUsage::Default, 1)
            .unwrap();
    }
    let b = mgr.convert_database(&retyped, "B");

    assert!(!mgr.swap_database_values(a, b));
    assert_eq!(damage(&mgr, a, "Pistol"), 10.0);
}

const DATA: &str = r#"
name = "Tuning"

[Weapons.Pistol]
Damage = 12.5
Muzzle = [0.0, 0.1, 0.4]

[Weapons.Rifle]
Muzzle = [0.0, 0.2, 0.9]
"#;

const CONSTRAINTS: &str = r#"
[Weapons.Damage]
type = "float"
default = 5.0

[Weapons.Muzzle]
type = "vector3"
"#;

fn open_unpacked(mgr: &mut DatabaseMgr) -> DatabaseHandle {
    mgr.open_unpacked_database(&mut MemoryInStream::new(DATA), &mut MemoryInStream::new(CONSTRAINTS))
        .unwrap()
}

#[test]
fn test_unpacked_databases_are_independent() {
    let mut mgr = lenient();
    let first = open_unpacked(&mut mgr);
    let second = open_unpacked(&mut mgr);

    assert_ne!(first, second);
    assert_eq!(mgr.num_open_databases(), 2);
    assert_eq!(mgr.get_database_name(first), Some("Tuning"));
    assert_eq!(mgr.open_existing_database("Tuning"), None);

    assert_eq!(damage(&mgr, first, "Pistol"), 12.5);
    assert_eq!(damage(&mgr, first, "Rifle"), 5.0);
    let muzzle = mgr.get_attribute_path(second, "Weapons", "Rifle", "Muzzle");
    assert_eq!(mgr.get_vector3(muzzle, 0, Vector3::ZERO), Vector3::new(0.0, 0.2, 0.9));

    assert!(mgr.release_database(first));
    assert!(mgr.is_valid(second));
}

#[test]
fn test_unpacked_rejects_undeclared_attribute() {
    let mut mgr = lenient();
    let data = "[Weapons.Pistol]\nWeight = 3.0\n";
    let result = mgr.open_unpacked_database(&mut MemoryInStream::new(data), &mut MemoryInStream::new(CONSTRAINTS));
    assert!(result.is_err());
    assert_eq!(mgr.num_open_databases(), 0);
}

#[test]
fn test_reads_degrade_to_defaults() {
    let mut mgr = lenient();
    let mut out = MemoryOutStream::new();
    mgr.save_database_to(&weapons(10.0, 6, false), &mut out).unwrap();
    let db = mgr.open_new_database("Game", &mut out.into_in_stream()).unwrap();

    let clip = mgr.get_attribute_path(db, "Weapons", "Pistol", "Clip");
    assert_eq!(mgr.get_int32(clip, 0, -1), 6);
    // Wrong type, index out of range, missing names, null handle
    assert_eq!(mgr.get_float(clip, 0, -1.0), -1.0);
    assert_eq!(mgr.get_int32(clip, 1, -1), -1);
    assert_eq!(mgr.get_string(clip, 0, "none"), "none");
    assert_eq!(mgr.get_attribute_path(db, "Weapons", "Shotgun", "Clip"), None);
    assert_eq!(mgr.get_int32(None::<AttributeHandle>, 0, -1), -1);
    assert_eq!(mgr.get_num_values(None::<AttributeHandle>), 0);
    assert_eq!(mgr.get_record_link(clip, 0, None), None);

    // Handles outlive their database without crashing
    assert!(mgr.release_database(db));
    assert_eq!(mgr.get_int32(clip, 0, -1), -1);
    assert_eq!(mgr.get_attribute_name(clip), None);
}
