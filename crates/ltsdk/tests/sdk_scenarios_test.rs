//! # SDK Scenario Tests
//!
//! Cross-crate scenarios a game runs through the public SDK:
//! 1. **Collision**: segment against an oriented box
//! 2. **Data misuse**: a float attribute read as an int
//! 3. **Spawn volumes**: bounds authored in a database file, loaded from disk
//! 4. **Localization**: record names resolved through a string keeper
//! 5. **Bookkeeping**: loaded records tracked in lists and banks

use ltsdk::core::{CountedList, LinkArena, ObjectBank};
use ltsdk::database::{CreatorDatabase, DatabaseMgr, DatabaseMgrConfig, Endian, StringKeeper, StringKeeperWriter};
use ltsdk::math::intersect::{aabb_segment, obb_segment, point_in_aabb};
use ltsdk::platform::{FileInStream, FileOutStream, OutStream};
use ltsdk::{Aabb, AttributeType, AttributeUsage, Obb, RecordHandle, Vector3};

fn temp_path(tag: &str) -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ltsdk_{tag}_{id}.bin"))
}

// ============================================================================
// COLLISION
// ============================================================================

#[test]
fn test_segment_enters_obb_at_point_four() {
    let obb = Obb::from_aabb(&Aabb::from_center_extents(Vector3::ZERO, Vector3::new(1.0, 1.0, 1.0)));
    let time = obb_segment(&obb, Vector3::new(-5.0, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0));
    let time = time.expect("segment crosses the box");
    assert!((time - 0.4).abs() < 1e-5, "time was {time}");
}

// ============================================================================
// DATA MISUSE
// ============================================================================

#[test]
fn test_float_read_as_int_returns_default() {
    let mut creator = CreatorDatabase::new();
    let category = creator.create_category("Weapons").unwrap();
    let record = creator.create_record(category, "Pistol").unwrap();
    let attr = creator
        .create_attribute(record, "Damage", AttributeType::Float, AttributeUsage::Default, 1)
        .unwrap();
    assert!(creator.set_float(attr, 0, 2.5));

    let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
    let db = mgr.convert_database(&creator, "Game");
    let damage = mgr.get_attribute_path(db, "Weapons", "Pistol", "Damage");
    assert_eq!(mgr.get_int32(damage, 0, 7), 7);
    assert_eq!(mgr.get_float(damage, 0, 0.0), 2.5);
}

// ============================================================================
// SPAWN VOLUMES
// ============================================================================

fn spawn_creator() -> CreatorDatabase {
    let mut creator = CreatorDatabase::new();
    let category = creator.create_category("SpawnVolumes").unwrap();
    for (name, center) in [("Courtyard", Vector3::new(0.0, 0.0, 0.0)), ("Roof", Vector3::new(0.0, 20.0, 0.0))] {
        let record = creator.create_record(category, name).unwrap();
        let bounds = creator
            .create_attribute(record, "Bounds", AttributeType::Vector3, AttributeUsage::Default, 2)
            .unwrap();
        assert!(creator.set_vector3(bounds, 0, center));
        assert!(creator.set_vector3(bounds, 1, Vector3::new(4.0, 2.0, 4.0)));
    }
    creator
}

#[test]
fn test_spawn_volumes_from_swapped_file() {
    let path = temp_path("spawn");
    {
        let mgr = DatabaseMgr::with_config(DatabaseMgrConfig {
            save_endian: Endian::Swapped,
            ..DatabaseMgrConfig::default()
        });
        let mut out = FileOutStream::create(&path).unwrap();
        mgr.save_database_to(&spawn_creator(), &mut out).unwrap();
        out.flush().unwrap();
    }

    let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
    let db = mgr
        .open_new_database("Spawns", &mut FileInStream::open(&path).unwrap())
        .unwrap();
    std::fs::remove_file(&path).ok();

    let category = mgr.get_category(db, "SpawnVolumes");
    let volumes: Vec<Aabb> = (0..mgr.get_num_records(category))
        .map(|i| {
            let bounds = mgr.get_attribute(mgr.get_record_by_index(category, i), "Bounds");
            Aabb::from_center_extents(
                mgr.get_vector3(bounds, 0, Vector3::ZERO),
                mgr.get_vector3(bounds, 1, Vector3::ZERO),
            )
        })
        .collect();

    assert_eq!(volumes.len(), 2);
    assert!(point_in_aabb(Vector3::new(3.0, 1.0, -3.0), &volumes[0]));
    assert!(!point_in_aabb(Vector3::new(3.0, 1.0, -3.0), &volumes[1]));

    // Dropping straight down from above the roof volume
    let time = aabb_segment(&volumes[1], Vector3::new(0.0, 32.0, 0.0), Vector3::new(0.0, 12.0, 0.0));
    let time = time.expect("segment crosses the roof volume");
    assert!((time - 0.5).abs() < 1e-5, "time was {time}");
}

// ============================================================================
// LOCALIZATION
// ============================================================================

#[test]
fn test_display_names_through_string_keeper() {
    let path = temp_path("strings");
    {
        let mut writer = StringKeeperWriter::new();
        assert!(writer.add(1001, "Service Pistol", Some("snd/vo/pistol.wav")));
        assert!(writer.add(1002, "Assault Rifle", None));
        let mut out = FileOutStream::create(&path).unwrap();
        writer.save(&mut out).unwrap();
    }
    let keeper = StringKeeper::load(&mut FileInStream::open(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    let mut creator = CreatorDatabase::new();
    let category = creator.create_category("Weapons").unwrap();
    for (name, id) in [("Pistol", 1001), ("Rifle", 1002), ("Prototype", 1999)] {
        let record = creator.create_record(category, name).unwrap();
        let attr = creator
            .create_attribute(record, "NameId", AttributeType::Int32, AttributeUsage::Default, 1)
            .unwrap();
        assert!(creator.set_int32(attr, 0, id));
    }
    let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
    let db = mgr.convert_database(&creator, "Game");

    let name_of = |record: &str| {
        let attr = mgr.get_attribute_path(db, "Weapons", record, "NameId");
        let id = u32::try_from(mgr.get_int32(attr, 0, 0)).unwrap();
        keeper.get_string(id, "<unnamed>")
    };
    assert_eq!(name_of("Pistol"), "Service Pistol");
    assert_eq!(name_of("Rifle"), "Assault Rifle");
    assert_eq!(name_of("Prototype"), "<unnamed>");
    assert_eq!(keeper.get_voice_path(1001), Some("snd/vo/pistol.wav"));
}

// ============================================================================
// BOOKKEEPING
// ============================================================================

#[test]
fn test_records_tracked_in_list_and_bank() {
    let mut mgr = DatabaseMgr::with_config(DatabaseMgrConfig::lenient());
    let db = mgr.convert_database(&spawn_creator(), "Spawns");
    let category = mgr.get_category(db, "SpawnVolumes");

    let mut arena: LinkArena<RecordHandle> = LinkArena::new();
    let mut active = CountedList::new(&mut arena);
    let mut bank: ObjectBank<Vector3> = ObjectBank::new(1);
    let mut centers = Vec::new();

    for i in 0..mgr.get_num_records(category) {
        let record = mgr.get_record_by_index(category, i).unwrap();
        let link = arena.new_link(record);
        active.add_tail(&mut arena, link);
        let bounds = mgr.get_attribute(record, "Bounds");
        centers.push(bank.allocate(mgr.get_vector3(bounds, 0, Vector3::ZERO)).unwrap());
    }

    assert_eq!(active.count(), 2);
    assert_eq!(active.count_objects(&arena), 2);
    assert_eq!(bank.page_count(), 2);
    let names: Vec<&str> = active
        .iter(&arena)
        .filter_map(|link| mgr.get_record_name(*arena.data(link)?))
        .collect();
    assert_eq!(names, ["Courtyard", "Roof"]);
    assert_eq!(bank.get(centers[1]), Some(&Vector3::new(0.0, 20.0, 0.0)));

    for handle in centers {
        bank.free(handle);
    }
    active.remove_all(&mut arena);
    assert!(active.is_empty());
}
