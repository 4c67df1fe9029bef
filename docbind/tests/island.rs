//! The island lifecycle exercised end-to-end against both backends.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use uuid::Uuid;

use docbind::fs::FileStore;
use docbind::memory::InMemoryStore;
use docbind::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Island {
    unique_id: String,
    owner: Option<Uuid>,
    members: HashSet<Uuid>,
    home_location: Option<Position>,
}

impl Managed for Island {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Island>> = LazyLock::new(|| {
            Schema::builder("Island")
                .key(
                    "uniqueId",
                    |i: &Island| i.unique_id.clone(),
                    |i, v| i.unique_id = v,
                )
                .field(FieldDescriptor::scalar(
                    "owner",
                    ScalarKind::Uuid,
                    |i: &Island| i.owner.into(),
                    |i, v| i.owner = v.as_uuid(),
                ))
                .field(FieldDescriptor::set(
                    "members",
                    ScalarKind::Uuid,
                    |i: &Island| Some(i.members.iter().map(|u| Scalar::Uuid(*u)).collect()),
                    |i, v| {
                        i.members = v
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(|s| s.as_uuid())
                            .collect();
                    },
                ))
                .field(FieldDescriptor::scalar(
                    "homeLocation",
                    ScalarKind::Position,
                    |i: &Island| i.home_location.clone().into(),
                    |i, v| i.home_location = v.into_position(),
                ))
                .build()
                .expect("island schema")
        });
        &SCHEMA
    }
}

fn island_lifecycle<B: StoreBackend>(store: ObjectStore<B>) {
    let mapper = store.mapper::<Island>();

    let owner: Uuid = "11111111-1111-1111-1111-111111111111".parse().unwrap();
    let member: Uuid = "22222222-2222-2222-2222-222222222222".parse().unwrap();

    let mut island = Island {
        unique_id: String::new(),
        owner: Some(owner),
        members: [member].into_iter().collect(),
        home_location: Some(Position::new("world", 100.0, 64.0, 200.0)),
    };

    // First save assigns a key and uses it as the document name.
    mapper.save(&mut island).unwrap();
    let key = island.unique_id.clone();
    assert!(!key.is_empty());
    assert!(mapper.exists(&key).unwrap());

    let reloaded = mapper.load(&key).unwrap();
    assert_eq!(reloaded.owner, Some(owner));
    assert_eq!(reloaded.members, island.members);
    assert_eq!(
        reloaded.home_location,
        Some(Position::new("world", 100.0, 64.0, 200.0))
    );

    let all = mapper.load_all().unwrap();
    assert_eq!(all, vec![reloaded.clone()]);

    mapper.delete(&reloaded).unwrap();
    assert!(!mapper.exists(&key).unwrap());
}

fn world_registry() -> Arc<StaticRegistry> {
    Arc::new(StaticRegistry::from_names(["world"]))
}

#[test]
fn island_lifecycle_in_memory() {
    island_lifecycle(ObjectStore::new(InMemoryStore::new()).with_registry(world_registry()));
}

#[test]
fn island_lifecycle_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    island_lifecycle(
        ObjectStore::new(FileStore::new(dir.path())).with_registry(world_registry()),
    );
}

#[test]
fn islands_survive_store_reopen() {
    let dir = tempfile::TempDir::new().unwrap();

    let mut island = Island {
        unique_id: "base".to_string(),
        owner: Some(Uuid::new_v4()),
        members: HashSet::new(),
        home_location: None,
    };

    {
        let store = ObjectStore::new(FileStore::new(dir.path()));
        store.mapper::<Island>().save(&mut island).unwrap();
    }

    let store = ObjectStore::new(FileStore::new(dir.path()));
    let reloaded = store.mapper::<Island>().load("base").unwrap();
    assert_eq!(reloaded, island);
}
