use super::*;
use crate::config::ZeroCapacity;
use crate::events::EventLog;
use crate::id::SequentialIds;

fn logged_silo(config: &SiloConfig) -> (Silo<&'static str>, AdminCapability, EventLog) {
    let log = EventLog::new();
    let (silo, cap) = Silo::create_with(config, &mut SequentialIds::new(), Arc::new(log.clone()));
    (silo, cap, log)
}

#[test]
fn test_new_silo_is_filling() {
    let (silo, cap) = Silo::<u32>::create(3);
    assert!(silo.is_filling());
    assert!(!silo.is_ready());
    assert_eq!(silo.size(), 0);
    assert_eq!(silo.capacity(), 3);
    assert_eq!(silo.auth_mode(), AuthMode::Required);
    assert!(cap.authorizes(&silo.id()));
}

#[test]
fn test_fills_to_ready() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, "x").unwrap();
    assert!(silo.is_filling());
    assert_eq!(silo.size(), 1);

    silo.add_item(&cap, "y").unwrap();
    assert!(silo.is_ready());
    assert_eq!(silo.size(), 2);
}

#[test]
fn test_add_while_ready_returns_item() {
    let (mut silo, cap) = Silo::create(1);
    silo.add_item(&cap, "x".to_string()).unwrap();

    let rejected = silo.add_item(&cap, "z".to_string()).unwrap_err();
    assert_eq!(rejected.error, SiloError::Ready);
    assert_eq!(rejected.value, "z");
    assert_eq!(silo.size(), 1);
}

#[test]
fn test_remove_while_filling() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, 1u8).unwrap();

    assert_eq!(silo.remove_item(&cap), Err(SiloError::Filling));
    assert_eq!(silo.remove_items(&cap, 1), Err(SiloError::Filling));
    assert_eq!(silo.remove_all(&cap), Err(SiloError::Filling));
    assert_eq!(silo.size(), 1);
}

#[test]
fn test_remove_is_lifo() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, "a").unwrap();
    silo.add_item(&cap, "b").unwrap();

    assert_eq!(silo.remove_item(&cap), Ok("b"));
    assert_eq!(silo.remove_item(&cap), Ok("a"));
    assert!(silo.is_ready());
}

#[test]
fn test_remove_from_drained_silo() {
    let (mut silo, cap) = Silo::create(1);
    silo.add_item(&cap, 'a').unwrap();
    silo.remove_item(&cap).unwrap();

    assert_eq!(silo.remove_item(&cap), Err(SiloError::Empty));
    assert_eq!(silo.remove_items(&cap, 3), Ok(vec![]));
}

#[test]
fn test_remove_items_clamps_quantity() {
    let (mut silo, cap) = Silo::create(3);
    for item in ["a", "b", "c"] {
        silo.add_item(&cap, item).unwrap();
    }

    assert_eq!(silo.remove_items(&cap, 2), Ok(vec!["c", "b"]));
    assert_eq!(silo.remove_items(&cap, 10), Ok(vec!["a"]));
    assert!(silo.is_empty());
}

#[test]
fn test_remove_zero_items() {
    let (mut silo, cap) = Silo::create(1);
    silo.add_item(&cap, 9).unwrap();
    assert_eq!(silo.remove_items(&cap, 0), Ok(vec![]));
    assert_eq!(silo.size(), 1);
}

#[test]
fn test_remove_all() {
    let (mut silo, cap) = Silo::create(3);
    for item in 1..=3 {
        silo.add_item(&cap, item).unwrap();
    }
    assert_eq!(silo.remove_all(&cap), Ok(vec![3, 2, 1]));
    assert!(silo.is_empty());
}

#[test]
fn test_set_capacity_below_size() {
    let (mut silo, cap) = Silo::create(3);
    silo.add_item(&cap, "x").unwrap();
    silo.add_item(&cap, "y").unwrap();

    assert_eq!(
        silo.set_capacity(&cap, 1),
        Err(SiloError::CapacityTooLow {
            requested: 1,
            size: 2
        })
    );
    assert_eq!(silo.capacity(), 3);
    assert!(silo.is_filling());
}

#[test]
fn test_set_capacity_to_size_makes_ready() {
    let (mut silo, cap) = Silo::create(5);
    silo.add_item(&cap, "x").unwrap();
    silo.add_item(&cap, "y").unwrap();

    silo.set_capacity(&cap, 2).unwrap();
    assert!(silo.is_ready());
    assert_eq!(silo.capacity(), 2);
}

#[test]
fn test_set_capacity_above_size_keeps_filling() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, "x").unwrap();

    silo.set_capacity(&cap, 4).unwrap();
    assert!(silo.is_filling());
    assert_eq!(silo.capacity(), 4);
}

#[test]
fn test_ready_is_sticky_after_capacity_increase() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, "x").unwrap();
    silo.add_item(&cap, "y").unwrap();
    assert!(silo.is_ready());

    silo.set_capacity(&cap, 10).unwrap();
    assert!(silo.is_ready());
    assert!(!silo.is_filling());

    // Still refuses new items.
    assert_eq!(silo.add_item(&cap, "z").unwrap_err().error, SiloError::Ready);
}

#[test]
fn test_ready_is_sticky_after_removals() {
    let (mut silo, cap) = Silo::create(2);
    silo.add_item(&cap, "x").unwrap();
    silo.add_item(&cap, "y").unwrap();

    silo.remove_item(&cap).unwrap();
    assert!(silo.is_ready());
    silo.remove_item(&cap).unwrap();
    assert!(silo.is_ready());
    assert!(silo.is_empty());
}

#[test]
fn test_zero_capacity_starts_filling_by_default() {
    let (mut silo, cap) = Silo::create(0);
    assert!(silo.is_filling());

    let rejected = silo.add_item(&cap, "x").unwrap_err();
    assert_eq!(rejected.error, SiloError::AtCapacity { capacity: 0 });
    assert_eq!(silo.size(), 0);
    assert_eq!(silo.remove_item(&cap), Err(SiloError::Filling));

    // Re-setting the capacity re-evaluates fullness.
    silo.set_capacity(&cap, 0).unwrap();
    assert!(silo.is_ready());
}

#[test]
fn test_zero_capacity_can_grow_before_filling() {
    let (mut silo, cap) = Silo::create(0);
    silo.set_capacity(&cap, 1).unwrap();
    assert!(silo.is_filling());

    silo.add_item(&cap, "x").unwrap();
    assert!(silo.is_ready());
}

#[test]
fn test_zero_capacity_ready_policy() {
    let config = SiloConfig::new(0).with_zero_capacity(ZeroCapacity::Ready);
    let (mut silo, cap, log) = logged_silo(&config);

    assert!(silo.is_ready());
    assert_eq!(silo.add_item(&cap, "x").unwrap_err().error, SiloError::Ready);
    assert_eq!(log.kinds(), vec!["created", "became_ready"]);
    silo.destroy(&cap).unwrap();
}

#[test]
fn test_destroy_empty_silo() {
    let (silo, cap) = Silo::<String>::create(4);
    silo.destroy(&cap).unwrap();
    cap.destroy();
}

#[test]
fn test_destroy_non_empty_silo_hands_it_back() {
    let (mut silo, cap) = Silo::create(1);
    silo.add_item(&cap, "x").unwrap();

    let rejected = silo.destroy(&cap).unwrap_err();
    assert_eq!(rejected.error, SiloError::NotEmpty { size: 1 });

    let mut silo = rejected.into_inner();
    assert_eq!(silo.size(), 1);
    assert!(silo.is_ready());
    assert_eq!(silo.remove_item(&cap), Ok("x"));
    silo.destroy(&cap).unwrap();
}

#[test]
fn test_foreign_capability_is_rejected_first() {
    let (mut silo, cap) = Silo::create(1);
    let (other, other_cap) = Silo::<&str>::create(1);

    // Rejected while filling, even though a removal would also fail on state.
    let err = silo.remove_item(&other_cap).unwrap_err();
    assert_eq!(
        err,
        SiloError::InvalidCapability {
            silo: silo.id(),
            presented: Some(other.id()),
        }
    );

    silo.add_item(&cap, "x").unwrap();

    // Rejected while ready, even though an add would also fail on state.
    let rejected = silo.add_item(&other_cap, "y").unwrap_err();
    assert!(rejected.error.is_authorization());
    assert!(silo.set_capacity(&other_cap, 5).unwrap_err().is_authorization());
    assert!(silo.remove_items(&other_cap, 1).unwrap_err().is_authorization());
    assert_eq!(silo.capacity(), 1);
    assert_eq!(silo.size(), 1);

    silo.remove_item(&cap).unwrap();
    let rejected = silo.destroy(&other_cap).unwrap_err();
    assert!(rejected.error.is_authorization());
    rejected.into_inner().destroy(&cap).unwrap();
}

#[test]
fn test_missing_credential_is_rejected() {
    let (mut silo, _cap) = Silo::create(1);
    let rejected = silo.add_item(Credential::none(), 1).unwrap_err();
    assert_eq!(
        rejected.error,
        SiloError::InvalidCapability {
            silo: silo.id(),
            presented: None,
        }
    );
}

#[test]
fn test_unrestricted_silo_ignores_credentials() {
    let config = SiloConfig::new(2).with_auth(AuthMode::Unrestricted);
    let (mut silo, _cap, _log) = logged_silo(&config);
    let (_other, other_cap) = Silo::<&str>::create(1);

    silo.add_item(Credential::none(), "a").unwrap();
    silo.add_item(&other_cap, "b").unwrap();
    assert!(silo.is_ready());
    assert_eq!(silo.remove_all(Credential::none()), Ok(vec!["b", "a"]));
    silo.destroy(Credential::none()).unwrap();
}

#[test]
fn test_unrestricted_silo_keeps_state_machine() {
    let config = SiloConfig::new(2).with_auth(AuthMode::Unrestricted);
    let (mut silo, _cap, _log) = logged_silo(&config);

    assert_eq!(silo.remove_item(Credential::none()), Err(SiloError::Filling));
    silo.add_item(Credential::none(), "a").unwrap();
    assert!(matches!(
        silo.set_capacity(Credential::none(), 0),
        Err(SiloError::CapacityTooLow { .. })
    ));
}

#[test]
fn test_events_follow_lifecycle() {
    let (mut silo, cap, log) = logged_silo(&SiloConfig::new(2));

    silo.add_item(&cap, "x").unwrap();
    silo.add_item(&cap, "y").unwrap();
    assert_eq!(silo.add_item(&cap, "z").unwrap_err().error, SiloError::Ready);
    silo.set_capacity(&cap, 3).unwrap();
    silo.remove_items(&cap, 5).unwrap();
    let id = silo.id();
    silo.destroy(&cap).unwrap();

    assert_eq!(
        log.kinds(),
        vec![
            "created",
            "item_added",
            "item_added",
            "became_ready",
            "capacity_changed",
            "item_removed",
            "item_removed",
            "destroyed",
        ]
    );
    assert_eq!(log.for_silo(id).len(), log.len());

    match &log.all()[5] {
        SiloEvent::ItemRemoved { position, size, .. } => {
            assert_eq!(*position, 1);
            assert_eq!(*size, 1);
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}

#[test]
fn test_rejections_emit_nothing() {
    let (mut silo, cap, log) = logged_silo(&SiloConfig::new(2));
    let (_other, other_cap) = Silo::<&str>::create(1);

    assert!(silo.add_item(&other_cap, "x").unwrap_err().error.is_authorization());
    assert_eq!(silo.remove_item(&cap), Err(SiloError::Filling));
    assert!(silo.set_capacity(&other_cap, 4).unwrap_err().is_authorization());
    assert_eq!(silo.size(), 0);

    assert_eq!(log.kinds(), vec!["created"]);
}

#[test]
fn test_sequential_ids_are_deterministic() {
    let mut ids = SequentialIds::new();
    let (a, a_cap) = Silo::<u8>::create_with(&SiloConfig::new(1), &mut ids, Arc::new(NullSink));
    let (b, _) = Silo::<u8>::create_with(&SiloConfig::new(1), &mut ids, Arc::new(NullSink));

    assert_eq!(a.id().uuid(), uuid::Uuid::from_u128(1));
    assert_eq!(a_cap.id().uuid(), uuid::Uuid::from_u128(2));
    assert_eq!(b.id().uuid(), uuid::Uuid::from_u128(3));
    assert!(!a_cap.authorizes(&b.id()));
}

#[test]
fn test_create_in_proven_empty_store() {
    let store: VecStore<u16> = VecStore::with_capacity(8);
    let empty = Empty::prove::<u16>(store).unwrap();
    let (mut silo, cap) =
        Silo::create_in(empty, &SiloConfig::new(1), &mut RandomIds, Arc::new(NullSink));
    silo.add_item(&cap, 7).unwrap();
    assert_eq!(silo.remove_item(&cap), Ok(7));
}

/// Store whose default already holds a stray item.
#[derive(Debug)]
struct SeededStore(Vec<u8>);

impl Default for SeededStore {
    fn default() -> Self {
        Self(vec![42])
    }
}

impl SequenceStore<u8> for SeededStore {
    fn push(&mut self, item: u8) {
        self.0.push(item);
    }

    fn pop(&mut self) -> Option<u8> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[test]
fn test_create_with_drains_non_empty_default_store() {
    let (mut silo, cap) = Silo::<u8, SeededStore>::create_with(
        &SiloConfig::new(1),
        &mut SequentialIds::new(),
        Arc::new(NullSink),
    );
    assert_eq!(silo.size(), 0);
    assert!(silo.is_filling());

    silo.add_item(&cap, 7).unwrap();
    assert!(silo.is_ready());
    assert_eq!(silo.remove_all(&cap), Ok(vec![7]));
}

#[test]
fn test_item_type_and_debug() {
    let (silo, _cap) = Silo::<String>::create(1);
    assert!(silo.item_type().ends_with("String"));

    let debug = format!("{:?}", silo);
    assert!(debug.contains("Filling"));
    assert!(debug.contains("capacity: 1"));
}
