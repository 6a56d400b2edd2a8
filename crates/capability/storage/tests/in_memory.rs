use domain::{SessionStatus, SlotStatus};
use smartpark_storage::{
    CarRecord, CarStore, CarUpdate, InMemoryCarStore, InMemoryPaymentStore, InMemorySessionStore,
    InMemorySlotStore, PaymentRecord, PaymentStore, SessionClose, SessionRecord, SessionStore,
    SlotRecord, SlotStore,
};

fn car(car_id: &str, plate: &str, driver: &str, created_at_ms: i64) -> CarRecord {
    CarRecord {
        car_id: car_id.into(),
        plate_number: plate.into(),
        driver_name: driver.into(),
        phone_number: "0780000000".into(),
        car_model: None,
        car_color: None,
        is_active: true,
        created_at_ms,
    }
}

fn session(record_id: &str, car_id: &str, entry_time_ms: i64) -> SessionRecord {
    SessionRecord {
        record_id: record_id.into(),
        car_id: car_id.into(),
        slot_id: "slot-1".into(),
        entry_time_ms,
        exit_time_ms: None,
        duration_minutes: None,
        total_amount: None,
        status: SessionStatus::Active,
        notes: None,
        created_at_ms: entry_time_ms,
    }
}

#[tokio::test]
async fn car_search_matches_plate_driver_and_phone() {
    let store = InMemoryCarStore::new();
    store.create_car(car("car-1", "RAD123A", "Alice", 1)).await.expect("create");
    store.create_car(car("car-2", "RAE456B", "Bob", 2)).await.expect("create");

    let by_plate = store.list_cars(Some("rad123"), 0, 10).await.expect("query");
    assert_eq!(by_plate.len(), 1);
    assert_eq!(by_plate[0].car_id, "car-1");

    let by_driver = store.list_cars(Some("bob"), 0, 10).await.expect("query");
    assert_eq!(by_driver.len(), 1);
    assert_eq!(by_driver[0].car_id, "car-2");

    assert_eq!(store.count_cars(Some("078")).await.expect("count"), 2);
}

#[tokio::test]
async fn car_list_is_newest_first() {
    let store = InMemoryCarStore::new();
    store.create_car(car("car-1", "RAD123A", "Alice", 10)).await.expect("create");
    store.create_car(car("car-2", "RAE456B", "Bob", 20)).await.expect("create");

    let cars = store.list_cars(None, 0, 10).await.expect("query");
    assert_eq!(cars[0].car_id, "car-2");
    assert_eq!(cars[1].car_id, "car-1");
}

#[tokio::test]
async fn car_update_keeps_unset_fields() {
    let store = InMemoryCarStore::new();
    store.create_car(car("car-1", "RAD123A", "Alice", 1)).await.expect("create");

    let updated = store
        .update_car(
            "car-1",
            CarUpdate {
                driver_name: Some("Alicia".into()),
                ..CarUpdate::default()
            },
        )
        .await
        .expect("query")
        .expect("car");
    assert_eq!(updated.driver_name, "Alicia");
    assert_eq!(updated.phone_number, "0780000000");

    let missing = store.update_car("car-9", CarUpdate::default()).await.expect("query");
    assert!(missing.is_none());
}

#[tokio::test]
async fn slot_status_transitions() {
    let store = InMemorySlotStore::new();
    store
        .create_slot(SlotRecord {
            slot_id: "slot-1".into(),
            slot_number: "A1".into(),
            location: "Ground floor".into(),
            slot_status: SlotStatus::Available,
            is_active: true,
            created_at_ms: 1,
        })
        .await
        .expect("create");

    assert!(store.set_slot_status("slot-1", SlotStatus::Occupied).await.expect("update"));
    let available = store.list_slots(Some(SlotStatus::Available)).await.expect("query");
    assert!(available.is_empty());

    let slot = store.find_by_number("A1").await.expect("query").expect("slot");
    assert_eq!(slot.slot_status, SlotStatus::Occupied);
    assert!(!store.set_slot_status("slot-9", SlotStatus::Available).await.expect("update"));
}

#[tokio::test]
async fn close_session_only_while_active() {
    let store = InMemorySessionStore::new();
    store.create_session(session("rec-1", "car-1", 1_000)).await.expect("create");

    let active = store.find_active_by_car("car-1").await.expect("query").expect("session");
    assert_eq!(active.record_id, "rec-1");

    let close = SessionClose {
        exit_time_ms: 4_600_000,
        duration_minutes: 76,
        total_amount: 1_000.0,
    };
    let closed = store
        .close_session("rec-1", close.clone())
        .await
        .expect("query")
        .expect("session");
    assert_eq!(closed.status, SessionStatus::Completed);
    assert_eq!(closed.duration_minutes, Some(76));
    assert_eq!(closed.total_amount, Some(1_000.0));

    // 已完成的记录不能再次结算
    let again = store.close_session("rec-1", close).await.expect("query");
    assert!(again.is_none());
    assert!(store.find_active_by_car("car-1").await.expect("query").is_none());
}

#[tokio::test]
async fn entry_range_is_inclusive_and_ascending() {
    let store = InMemorySessionStore::new();
    store.create_session(session("rec-1", "car-1", 300)).await.expect("create");
    store.create_session(session("rec-2", "car-2", 100)).await.expect("create");
    store.create_session(session("rec-3", "car-3", 900)).await.expect("create");

    let rows = store.find_by_entry_range(100, 300).await.expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record_id, "rec-2");
    assert_eq!(rows[1].record_id, "rec-1");
}

#[tokio::test]
async fn payment_range_and_counts() {
    let store = InMemoryPaymentStore::new();
    for (id, at) in [("pay-1", 100), ("pay-2", 500), ("pay-3", 900)] {
        store
            .create_payment(PaymentRecord {
                payment_id: id.into(),
                record_id: "rec-1".into(),
                amount_paid: 500.0,
                payment_method: "cash".into(),
                payment_date_ms: at,
                created_at_ms: at,
            })
            .await
            .expect("create");
    }

    let rows = store.find_by_date_range(400, 1_000).await.expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].payment_id, "pay-2");
    assert_eq!(store.count_payments().await.expect("count"), 3);
}
