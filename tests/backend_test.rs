use spice_heritage::backend::{Collection, RestaurantRepository, SqliteRepository};
use spice_heritage::db;
use spice_heritage::db::models::{
    InquiryStatus, MenuDraft, NewInquiry, NewOrder, NewReservation, OrderItem, OrderStatus,
    OrderType, ReservationStatus,
};
use tempfile::TempDir;

fn repository() -> (TempDir, SqliteRepository) {
    let temp_dir = TempDir::new().unwrap();
    let db_pool = db::create_pool(&temp_dir.path().join("test.db"))
        .expect("Failed to create test database");
    db::run_migrations(&db_pool).expect("Failed to run migrations");
    (temp_dir, SqliteRepository::new(db_pool))
}

fn reservation(name: &str) -> NewReservation {
    NewReservation {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "98765 43210".into(),
        date: "2026-10-24".into(),
        time: "7:30 PM".into(),
        guests: 4,
        special_request: None,
    }
}

fn inquiry(message: &str) -> NewInquiry {
    NewInquiry {
        name: "Ravi".into(),
        email: "ravi@example.com".into(),
        phone: None,
        message: message.to_string(),
    }
}

#[tokio::test]
async fn fresh_database_has_starter_menu() {
    let (_dir, repo) = repository();

    let menu = repo.menu_snapshot().await.unwrap();
    assert_eq!(menu.len(), 6);
    assert_eq!(menu[0].name, "Royal Chicken Biryani");
    assert!(menu.iter().all(|item| item.is_available));
    assert_eq!(repo.count(Collection::Menu).await.unwrap(), 6);
}

#[tokio::test]
async fn new_records_start_in_their_initial_status() {
    let (_dir, repo) = repository();

    let created = repo.create_reservation(&reservation("Anita")).await.unwrap();
    assert_eq!(created.status, ReservationStatus::Pending);
    assert!(!created.id.is_empty());

    let inquiry = repo.create_inquiry(&inquiry("Do you cater?")).await.unwrap();
    assert_eq!(inquiry.status, InquiryStatus::Unread);

    let order = repo
        .create_order(&NewOrder {
            customer_name: "Meera".into(),
            customer_phone: "555".into(),
            customer_email: None,
            address: "Bandra West".into(),
            items: vec![OrderItem {
                name: "Garlic Naan".into(),
                quantity: 2,
                price: 99.0,
            }],
            total_amount: 198.0,
            order_type: OrderType::Delivery,
            delivery_time: None,
            special_instructions: Some("Extra butter".into()),
        })
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let stored = repo.orders_snapshot().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].items, order.items);
    assert_eq!(stored[0].special_instructions.as_deref(), Some("Extra butter"));
}

#[tokio::test]
async fn snapshots_list_newest_first() {
    let (_dir, repo) = repository();

    for name in ["First", "Second", "Third"] {
        repo.create_reservation(&reservation(name)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let names: Vec<String> = repo
        .reservations_snapshot()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn status_write_accepts_any_transition() {
    let (_dir, repo) = repository();
    let created = repo.create_reservation(&reservation("Anita")).await.unwrap();

    assert!(repo
        .update_status(Collection::Reservations, &created.id, "cancelled")
        .await
        .unwrap());
    assert!(repo
        .update_status(Collection::Reservations, &created.id, "pending")
        .await
        .unwrap());

    let stored = repo.reservations_snapshot().await.unwrap();
    assert_eq!(stored[0].status, ReservationStatus::Pending);

    assert!(!repo
        .update_status(Collection::Reservations, "missing", "confirmed")
        .await
        .unwrap());
}

#[tokio::test]
async fn delete_removes_only_the_keyed_record() {
    let (_dir, repo) = repository();
    let keep = repo.create_inquiry(&inquiry("Keep me")).await.unwrap();
    let drop = repo.create_inquiry(&inquiry("Drop me")).await.unwrap();

    assert!(repo.delete(Collection::Inquiries, &drop.id).await.unwrap());
    assert!(!repo.delete(Collection::Inquiries, &drop.id).await.unwrap());

    let remaining = repo.inquiries_snapshot().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[tokio::test]
async fn menu_replace_overwrites_every_field() {
    let (_dir, repo) = repository();
    let draft = MenuDraft {
        name: "Mango Lassi".into(),
        description: "Sweet yogurt drink".into(),
        price: 89.0,
        category: "Beverages".into(),
        image: String::new(),
        is_veg: true,
        is_available: true,
    };
    let item = repo.create_menu_item(&draft).await.unwrap();

    let snapshot = repo.menu_snapshot().await.unwrap();
    assert_eq!(snapshot.last().map(|i| i.id.as_str()), Some(item.id.as_str()));

    let changed = MenuDraft {
        price: 99.5,
        is_available: false,
        image: "/uploads/menu/1_lassi.jpg".into(),
        ..draft
    };
    assert!(repo.replace_menu_item(&item.id, &changed).await.unwrap());
    assert!(!repo.replace_menu_item("missing", &changed).await.unwrap());

    let stored = repo.menu_item(&item.id).await.unwrap().unwrap();
    assert_eq!(stored.price, 99.5);
    assert!(!stored.is_available);
    assert_eq!(stored.image, "/uploads/menu/1_lassi.jpg");
}

#[tokio::test]
async fn writes_are_published_to_subscribers() {
    let (_dir, repo) = repository();
    let mut rx = repo.subscribe();

    let created = repo.create_inquiry(&inquiry("Hello")).await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), Collection::Inquiries);

    repo.update_status(Collection::Inquiries, &created.id, "read")
        .await
        .unwrap();
    assert_eq!(rx.recv().await.unwrap(), Collection::Inquiries);

    repo.create_reservation(&reservation("Anita")).await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), Collection::Reservations);
}
