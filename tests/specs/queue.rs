//! Admission and ticket allocation specs

use crate::prelude::*;

#[tokio::test]
async fn tickets_follow_admission_order() {
    let mut desk = Desk::new();
    desk.admit_all(&["Amina", "Bashir", "Cawo"]).await;

    similar_asserts::assert_eq!(
        desk.board(),
        vec![(1, "Amina".to_string()), (2, "Bashir".to_string()), (3, "Cawo".to_string())]
    );
}

#[tokio::test]
async fn emptied_queue_starts_over_at_one() {
    let mut desk = Desk::new();
    let recs = desk.admit_all(&["Amina", "Bashir"]).await;
    for r in &recs {
        desk.queue.delete_one(r.id).await.unwrap();
    }
    assert_eq!(desk.queue.next_ticket(), 1);

    let again = desk.admit("Cawo").await;
    assert_eq!(again.ticket, 1);
}

#[tokio::test]
async fn freed_tickets_in_the_middle_stay_free() {
    let mut desk = Desk::new();
    let recs = desk.admit_all(&["Amina", "Bashir", "Cawo"]).await;
    desk.queue.delete_one(recs[2].id).await.unwrap();

    // Max is now 2, so the next ticket reuses 3
    assert_eq!(desk.admit("Deeqa").await.ticket, 3);

    desk.queue.delete_one(recs[1].id).await.unwrap();
    assert_eq!(desk.admit("Faarax").await.ticket, 4);
}

#[tokio::test]
async fn admission_validates_input() {
    let mut desk = Desk::new();
    let err = desk.queue.add("   ", Stage::Cusub, services(&[Service::Gelin])).await.unwrap_err();
    assert!(matches!(err, QueueError::Validation(_)), "{err}");

    let err = desk.queue.add("Amina", Stage::Cusub, Services::new()).await.unwrap_err();
    assert!(matches!(err, QueueError::Validation(_)), "{err}");

    assert!(desk.queue.list().is_empty());
    assert!(desk.store.is_empty());
}

#[tokio::test]
async fn services_keep_entry_order_and_collapse_duplicates() {
    let mut desk = Desk::new();
    let picked: Services = "Xirid, Gelin, Xirid".parse().unwrap();
    let rec = desk.queue.add("Amina", Stage::FourteenDay, picked).await.unwrap();

    assert_eq!(rec.services.to_string(), "Xirid, Gelin");
    assert_eq!(rec.stage.to_string(), "14 malin");
}

#[tokio::test]
async fn status_toggles_and_persists() {
    let mut desk = Desk::new();
    let rec = desk.admit("Amina").await;

    desk.queue.toggle_status(rec.id).await.unwrap();
    assert_eq!(desk.store.records()[0].status, Status::Done);

    desk.queue.set_status(rec.id, Status::Waiting).await.unwrap();
    assert_eq!(desk.queue.list()[0].status, Status::Waiting);
}

#[tokio::test]
async fn events_describe_each_change() {
    let mut desk = Desk::new();
    let mut rx = desk.queue.subscribe();
    let rec = desk.admit("Amina").await;
    desk.queue.toggle_status(rec.id).await.unwrap();

    let first = rx.try_recv().unwrap();
    assert_eq!(first.name(), "record:admitted");
    let json = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
    assert_eq!(json["type"], "record:status");
    assert_eq!(json["status"], "done");
}
