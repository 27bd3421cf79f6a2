//! File-backed queue specs

use crate::prelude::*;

#[tokio::test]
async fn queue_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    {
        let mut desk = Desk::on_disk(&dir, clock.clone()).await;
        let recs = desk.admit_all(&["Amina", "Bashir"]).await;
        desk.queue.toggle_status(recs[1].id).await.unwrap();
    }

    let desk = Desk::on_disk(&dir, clock).await;
    let list = desk.queue.list();
    assert_eq!(desk.board(), vec![(1, "Amina".to_string()), (2, "Bashir".to_string())]);
    assert_eq!(list[1].status, Status::Done);
    assert_eq!(desk.queue.next_ticket(), 3);
}

#[tokio::test]
async fn ids_are_not_reused_across_restarts() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let deleted = {
        let mut desk = Desk::on_disk(&dir, clock.clone()).await;
        let recs = desk.admit_all(&["Amina", "Bashir"]).await;
        desk.queue.delete_one(recs[1].id).await.unwrap();
        recs[1].id
    };

    let mut desk = Desk::on_disk(&dir, clock).await;
    let next = desk.admit("Cawo").await;
    assert!(next.id > deleted, "{} should be newer than {}", next.id, deleted);
    assert_eq!(next.ticket, 2);
}

#[tokio::test]
async fn pending_undo_does_not_outlive_the_process() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    {
        let mut desk = Desk::on_disk(&dir, clock.clone()).await;
        let rec = desk.admit("Amina").await;
        desk.queue.delete_one(rec.id).await.unwrap();
    }

    let mut desk = Desk::on_disk(&dir, clock).await;
    let err = desk.queue.undo(UndoKind::Single).await.unwrap_err();
    assert!(matches!(err, QueueError::NoPendingUndo(UndoKind::Single)));
    assert!(desk.queue.list().is_empty());
}

#[tokio::test]
async fn restored_records_are_durable() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    {
        let mut desk = Desk::on_disk(&dir, clock.clone()).await;
        desk.admit_all(&["A", "B", "C"]).await;
        desk.queue.delete_all().await.unwrap();
        desk.queue.undo(UndoKind::Bulk).await.unwrap();
    }

    let desk = Desk::on_disk(&dir, clock).await;
    let tickets: Vec<u32> = desk.queue.list().iter().map(|r| r.ticket).collect();
    assert_eq!(tickets, vec![1, 2, 3]);
}
