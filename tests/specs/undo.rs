//! Timed undo specs

use crate::prelude::*;

#[tokio::test]
async fn deleted_record_comes_back_with_its_ticket() {
    let mut desk = Desk::new();
    let recs = desk.admit_all(&["A", "B"]).await;

    desk.queue.delete_one(recs[0].id).await.unwrap();
    let restored = desk.queue.undo(UndoKind::Single).await.unwrap();

    assert_ne!(restored[0].id, recs[0].id);
    assert_eq!(restored[0].inserted_at_ms, recs[0].inserted_at_ms);
    assert_eq!(desk.board(), vec![(1, "A".to_string()), (2, "B".to_string())]);
    assert_eq!(desk.queue.next_ticket(), 3);
}

#[tokio::test]
async fn single_undo_lapses_after_thirty_seconds() {
    let mut desk = Desk::new();
    let rec = desk.admit("A").await;
    desk.queue.delete_one(rec.id).await.unwrap();

    desk.clock.advance_secs(29);
    assert_eq!(desk.queue.pending_undo(UndoKind::Single).unwrap().countdown(), "00:01");

    desk.clock.advance_secs(1);
    let err = desk.queue.undo(UndoKind::Single).await.unwrap_err();
    assert!(matches!(err, QueueError::NoPendingUndo(UndoKind::Single)));
}

#[tokio::test]
async fn only_the_latest_single_delete_is_undoable() {
    let mut desk = Desk::new();
    let recs = desk.admit_all(&["A", "B", "C"]).await;
    desk.queue.delete_one(recs[0].id).await.unwrap();
    desk.queue.delete_one(recs[1].id).await.unwrap();

    desk.queue.undo(UndoKind::Single).await.unwrap();
    assert_eq!(desk.board(), vec![(2, "B".to_string()), (3, "C".to_string())]);
}

#[tokio::test]
async fn clear_all_is_undoable_for_ten_minutes() {
    let mut desk = Desk::new();
    desk.admit_all(&["A", "B", "C"]).await;
    let before = desk.board();

    let snapshot = desk.queue.delete_all().await.unwrap();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(desk.queue.pending_undo(UndoKind::Bulk).unwrap().countdown(), "10:00");

    desk.clock.advance_secs(599);
    desk.queue.undo(UndoKind::Bulk).await.unwrap();
    assert_eq!(desk.board(), before);
}

#[tokio::test]
async fn clear_all_on_empty_queue_is_refused() {
    let mut desk = Desk::new();
    assert!(matches!(desk.queue.delete_all().await, Err(QueueError::EmptyQueue)));
}

#[tokio::test]
async fn bulk_undo_while_ticket_one_is_reissued() {
    let mut desk = Desk::new();
    desk.admit_all(&["A", "B", "C"]).await;
    desk.queue.delete_all().await.unwrap();
    assert_eq!(desk.queue.next_ticket(), 1);
    let c = desk.admit("New C").await;
    assert_eq!(c.ticket, 1);

    let err = desk.queue.undo(UndoKind::Bulk).await.unwrap_err();
    assert!(matches!(err, QueueError::TicketConflict { ticket: 1 }));
    assert_eq!(desk.board(), vec![(1, "New C".to_string())]);
    assert!(desk.queue.pending_undo(UndoKind::Bulk).is_some());
}

#[tokio::test]
async fn bulk_undo_after_expiry_with_ticket_one_reissued() {
    let mut desk = Desk::new();
    desk.admit_all(&["A", "B", "C"]).await;
    desk.queue.delete_all().await.unwrap();
    desk.admit("New C").await;

    desk.clock.advance_secs(600);
    let err = desk.queue.undo(UndoKind::Bulk).await.unwrap_err();
    assert!(matches!(err, QueueError::NoPendingUndo(UndoKind::Bulk)));
    assert_eq!(desk.board(), vec![(1, "New C".to_string())]);
}

#[tokio::test]
async fn dismissed_undo_cannot_be_used() {
    let mut desk = Desk::new();
    let rec = desk.admit("A").await;
    desk.queue.delete_one(rec.id).await.unwrap();
    desk.queue.dismiss_undo(UndoKind::Single);

    assert!(desk.queue.undo(UndoKind::Single).await.is_err());
}

#[tokio::test]
async fn lifecycle_events_for_a_superseded_then_expired_undo() {
    let mut desk = Desk::new();
    let mut rx = desk.queue.subscribe();
    let recs = desk.admit_all(&["A", "B"]).await;
    desk.queue.delete_one(recs[0].id).await.unwrap();
    desk.queue.delete_one(recs[1].id).await.unwrap();
    desk.clock.advance_secs(30);
    desk.queue.poll();

    let mut resolutions = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let QueueEvent::UndoResolved { resolution, .. } = event {
            resolutions.push(resolution);
        }
    }
    assert_eq!(resolutions, vec![UndoResolution::Superseded, UndoResolution::Expired]);
}
