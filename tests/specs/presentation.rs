//! Display helper specs: day window, search and grouping

use crate::prelude::*;
use fd_core::{group_by_day, search};

/// 2026-03-01T20:00:00Z, 23:00 the previous evening at the clinic
const LAST_NIGHT_MS: u64 = 1_772_395_200_000;

#[tokio::test]
async fn clinic_day_hides_last_nights_patients() {
    let mut desk = Desk::new();
    let today_ms = desk.clock.epoch_ms();

    desk.clock.set_epoch_ms(LAST_NIGHT_MS);
    desk.admit("Late arrival").await;
    desk.clock.set_epoch_ms(today_ms);
    desk.admit("Morning patient").await;

    let records = desk.queue.list();
    let today: Vec<&str> = desk
        .queue
        .config()
        .view_window()
        .apply(&records, desk.clock.utc_now())
        .unwrap()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(today, vec!["Morning patient"]);

    // Still within the rolling 24 hours
    assert_eq!(Window::Last24Hours.apply(&records, desk.clock.utc_now()).unwrap().len(), 2);
}

#[tokio::test]
async fn search_matches_services_and_names() {
    let mut desk = Desk::new();
    desk.queue.add("Amina", Stage::Raajo, services(&[Service::Dhaqid])).await.unwrap();
    desk.queue.add("Bashir", Stage::Cusub, services(&[Service::Gelin])).await.unwrap();

    let records = desk.queue.list();
    assert_eq!(search(&records, "dhaq").len(), 1);
    assert_eq!(search(&records, "bash")[0].ticket, 2);
    assert_eq!(search(&records, "").len(), 2);
}

#[tokio::test]
async fn history_groups_by_clinic_date() {
    let mut desk = Desk::new();
    let today_ms = desk.clock.epoch_ms();
    desk.clock.set_epoch_ms(LAST_NIGHT_MS);
    desk.admit("Late arrival").await;
    desk.clock.set_epoch_ms(today_ms);
    desk.admit_all(&["Morning one", "Morning two"]).await;

    let groups = group_by_day(&desk.queue.list(), 3).unwrap();
    let sizes: Vec<(String, usize)> =
        groups.iter().map(|(day, recs)| (day.to_string(), recs.len())).collect();
    assert_eq!(sizes, vec![("2026-03-01".to_string(), 1), ("2026-03-02".to_string(), 2)]);
}

#[test]
fn a_window_with_an_impossible_offset_is_refused() {
    let window = Window::SinceLocalMidnight { utc_offset_hours: 20 };
    let err = window.apply(&[], FakeClock::new().utc_now()).unwrap_err();
    assert_eq!(err.to_string(), "utc offset 20 outside -12..=14");
}
