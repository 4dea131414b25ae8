use flipbook_core::flip::{FLIPPED_ANGLE, FLAT_ANGLE};
use flipbook_core::page::pages_from_sources;
use flipbook_core::{
    BookSource, BookmarkStore, FileBookmarkStore, FlipDriver, MemoryBookmarkStore, NavAction,
    ReaderSession, SessionEffect,
};
use std::time::{Duration, Instant};

fn five_page_book() -> BookSource {
    BookSource {
        key: "/library/five.pdf".to_string(),
        title: "Five".to_string(),
        pages: pages_from_sources((0..5).map(|i| format!("page-{i}.png"))),
    }
}

#[test]
fn five_page_book_walkthrough() {
    let mut session = ReaderSession::new(Box::new(MemoryBookmarkStore::new()));
    session.load_book(five_page_book()).expect("load book");

    let sheets = session.sheets();
    assert_eq!(sheets.len(), 3);
    assert_eq!(sheets[2].back.index, -1);
    assert_eq!(session.current_position(), 0);

    session.dispatch(NavAction::Next);
    assert_eq!(session.current_position(), 2);
    session.dispatch(NavAction::Next);
    assert_eq!(session.current_position(), 4);
    assert!(session.dispatch(NavAction::Next).is_empty());
    assert_eq!(session.current_position(), 4);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.page_label, "5 / 5");
    assert!(!snapshot.can_next);
    let angles: Vec<f32> = snapshot.sheets.iter().map(|s| s.target_angle).collect();
    assert_eq!(angles, vec![FLIPPED_ANGLE, FLIPPED_ANGLE, FLAT_ANGLE]);
}

#[test]
fn resize_burst_settles_once_at_narrow_scale() {
    let start = Instant::now();
    let mut session = ReaderSession::new(Box::new(MemoryBookmarkStore::new()));
    session.load_book(five_page_book()).expect("load book");
    session.dispatch(NavAction::Next);

    let mut fired = 0;
    for (offset, width) in [(0, 1200.0), (30, 1000.0), (60, 760.0), (100, 500.0)] {
        let now = start + Duration::from_millis(offset);
        session.on_viewport_resize(width, now);
        fired += session.poll_deferred(now).len();
    }
    assert_eq!(fired, 0);

    let mut effects = Vec::new();
    for tick in 0..20 {
        effects.extend(session.poll_deferred(start + Duration::from_millis(100 + tick * 50)));
    }
    assert_eq!(effects, vec![SessionEffect::ScaleChanged { scale: 0.6 }]);
    assert_eq!(session.navigation().scale(), 0.6);
    assert_eq!(session.current_position(), 2);
}

#[test]
fn teardown_prevents_late_resize() {
    let start = Instant::now();
    let mut session = ReaderSession::new(Box::new(MemoryBookmarkStore::new()));
    session.on_viewport_resize(400.0, start);
    session.teardown();
    session.teardown();
    assert!(session
        .poll_deferred(start + Duration::from_secs(1))
        .is_empty());
    assert_eq!(session.navigation().scale(), 1.0);
}

#[test]
fn bookmarks_survive_reopening_with_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let mut session = ReaderSession::new(Box::new(FileBookmarkStore::new(dir.path())));
        session.load_book(five_page_book()).expect("load book");
        session.dispatch(NavAction::JumpTo(3));
        session.dispatch(NavAction::ToggleBookmarkCurrent);
    }

    let store = FileBookmarkStore::new(dir.path());
    assert_eq!(
        store.load("/library/five.pdf").expect("load").into_iter().collect::<Vec<_>>(),
        vec![2]
    );

    let mut session = ReaderSession::new(Box::new(store));
    session.load_book(five_page_book()).expect("reload book");
    assert_eq!(session.bookmarks().list(), vec![2]);
}

#[test]
fn flip_driver_follows_session_position() {
    let start = Instant::now();
    let mut session = ReaderSession::new(Box::new(MemoryBookmarkStore::new()));
    session.load_book(five_page_book()).expect("load book");
    let mut driver = FlipDriver::default();
    driver.reset(session.total_sheets(), session.current_sheet(), start);

    session.dispatch(NavAction::JumpTo(4));
    driver.retarget(session.total_sheets(), session.current_sheet(), start);
    assert!(driver.is_animating(start + Duration::from_millis(100)));

    // A reverse jump mid-flight is honored immediately.
    let mid = start + Duration::from_millis(200);
    session.dispatch(NavAction::Prev);
    driver.retarget(session.total_sheets(), session.current_sheet(), mid);
    let settled = driver.poses(session.current_sheet(), mid + Duration::from_secs(1));
    let angles: Vec<f32> = settled.iter().map(|pose| pose.angle).collect();
    assert_eq!(angles, vec![FLIPPED_ANGLE, FLAT_ANGLE, FLAT_ANGLE]);
}
