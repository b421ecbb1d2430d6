//! Integration tests for [`storage::FeedbackRepository`] through the `FeedbackStore` and
//! `ProfileStore` traits.
//!
//! Covers append/list ordering, the duplicate policy, per-user isolation and persistence across
//! reopening an on-disk SQLite database.

use chrono::{Duration, TimeZone, Utc};
use stay_core::{
    FeedbackEvent, FeedbackStore, ListingSnapshot, Polarity, PreferenceProfile, ProfileStore,
    RoomConfig, StayError,
};
use storage::FeedbackRepository;

fn listing(id: &str) -> ListingSnapshot {
    ListingSnapshot::new(id, format!("Flat {}", id), 120.0, "Porto")
        .with_rooms(RoomConfig::new(2, 3, 1))
        .with_amenities(["WiFi", "Kitchen"])
        .with_rating(4.7, 58)
}

/// **Test: Listing a user's feedback returns events oldest first.**
///
/// **Setup:** In-memory DB; append three events with timestamps out of insertion order.
/// **Action:** `list_by_user("u1")`.
/// **Expected:** Events ordered by timestamp ascending, snapshots intact.
#[tokio::test]
async fn test_list_by_user_oldest_first() {
    let repo = FeedbackRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create repository");
    let base = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();

    let late = FeedbackEvent::at("u1", listing("late"), Polarity::Like, base + Duration::hours(2));
    let early = FeedbackEvent::at("u1", listing("early"), Polarity::Dislike, base);
    let middle = FeedbackEvent::at("u1", listing("middle"), Polarity::Like, base + Duration::hours(1));

    for e in [&late, &early, &middle] {
        repo.append(e).await.expect("Failed to append");
    }

    let events = repo.list_by_user("u1").await.expect("Failed to list");
    let ids: Vec<&str> = events.iter().map(|e| e.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "middle", "late"]);
    assert_eq!(events[0], early);
    assert_eq!(events[0].listing.amenities.len(), 2);
}

/// **Test: Listing is restartable.**
///
/// **Setup:** Append two events.
/// **Action:** List twice.
/// **Expected:** Both reads return the same sequence.
#[tokio::test]
async fn test_list_is_restartable() {
    let repo = FeedbackRepository::new("sqlite::memory:").await.unwrap();
    repo.append(&FeedbackEvent::new("u1", listing("a"), Polarity::Like))
        .await
        .unwrap();
    repo.append(&FeedbackEvent::new("u1", listing("b"), Polarity::Dislike))
        .await
        .unwrap();

    let first = repo.list_by_user("u1").await.unwrap();
    let second = repo.list_by_user("u1").await.unwrap();
    assert_eq!(first, second);
}

/// **Test: The same submission twice is rejected.**
///
/// **Setup:** Append an event.
/// **Action:** Append a second event with the same user, listing, polarity and timestamp.
/// **Expected:** `DuplicateFeedback`; the log still holds one event.
#[tokio::test]
async fn test_duplicate_submission_rejected() {
    let repo = FeedbackRepository::new("sqlite::memory:").await.unwrap();
    let ts = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();

    let first = FeedbackEvent::at("u1", listing("a"), Polarity::Like, ts);
    let repeat = FeedbackEvent::at("u1", listing("a"), Polarity::Like, ts);

    repo.append(&first).await.expect("first append");
    let err = repo.append(&repeat).await.unwrap_err();

    assert!(matches!(err, StayError::DuplicateFeedback(_)));
    assert_eq!(repo.count_by_user("u1").await.unwrap(), 1);
}

/// **Test: Same listing and polarity at different times accumulate.**
///
/// **Setup:** Two likes of the same listing one second apart.
/// **Action:** Append both.
/// **Expected:** Both stored.
#[tokio::test]
async fn test_resubmission_at_new_time_accumulates() {
    let repo = FeedbackRepository::new("sqlite::memory:").await.unwrap();
    let ts = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();

    repo.append(&FeedbackEvent::at("u1", listing("a"), Polarity::Like, ts))
        .await
        .unwrap();
    repo.append(&FeedbackEvent::at(
        "u1",
        listing("a"),
        Polarity::Like,
        ts + Duration::seconds(1),
    ))
    .await
    .unwrap();

    assert_eq!(repo.count_by_user("u1").await.unwrap(), 2);
}

/// **Test: Users are isolated.**
///
/// **Setup:** Events for u1 and u2.
/// **Action:** List and count per user.
/// **Expected:** Each user sees only their own events.
#[tokio::test]
async fn test_users_isolated() {
    let repo = FeedbackRepository::new("sqlite::memory:").await.unwrap();
    for i in 0..3 {
        repo.append(&FeedbackEvent::new("u1", listing(&format!("a{}", i)), Polarity::Like))
            .await
            .unwrap();
    }
    repo.append(&FeedbackEvent::new("u2", listing("b"), Polarity::Dislike))
        .await
        .unwrap();

    assert_eq!(repo.count_by_user("u1").await.unwrap(), 3);
    let u2 = repo.list_by_user("u2").await.unwrap();
    assert_eq!(u2.len(), 1);
    assert_eq!(u2[0].user_id, "u2");
    assert!(repo.list_by_user("nobody").await.unwrap().is_empty());
}

/// **Test: Events and profiles survive reopening the database file.**
///
/// **Setup:** On-disk DB in a temp dir; append an event and save a profile.
/// **Action:** Drop the repository and open a new one on the same path.
/// **Expected:** Event and profile are read back unchanged.
#[tokio::test]
async fn test_persists_across_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("data/stay.db");
    let path = db_path.to_str().unwrap().to_string();

    let event = FeedbackEvent::new("u1", listing("a"), Polarity::Like);
    let mut profile = PreferenceProfile::empty();
    profile.feedback_count = 1;
    profile.liked_count = 1;
    profile.learning_progress = 10.0;

    {
        let repo = FeedbackRepository::new(&path).await.expect("open");
        repo.append(&event).await.unwrap();
        repo.save_profile("u1", &profile).await.unwrap();
    }

    let reopened = FeedbackRepository::new(&path).await.expect("reopen");
    assert_eq!(reopened.list_by_user("u1").await.unwrap(), vec![event]);
    assert_eq!(reopened.load_profile("u1").await.unwrap(), Some(profile));
}
