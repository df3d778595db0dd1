use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::{Value, json};

pub const USERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

pub const LABELS: [&str; 6] = ["bug", "enhancement", "wontfix", "fixed", "ui", "duplicate"];

pub const RAW_KINDS: [&str; 6] = [
    "closed",
    "reopened",
    "labeled",
    "unlabeled",
    "mentioned",
    "subscribed",
];

/// GH-wrapper timestamp `minutes` after 2020-01-01, or `null`.
pub fn wrapper_time(minutes: Option<i64>) -> Value {
    let Some(minutes) = minutes else {
        return Value::Null;
    };
    let base = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base date");
    json!((base + Duration::minutes(minutes))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string())
}

/// Mostly a known user, sometimes `null`.
pub fn arb_user() -> impl Strategy<Value = Value> + Clone {
    prop_oneof![
        4 => prop::sample::select(USERS.to_vec()).prop_map(|u| json!({ "username": u })),
        1 => Just(Value::Null),
    ]
}

/// Minutes after creation; coarse so collisions are frequent.
pub fn arb_offset() -> impl Strategy<Value = Option<i64>> + Clone {
    prop_oneof![
        9 => (1i64..30).prop_map(Some),
        1 => Just(None),
    ]
}

pub fn arb_comment() -> impl Strategy<Value = Value> + Clone {
    (0u32..10_000, arb_user(), arb_offset()).prop_map(|(id, user, offset)| {
        json!({
            "id": id,
            "user": user,
            "created_at": wrapper_time(offset),
            "body": "same text every time",
        })
    })
}

pub fn arb_event() -> impl Strategy<Value = Value> + Clone {
    (
        prop::sample::select(RAW_KINDS.to_vec()),
        arb_user(),
        arb_offset(),
        prop::sample::select(LABELS.to_vec()),
    )
        .prop_map(|(kind, user, offset, label)| {
            let mut event = json!({
                "event": kind,
                "user": user,
                "created_at": wrapper_time(offset),
            });
            if kind == "labeled" || kind == "unlabeled" {
                event["label"] = json!({ "name": label });
            }
            event
        })
}

/// A GitHub issue with an attributed creation and random activity.
pub fn arb_github_issue() -> impl Strategy<Value = Value> + Clone {
    (
        1u64..10_000,
        prop::sample::select(USERS.to_vec()),
        prop::collection::vec(arb_comment(), 0..8),
        prop::collection::vec(arb_event(), 0..12),
    )
        .prop_map(|(number, author, comments, events)| {
            json!({
                "number": number,
                "title": "generated",
                "created_at": wrapper_time(Some(0)),
                "user": { "username": author },
                "isPullRequest": false,
                "commentsList": comments,
                "eventsList": events,
            })
        })
}
