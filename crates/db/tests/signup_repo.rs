//! Integration tests for signup persistence, ranking, and aggregates.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use waitlist_db::models::signup::{NewSignup, Signup};
use waitlist_db::models::user::CreateUser;
use waitlist_db::models::waitlist::CreateWaitlist;
use waitlist_db::repositories::signup_repo::{UQ_REFERRAL_ID, UQ_WAITLIST_EMAIL};
use waitlist_db::repositories::{SignupRepo, UserRepo, WaitlistRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn waitlist(pool: &PgPool, slug: &str) -> i64 {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            name: None,
            email: format!("{slug}-owner@example.com"),
        },
    )
    .await
    .unwrap();
    WaitlistRepo::create(
        pool,
        owner.id,
        &CreateWaitlist {
            name: slug.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn join(
    pool: &PgPool,
    waitlist_id: i64,
    email: &str,
    referral_id: &str,
    referred_by: Option<&str>,
) -> Signup {
    SignupRepo::create(
        pool,
        &NewSignup {
            waitlist_id,
            email: email.to_string(),
            name: None,
            referral_id: referral_id.to_string(),
            referred_by: referred_by.map(str::to_string),
        },
    )
    .await
    .unwrap()
}

async fn backdate(pool: &PgPool, signup_id: i64, at: chrono::DateTime<Utc>) {
    sqlx::query("UPDATE signups SET created_at = $2 WHERE id = $1")
        .bind(signup_id)
        .bind(at)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn nth_signup_gets_position_n(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    for n in 1..=4_i64 {
        let signup = join(&pool, wl, &format!("u{n}@x.com"), &format!("tok0000{n}"), None).await;
        assert_eq!(SignupRepo::position(&pool, &signup).await.unwrap(), n);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn equal_timestamps_get_distinct_positions(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    let a = join(&pool, wl, "a@x.com", "tokaaaaa", None).await;
    let b = join(&pool, wl, "b@x.com", "tokbbbbb", None).await;
    let at = Utc::now() - Duration::hours(1);
    backdate(&pool, a.id, at).await;
    backdate(&pool, b.id, at).await;

    let signups = SignupRepo::list_for_waitlist(&pool, wl).await.unwrap();
    let mut positions = Vec::new();
    for s in &signups {
        positions.push(SignupRepo::position(&pool, s).await.unwrap());
    }
    positions.sort_unstable();
    assert_eq!(positions, vec![1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn positions_are_scoped_per_waitlist(pool: PgPool) {
    let one = waitlist(&pool, "one").await;
    let two = waitlist(&pool, "two").await;
    join(&pool, one, "a@x.com", "tok00001", None).await;
    let first_in_two = join(&pool, two, "a@x.com", "tok00002", None).await;
    assert_eq!(SignupRepo::position(&pool, &first_in_two).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_waitlist_email_constraint(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    join(&pool, wl, "a@x.com", "tok00001", None).await;
    assert!(SignupRepo::exists(&pool, wl, "a@x.com").await.unwrap());

    let err = SignupRepo::create(
        &pool,
        &NewSignup {
            waitlist_id: wl,
            email: "a@x.com".into(),
            name: None,
            referral_id: "tok00002".into(),
            referred_by: None,
        },
    )
    .await
    .unwrap_err();
    assert!(waitlist_db::is_unique_violation(&err, UQ_WAITLIST_EMAIL));
    assert_eq!(SignupRepo::count_for_waitlist(&pool, wl).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_referral_id_violates_token_constraint(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    join(&pool, wl, "a@x.com", "tok00001", None).await;

    let err = SignupRepo::create(
        &pool,
        &NewSignup {
            waitlist_id: wl,
            email: "b@x.com".into(),
            name: None,
            referral_id: "tok00001".into(),
            referred_by: None,
        },
    )
    .await
    .unwrap_err();
    assert!(waitlist_db::is_unique_violation(&err, UQ_REFERRAL_ID));
    assert!(!waitlist_db::is_unique_violation(&err, UQ_WAITLIST_EMAIL));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_email_may_join_different_waitlists(pool: PgPool) {
    let one = waitlist(&pool, "one").await;
    let two = waitlist(&pool, "two").await;
    join(&pool, one, "a@x.com", "tok00001", None).await;
    join(&pool, two, "a@x.com", "tok00002", None).await;
    assert!(SignupRepo::exists(&pool, two, "a@x.com").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn referral_counts_group_by_token(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    join(&pool, wl, "a@x.com", "tokaaaaa", None).await;
    join(&pool, wl, "b@x.com", "tokbbbbb", Some("tokaaaaa")).await;
    join(&pool, wl, "c@x.com", "tokccccc", Some("tokaaaaa")).await;
    join(&pool, wl, "d@x.com", "tokddddd", Some("tokbbbbb")).await;
    join(&pool, wl, "e@x.com", "tokeeeee", Some("dangling")).await;

    let counts = SignupRepo::referral_counts(&pool, wl).await.unwrap();
    let lookup = |token: &str| {
        counts
            .iter()
            .find(|r| r.referred_by == token)
            .map(|r| r.referral_count)
    };
    assert_eq!(lookup("tokaaaaa"), Some(2));
    assert_eq!(lookup("tokbbbbb"), Some(1));
    assert_eq!(lookup("dangling"), Some(1));
    assert_eq!(lookup("tokccccc"), None);

    assert_eq!(
        SignupRepo::referral_count_for(&pool, wl, "tokaaaaa")
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        SignupRepo::referral_count_for(&pool, wl, "tokeeeee")
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_referral_id_is_scoped_to_waitlist(pool: PgPool) {
    let one = waitlist(&pool, "one").await;
    let two = waitlist(&pool, "two").await;
    join(&pool, one, "a@x.com", "tok00001", None).await;

    assert!(SignupRepo::find_by_referral_id(&pool, one, "tok00001")
        .await
        .unwrap()
        .is_some());
    assert!(SignupRepo::find_by_referral_id(&pool, two, "tok00001")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn time_window_counts(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    let now = Utc::now();
    let old = join(&pool, wl, "old@x.com", "tok00001", None).await;
    let prev = join(&pool, wl, "prev@x.com", "tok00002", None).await;
    join(&pool, wl, "new@x.com", "tok00003", None).await;
    backdate(&pool, old.id, now - Duration::days(40)).await;
    backdate(&pool, prev.id, now - Duration::days(10)).await;

    let week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);
    assert_eq!(
        SignupRepo::count_created_before(&pool, wl, now - Duration::days(30))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        SignupRepo::count_created_between(&pool, wl, week_ago, None)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        SignupRepo::count_created_between(&pool, wl, two_weeks_ago, Some(week_ago))
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_counts_bucket_by_utc_day(pool: PgPool) {
    let wl = waitlist(&pool, "acme").await;
    let day = (Utc::now() - Duration::days(3)).date_naive();
    let noon = day.and_hms_opt(12, 0, 0).unwrap().and_utc();

    let a = join(&pool, wl, "a@x.com", "tok00001", None).await;
    let b = join(&pool, wl, "b@x.com", "tok00002", None).await;
    backdate(&pool, a.id, noon).await;
    backdate(&pool, b.id, noon + Duration::hours(11)).await;
    join(&pool, wl, "c@x.com", "tok00003", None).await;

    let counts = SignupRepo::daily_counts(&pool, wl, noon - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].day, day);
    assert_eq!(counts[0].signup_count, 2);
    assert_eq!(counts[1].signup_count, 1);
}
