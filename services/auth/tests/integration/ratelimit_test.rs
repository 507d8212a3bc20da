use chrono::Duration;

use handin_auth::error::AuthServiceError;
use handin_auth::usecase::ratelimit::{RateLimitDecision, RateLimiter};

use crate::helpers::{MockAuthCodeRepo, test_code, test_student};

fn limiter(auth_codes: &MockAuthCodeRepo) -> RateLimiter<'_, MockAuthCodeRepo> {
    RateLimiter {
        auth_codes,
        max_requests: 3,
        window: Duration::minutes(10),
        fail_closed: false,
    }
}

#[tokio::test]
async fn should_allow_under_threshold() {
    let student = test_student();
    let repo = MockAuthCodeRepo::new(vec![
        test_code(student.id, "111111", Duration::minutes(5)),
        test_code(student.id, "222222", Duration::minutes(2)),
    ]);

    let decision = limiter(&repo).check(student.id).await.unwrap();
    assert_eq!(decision, RateLimitDecision::Allowed);
}

#[tokio::test]
async fn should_deny_at_threshold() {
    let student = test_student();
    let repo = MockAuthCodeRepo::new(vec![
        test_code(student.id, "111111", Duration::minutes(5)),
        test_code(student.id, "222222", Duration::minutes(3)),
        test_code(student.id, "333333", Duration::minutes(1)),
    ]);

    let decision = limiter(&repo).check(student.id).await.unwrap();
    match decision {
        RateLimitDecision::Denied { retry_after_secs } => {
            // Oldest row is 5 minutes into a 10-minute window.
            assert!(
                (295..=300).contains(&retry_after_secs),
                "expected ~300s, got {retry_after_secs}"
            );
        }
        other => panic!("expected Denied, got {other:?}"),
    }
}

#[tokio::test]
async fn retry_after_shrinks_as_oldest_entry_ages() {
    let student = test_student();

    let early = MockAuthCodeRepo::new(vec![
        test_code(student.id, "111111", Duration::minutes(2)),
        test_code(student.id, "222222", Duration::minutes(1)),
        test_code(student.id, "333333", Duration::seconds(30)),
    ]);
    let late = MockAuthCodeRepo::new(vec![
        test_code(student.id, "111111", Duration::minutes(9)),
        test_code(student.id, "222222", Duration::minutes(1)),
        test_code(student.id, "333333", Duration::seconds(30)),
    ]);

    let retry = |d| match d {
        RateLimitDecision::Denied { retry_after_secs } => retry_after_secs,
        other => panic!("expected Denied, got {other:?}"),
    };

    let retry_early = retry(limiter(&early).check(student.id).await.unwrap());
    let retry_late = retry(limiter(&late).check(student.id).await.unwrap());

    assert!(
        retry_late < retry_early,
        "retry-after must shrink as the window boundary approaches \
         ({retry_late} >= {retry_early})"
    );
}

#[tokio::test]
async fn should_ignore_other_students_and_expired_window_entries() {
    let student = test_student();
    let other = test_student();
    let repo = MockAuthCodeRepo::new(vec![
        test_code(student.id, "111111", Duration::minutes(15)),
        test_code(other.id, "222222", Duration::minutes(1)),
        test_code(other.id, "333333", Duration::minutes(2)),
        test_code(other.id, "444444", Duration::minutes(3)),
    ]);

    let decision = limiter(&repo).check(student.id).await.unwrap();
    assert_eq!(decision, RateLimitDecision::Allowed);
}

#[tokio::test]
async fn should_count_used_codes_toward_the_window() {
    let student = test_student();
    let mut seeded = vec![
        test_code(student.id, "111111", Duration::minutes(5)),
        test_code(student.id, "222222", Duration::minutes(3)),
        test_code(student.id, "333333", Duration::minutes(1)),
    ];
    for code in &mut seeded {
        code.used = true;
    }
    let repo = MockAuthCodeRepo::new(seeded);

    let decision = limiter(&repo).check(student.id).await.unwrap();
    assert!(
        matches!(decision, RateLimitDecision::Denied { .. }),
        "used codes still consume the window, got {decision:?}"
    );
}

#[tokio::test]
async fn should_fail_open_on_store_error() {
    let student = test_student();
    let repo = MockAuthCodeRepo::failing_window_queries();

    let decision = limiter(&repo).check(student.id).await.unwrap();
    assert_eq!(decision, RateLimitDecision::Allowed);
}

#[tokio::test]
async fn should_propagate_store_error_when_fail_closed() {
    let student = test_student();
    let repo = MockAuthCodeRepo::failing_window_queries();

    let mut l = limiter(&repo);
    l.fail_closed = true;

    let result = l.check(student.id).await;
    assert!(
        matches!(result, Err(AuthServiceError::StoreUnavailable(_))),
        "expected StoreUnavailable, got {result:?}"
    );
}
