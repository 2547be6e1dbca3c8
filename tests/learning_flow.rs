//! End-to-end learner flow through the composed core.
//!
//! 1. A learner signs up and the session becomes `Authenticated`
//! 2. The learner enrolls and completes lessons; progress, XP and
//!    achievements move together
//! 3. Events reach subscribers on the bus after each commit
//! 4. Logout while a login is pending never resurrects the session
//!
//! Uses the in-memory adapters so no external services are needed.

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use academy_core::adapters::{
    InMemoryCourseCatalog, InMemoryEventBus, InMemoryLearnerRepository, MockIdentityProvider,
};
use academy_core::application::{Academy, AcademyPorts};
use academy_core::config::AppConfig;
use academy_core::domain::catalog::{Course, Difficulty, Lesson, LessonKind};
use academy_core::domain::foundation::{
    AchievementId, CourseId, DomainError, EventEnvelope, LessonId, SessionStatus, UserId,
};
use academy_core::domain::progress::{AchievementEarned, ProgressError};
use academy_core::domain::session::{AuthError, Session, SessionChange};
use academy_core::ports::{EventHandler, EventSubscriber, IdentityChange};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    academy: Academy,
    identity: Arc<MockIdentityProvider>,
    bus: Arc<InMemoryEventBus>,
}

fn secret(s: &str) -> SecretString {
    SecretString::new(s.to_string())
}

fn course(id: &str, kinds: &[LessonKind]) -> Course {
    let lessons = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            Lesson::new(
                LessonId::new(format!("{}-{}", id, i + 1)).unwrap(),
                format!("Lesson {}", i + 1),
                *kind,
                15,
            )
        })
        .collect();
    Course::new(CourseId::new(id).unwrap(), id, "3D Design", Difficulty::Beginner, lessons).unwrap()
}

fn harness_with(identity: MockIdentityProvider) -> Harness {
    let identity = Arc::new(identity);
    let bus = Arc::new(InMemoryEventBus::new());
    let catalog = InMemoryCourseCatalog::from_courses(vec![
        course(
            "modeling",
            &[
                LessonKind::Video,
                LessonKind::Interactive3D,
                LessonKind::Quiz,
                LessonKind::Interactive3D,
            ],
        ),
        course("lighting", &[LessonKind::Video, LessonKind::Video]),
    ])
    .unwrap();

    let academy = Academy::new(
        &AppConfig::default(),
        AcademyPorts {
            identity: identity.clone(),
            catalog: Arc::new(catalog),
            learners: Arc::new(InMemoryLearnerRepository::new()),
            events: bus.clone(),
        },
    )
    .unwrap();

    Harness {
        academy,
        identity,
        bus,
    }
}

fn harness() -> Harness {
    harness_with(MockIdentityProvider::new())
}

fn lesson(course: &str, n: usize) -> LessonId {
    LessonId::new(format!("{}-{}", course, n)).unwrap()
}

fn achievement(id: &str) -> AchievementId {
    AchievementId::new(id).unwrap()
}

async fn sign_up(h: &Harness) -> UserId {
    let session = h
        .academy
        .sessions()
        .signup("ada@example.com", secret("hunter22"))
        .await
        .unwrap();
    session.identity().unwrap().id.clone()
}

/// Collects achievement ids announced on the bus.
struct AchievementToasts {
    seen: Mutex<Vec<AchievementId>>,
    calls: AtomicUsize,
}

#[async_trait]
impl EventHandler for AchievementToasts {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(earned) = event.payload_as::<AchievementEarned>() {
            self.seen.lock().unwrap().push(earned.achievement_id);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "AchievementToasts"
    }
}

// =============================================================================
// Learning flow
// =============================================================================

#[tokio::test]
async fn three_of_four_lessons_then_course_master() {
    let h = harness();
    let toasts = Arc::new(AchievementToasts {
        seen: Mutex::new(Vec::new()),
        calls: AtomicUsize::new(0),
    });
    h.bus.subscribe("achievement.earned.v1", toasts.clone());

    let learner = sign_up(&h).await;
    let modeling = CourseId::new("modeling").unwrap();
    let progress = h.academy.progress();

    progress.enroll(&learner, &modeling).await.unwrap();
    for n in 1..=3 {
        progress
            .complete_lesson(&learner, &modeling, &lesson("modeling", n))
            .await
            .unwrap();
    }
    assert_eq!(progress.progress_of(&learner, &modeling).await.unwrap().value(), 75);

    let last = progress
        .complete_lesson(&learner, &modeling, &lesson("modeling", 4))
        .await
        .unwrap();

    assert_eq!(last.progress().value(), 100);
    assert!(last.event.as_ref().unwrap().course_completed);
    assert_eq!(last.unlocked, vec![achievement("course-master")]);

    // 100 + 150 + 125 + 150
    let level = h.academy.leveling().level_of(&learner).await.unwrap();
    assert_eq!(level.level, 2);
    assert_eq!(level.xp_into_level, 25);

    let statuses = h.academy.achievements().achievements(&learner).await.unwrap();
    let earned: Vec<_> = statuses
        .iter()
        .filter(|s| s.is_earned())
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(earned, vec![achievement("first-steps"), achievement("course-master")]);

    assert_eq!(
        *toasts.seen.lock().unwrap(),
        vec![achievement("first-steps"), achievement("course-master")]
    );
    assert_eq!(h.bus.events_of_type("lesson.completed.v1").len(), 4);
}

#[tokio::test]
async fn completing_twice_changes_nothing() {
    let h = harness();
    let learner = sign_up(&h).await;
    let lighting = CourseId::new("lighting").unwrap();
    let progress = h.academy.progress();
    progress.enroll(&learner, &lighting).await.unwrap();

    progress
        .complete_lesson(&learner, &lighting, &lesson("lighting", 1))
        .await
        .unwrap();
    let events = h.bus.event_count();
    let again = progress
        .complete_lesson(&learner, &lighting, &lesson("lighting", 1))
        .await
        .unwrap();

    assert!(!again.changed());
    assert_eq!(again.progress().value(), 50);
    assert_eq!(h.bus.event_count(), events);
    assert_eq!(h.academy.leveling().level_of(&learner).await.unwrap().xp_into_level, 100);
}

#[tokio::test]
async fn achievements_are_never_revoked_by_re_evaluation() {
    let h = harness();
    let learner = sign_up(&h).await;
    let lighting = CourseId::new("lighting").unwrap();
    let progress = h.academy.progress();
    progress.enroll(&learner, &lighting).await.unwrap();
    progress
        .complete_lesson(&learner, &lighting, &lesson("lighting", 1))
        .await
        .unwrap();

    let before = h.academy.achievements().achievements(&learner).await.unwrap();
    assert!(h.academy.achievements().evaluate(&learner).await.unwrap().is_empty());
    let after = h.academy.achievements().achievements(&learner).await.unwrap();

    assert_eq!(before, after);
}

#[tokio::test]
async fn direct_xp_award_then_evaluate_unlocks_rising_star() {
    let h = harness();
    let learner = sign_up(&h).await;

    let update = h.academy.leveling().award_xp(&learner, 2000).await.unwrap();
    assert_eq!(update.state.level, 5);
    assert_eq!(update.levels_gained(), 4);

    let unlocked = h.academy.achievements().evaluate(&learner).await.unwrap();
    assert_eq!(unlocked, vec![achievement("rising-star")]);
}

#[tokio::test]
async fn progress_errors_are_typed() {
    let h = harness();
    let learner = sign_up(&h).await;
    let modeling = CourseId::new("modeling").unwrap();
    let progress = h.academy.progress();

    let err = progress
        .complete_lesson(&learner, &modeling, &lesson("modeling", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::NotEnrolled { .. }));

    progress.enroll(&learner, &modeling).await.unwrap();
    let err = progress
        .complete_lesson(&learner, &modeling, &lesson("lighting", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::UnknownLesson { .. }));

    let err = progress
        .enroll(&learner, &CourseId::new("sculpting").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::CourseNotFound(_)));
}

// =============================================================================
// Session flow
// =============================================================================

#[tokio::test]
async fn login_never_returns_intermediate_state() {
    let h = harness_with(MockIdentityProvider::new().with_account("ada@example.com", "hunter22", None));
    let sessions = h.academy.sessions();

    let ok = sessions.login("ada@example.com", secret("hunter22")).await.unwrap();
    assert_eq!(ok.status(), SessionStatus::Authenticated);

    sessions.logout().await.unwrap();
    let err = sessions.login("ada@example.com", secret("nope")).await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(sessions.session().status(), SessionStatus::AuthFailed);
}

#[tokio::test]
async fn observer_reading_session_during_signup_sees_identity() {
    let h = harness();
    let sessions = h.academy.sessions().clone();
    let reads = Arc::new(Mutex::new(Vec::<Session>::new()));
    let sink = reads.clone();
    let weak = Arc::downgrade(&sessions);
    sessions.subscribe(Arc::new(move |_: &SessionChange| {
        if let Some(sessions) = weak.upgrade() {
            sink.lock().unwrap().push(sessions.session());
        }
    }));

    let session = sessions.signup("ada@example.com", secret("hunter22")).await.unwrap();

    let reads = reads.lock().unwrap();
    let last = reads.last().unwrap();
    assert_eq!(last.status(), SessionStatus::Authenticated);
    assert_eq!(last.identity(), session.identity());
    assert_eq!(last.identity().unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn weak_password_signup_skips_provider() {
    let h = harness();

    let err = h
        .academy
        .sessions()
        .signup("ada@example.com", secret("abc"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::WeakPassword);
    assert_eq!(h.identity.register_calls(), 0);
}

#[tokio::test]
async fn logout_during_pending_login_never_resurrects_session() {
    let h = harness_with(
        MockIdentityProvider::new()
            .with_account("ada@example.com", "hunter22", None)
            .with_gate(),
    );
    let sessions = h.academy.sessions().clone();
    let changes = Arc::new(Mutex::new(Vec::<SessionChange>::new()));
    let sink = changes.clone();
    sessions.subscribe(Arc::new(move |change: &SessionChange| {
        sink.lock().unwrap().push(change.clone());
    }));

    let pending = {
        let sessions = sessions.clone();
        tokio::spawn(async move { sessions.login("ada@example.com", secret("hunter22")).await })
    };
    while h.identity.authenticate_calls() == 0 {
        tokio::task::yield_now().await;
    }

    sessions.logout().await.unwrap();
    h.identity.release(1);

    assert_eq!(pending.await.unwrap().unwrap_err(), AuthError::Superseded);
    assert_eq!(sessions.session(), Session::unauthenticated());
    assert!(changes
        .lock()
        .unwrap()
        .iter()
        .all(|c| c.session().status() != SessionStatus::Authenticated));
}

#[tokio::test]
async fn provider_sign_out_reaches_observers() {
    let h = harness_with(MockIdentityProvider::new().with_account("ada@example.com", "hunter22", None));
    let sessions = h.academy.sessions().clone();
    sessions.login("ada@example.com", secret("hunter22")).await.unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    sessions.subscribe(Arc::new(move |change: &SessionChange| {
        let _ = tx.send(change.clone());
    }));
    let listener = sessions.spawn_identity_listener();

    h.identity.push(IdentityChange::SignedOut);

    let change = rx.recv().await.unwrap();
    assert!(change.is_reset());
    assert!(!sessions.session().is_authenticated());
    listener.abort();
}
