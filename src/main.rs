//! Demo composition root.
//!
//! Loads configuration, installs tracing, seeds an in-memory catalog and
//! walks a new learner through a course.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{error, info};

use academy_core::adapters::{
    InMemoryCourseCatalog, InMemoryEventBus, InMemoryLearnerRepository, MockIdentityProvider,
};
use academy_core::application::{Academy, AcademyPorts};
use academy_core::config::AppConfig;
use academy_core::domain::catalog::{Course, Difficulty, Lesson, LessonKind};
use academy_core::domain::foundation::{CourseId, LessonId, ValidationError};
use academy_core::telemetry;

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

fn modeling_course() -> Result<Course, ValidationError> {
    let lessons = [
        ("1", "Introduction to 3D Space", LessonKind::Video, 15),
        ("2", "Basic Shapes and Primitives", LessonKind::Interactive3D, 20),
        ("3", "Understanding Coordinates", LessonKind::Quiz, 10),
        ("4", "Modeling Your First Object", LessonKind::Interactive3D, 30),
        ("5", "Textures and Materials", LessonKind::Video, 25),
        ("6", "Lighting Fundamentals", LessonKind::Interactive3D, 20),
        ("7", "Final Project", LessonKind::Interactive3D, 45),
    ]
    .into_iter()
    .map(|(id, title, kind, minutes)| Ok(Lesson::new(LessonId::new(id)?, title, kind, minutes)))
    .collect::<Result<Vec<_>, ValidationError>>()?;

    Course::new(
        CourseId::new("3d-modeling-fundamentals")?,
        "3D Modeling Fundamentals",
        "3D Design",
        Difficulty::Beginner,
        lessons,
    )
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init(&config.logging) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    if let Err(e) = run(config).await {
        error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> DemoResult<()> {
    let course = modeling_course()?;
    let course_id = course.id().clone();
    let lesson_ids: Vec<LessonId> = course.lessons().iter().map(|l| l.id().clone()).collect();

    let identity = Arc::new(MockIdentityProvider::new());
    let events = Arc::new(InMemoryEventBus::new());
    let academy = Academy::new(
        &config,
        AcademyPorts {
            identity: identity.clone(),
            catalog: Arc::new(InMemoryCourseCatalog::from_courses(vec![course])?),
            learners: Arc::new(InMemoryLearnerRepository::new()),
            events: events.clone(),
        },
    )?;
    let listener = academy.sessions().spawn_identity_listener();

    let session = academy
        .sessions()
        .signup("learner@academy.dev", SecretString::new("sphere-cube-42".to_string()))
        .await?;
    let learner = match session.identity() {
        Some(identity) => identity.clone(),
        None => return Err("signup returned no identity".into()),
    };
    info!("Welcome, {}", learner.greeting_name());

    academy.progress().enroll(&learner.id, &course_id).await?;
    for lesson_id in &lesson_ids {
        let done = academy
            .progress()
            .complete_lesson(&learner.id, &course_id, lesson_id)
            .await?;
        if let Some(level) = done.level {
            info!(
                lesson = %lesson_id,
                progress = %done.progress(),
                xp = level.total_xp,
                level = level.state.level,
                leveled_up = level.leveled_up(),
                "lesson finished"
            );
        }
        for achievement in &done.unlocked {
            info!(%achievement, "achievement unlocked");
        }
    }

    let summary = academy.progress().dashboard(&learner.id).await?;
    info!(
        courses = summary.enrolled_courses,
        completed = summary.completed_courses,
        lessons = summary.lessons_completed,
        minutes = summary.minutes_studied,
        xp = summary.total_xp,
        level = summary.level.level,
        "dashboard"
    );
    for status in academy.achievements().achievements(&learner.id).await? {
        info!(
            achievement = %status.id,
            earned = status.is_earned(),
            "{}",
            status.title
        );
    }

    academy.sessions().logout().await?;
    info!(
        events = events.event_count(),
        status = %academy.sessions().session().status(),
        "signed out"
    );

    listener.abort();
    Ok(())
}
