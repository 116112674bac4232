use quiz_core::model::{AchievementKind, Difficulty, TopicId};
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, DifficultySource};
use storage::repository::Storage;

#[tokio::test]
async fn quiz_flow_promotes_after_two_strong_quizzes() {
    let services =
        AppServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()), None).unwrap();
    let topic = TopicId::new("42").unwrap();

    let start = services
        .difficulty_filter()
        .resolve(None, &topic)
        .await
        .unwrap();
    assert_eq!(start.difficulty, Difficulty::Beginner);
    assert_eq!(start.source, DifficultySource::Local);

    let first = services
        .quiz_completion()
        .complete(&topic, start.difficulty, 96.0, 20)
        .await
        .unwrap();
    assert!(first.passed);
    assert_eq!(first.next_difficulty, Difficulty::Beginner);
    let kinds: Vec<_> = first.unlocked.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AchievementKind::Score, AchievementKind::Speed]);

    let second = services
        .quiz_completion()
        .complete(&topic, Difficulty::Beginner, 92.0, 5)
        .await
        .unwrap();
    assert_eq!(second.performance.attempts(), 2);
    assert!((second.performance.average_score() - 94.0).abs() < 1e-9);
    assert_eq!(second.next_difficulty, Difficulty::Intermediate);
    assert!(second.unlocked.is_empty());

    let next = services
        .difficulty_filter()
        .resolve(None, &topic)
        .await
        .unwrap();
    assert_eq!(next.difficulty, Difficulty::Intermediate);
}

#[tokio::test]
async fn quiz_flow_demotes_after_weak_advanced_quizzes() {
    let services =
        AppServices::from_storage(&Storage::in_memory(), Clock::default(), None).unwrap();
    let topic = TopicId::new("macros").unwrap();
    let completion = services.quiz_completion();

    let mut outcome = None;
    for score in [50.0, 30.0, 40.0, 45.0, 35.0] {
        outcome = Some(
            completion
                .complete(&topic, Difficulty::Advanced, score, 0)
                .await
                .unwrap(),
        );
    }
    let outcome = outcome.unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.progress.streak(), 0);
    assert_eq!(outcome.progress.total_quizzes(), 5);
    assert_eq!(outcome.next_difficulty, Difficulty::Intermediate);
}

#[tokio::test]
async fn sqlite_backed_services_persist_between_instances() {
    let url = "sqlite:file:memdb_services_persist?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("storage");
    let topic = TopicId::new("7").unwrap();

    let services = AppServices::from_storage(&storage, Clock::default(), None).unwrap();
    for _ in 0..3 {
        services
            .tracker()
            .record_attempt(&topic, 75.0, Difficulty::Intermediate)
            .await
            .unwrap();
    }

    let again = AppServices::from_storage(&storage, Clock::default(), None).unwrap();
    let perf = again
        .tracker()
        .current_performance(&topic)
        .await
        .unwrap()
        .expect("persisted record");
    assert_eq!(perf.attempts(), 3);
    assert_eq!(
        again.tracker().recommend_difficulty(&topic).await.unwrap(),
        Difficulty::Intermediate
    );
}
