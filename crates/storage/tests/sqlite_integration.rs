use quiz_core::model::{
    AchievementKind, Difficulty, TopicId, TopicPerformance, UnlockedAchievement, UserProgress,
};
use quiz_core::time::fixed_now;
use storage::repository::{PerformanceRepository, ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

fn topic(raw: &str) -> TopicId {
    TopicId::new(raw).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_topic_performance() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_perf_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get_performance(&topic("12")).await.unwrap().is_none());

    let perf = TopicPerformance::empty(Difficulty::Beginner)
        .recorded(95.0, Difficulty::Beginner)
        .recorded(91.0, Difficulty::Intermediate);
    repo.put_performance(&topic("12"), &perf).await.unwrap();

    let fetched = repo
        .get_performance(&topic("12"))
        .await
        .unwrap()
        .expect("record");
    assert_eq!(fetched.attempts(), 2);
    assert_eq!(fetched.last_difficulty(), Difficulty::Intermediate);
    assert!((fetched.average_score() - 93.0).abs() < 1e-9);
}

#[tokio::test]
async fn sqlite_stores_table_as_single_camel_case_blob() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_perf_blob?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let perf = TopicPerformance::from_persisted(4, 80.0, Difficulty::Advanced);
    repo.put_performance(&topic("a"), &perf).await.unwrap();
    repo.put_performance(&topic("b"), &perf).await.unwrap();

    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM kv_store")
        .fetch_all(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "topicPerformance");
    assert!(rows[0].1.contains(r#""averageScore":80.0"#));
    assert!(rows[0].1.contains(r#""lastDifficulty":"advanced""#));

    let listed = repo.list_performance().await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_progress_roundtrip() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("storage");

    assert!(storage.progress.get_progress().await.unwrap().is_none());

    let mut progress = UserProgress::default().after_quiz(92.0);
    progress.unlock(UnlockedAchievement::new(AchievementKind::Score, fixed_now()));
    storage.progress.save_progress(&progress).await.unwrap();

    let fetched = storage.progress.get_progress().await.unwrap().expect("progress");
    assert_eq!(fetched, progress);
}
