use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use smart_todo::db::models::NewTask;
use smart_todo::db::{create_pool, run_migrations};
use smart_todo::suggestions::{build_prompt, parse_suggestions};
use smart_todo::tasks::TaskManager;
use std::hint::black_box;
use tempfile::TempDir;
use tokio::runtime::Runtime;

async fn setup_test_db() -> (TempDir, sqlx::SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("bench.db");
    let pool = create_pool(&db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();
    (temp_dir, pool)
}

fn titles(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Task number {}", i)).collect()
}

fn contexts(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| ("email".to_string(), format!("Reminder {} about the Friday deadline", i)))
        .collect()
}

/// A reply with one suggestion per title, fenced the way models often return it
fn reply_for(titles: &[String]) -> String {
    let entries: Vec<String> = titles
        .iter()
        .map(|t| {
            format!(
                r#""{}": {{"priority_score": 0.5, "suggested_deadline": "2025-08-15", "enhanced_description": "Details for {}", "suggested_category": "Work"}}"#,
                t, t
            )
        })
        .collect();
    format!("```json\n{{{}}}\n```", entries.join(",\n"))
}

fn bench_build_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_prompt");

    for size in [10, 100, 1000].iter() {
        let tasks = titles(*size);
        let ctxs = contexts(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(build_prompt(&ctxs, &tasks)));
        });
    }

    group.finish();
}

fn bench_parse_suggestions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_suggestions");

    for size in [10, 100, 1000].iter() {
        let reply = reply_for(&titles(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(parse_suggestions(&reply).unwrap()));
        });
    }

    group.finish();
}

fn bench_task_add(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("task_add", |b| {
        b.to_async(&rt).iter(|| async {
            let (_temp_dir, pool) = setup_test_db().await;
            let task_mgr = TaskManager::new(&pool);

            task_mgr
                .add_task(NewTask {
                    title: "Benchmark task".to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        });
    });
}

fn bench_task_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("task_list");

    for size in [10, 100].iter() {
        let (_temp_dir, pool) = rt.block_on(async {
            let (temp_dir, pool) = setup_test_db().await;
            let task_mgr = TaskManager::new(&pool);
            for title in titles(*size) {
                task_mgr
                    .add_task(NewTask {
                        title,
                        ..Default::default()
                    })
                    .await
                    .unwrap();
            }
            (temp_dir, pool)
        });

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.to_async(&rt).iter(|| async {
                let task_mgr = TaskManager::new(&pool);
                black_box(task_mgr.list_task_details().await.unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_prompt,
    bench_parse_suggestions,
    bench_task_add,
    bench_task_list
);
criterion_main!(benches);
