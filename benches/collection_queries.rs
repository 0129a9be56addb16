//! Benchmarks for the hot collection queries with a seeded dataset.

use criterion::{criterion_group, criterion_main, Criterion};

use cinelog_core::UserId;
use cinelog_db::pool::{init_memory_pool, PooledConnection};
use cinelog_db::queries::{collection, movies, users};

/// Seed a thousand movies, half of them in one user's collection.
fn setup() -> (PooledConnection, UserId) {
    let pool = init_memory_pool().expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");

    let user = users::create_user(&conn, "bench").unwrap();

    for i in 0..1000 {
        let movie = movies::create_movie(
            &conn,
            &format!("Movie {:04}", i),
            Some("Director"),
            Some(2000 + (i % 25) as i32),
            Some(7.5),
            None,
            None,
        )
        .unwrap();
        if i % 2 == 0 {
            collection::create_entry(&conn, user.id, movie.id, None).unwrap();
        }
    }

    (conn, user.id)
}

fn bench_collection_queries(c: &mut Criterion) {
    let (conn, user_id) = setup();

    let mut group = c.benchmark_group("db_collection");

    group.bench_function("list_for_user", |b| {
        b.iter(|| {
            collection::list_for_user(&conn, user_id).unwrap();
        });
    });

    group.bench_function("list_recent", |b| {
        b.iter(|| {
            movies::list_recent(&conn, 8).unwrap();
        });
    });

    group.bench_function("find_movie_by_name", |b| {
        b.iter(|| {
            movies::find_movie_by_name(&conn, "movie 0500").unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_collection_queries);
criterion_main!(benches);
