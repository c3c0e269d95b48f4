use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use league_live::{
    compute_table, score_update, Broadcaster, Match, MatchStatus, SubscriptionRegistry, Team,
    outbounds::queue_channel::QueueChannel,
};

/// Builds a league where every pair of teams has met home and away.
fn double_round_robin(teams: usize, seed: u64) -> (Uuid, Vec<Team>, Vec<Match>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let league_id = Uuid::new_v4();
    let teams: Vec<Team> = (0..teams)
        .map(|i| Team::new(format!("Team {:03}", i), format!("T{:03}", i)))
        .collect();

    let mut matches = Vec::with_capacity(teams.len() * teams.len());
    for home in &teams {
        for away in &teams {
            if home.id == away.id {
                continue;
            }
            matches.push(
                Match::new(league_id, home.id, away.id, Utc::now(), "Ground")
                    .with_status(MatchStatus::Finished)
                    .with_score(rng.gen_range(0..5), rng.gen_range(0..5)),
            );
        }
    }
    (league_id, teams, matches)
}

fn bench_compute_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("standings_compute_table");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 20, 40].iter() {
        let (league_id, teams, matches) = double_round_robin(*size, 42);
        group.throughput(Throughput::Elements(matches.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(compute_table(league_id, &teams, &matches)));
        });
    }

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_fan_out");
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => panic!("failed to start runtime: {}", e),
    };

    for subscribers in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*subscribers as u64));

        group.bench_with_input(BenchmarkId::from_parameter(subscribers), subscribers, |b, &n| {
            let registry = Arc::new(SubscriptionRegistry::new());
            let broadcaster = Broadcaster::new(Arc::clone(&registry), Duration::from_secs(1));
            let fixture = Match::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Utc::now(), "Ground")
                .with_status(MatchStatus::Live)
                .with_score(1, 0);

            // Receivers are drained after each publish so the queues never fill.
            let mut receivers = Vec::with_capacity(n);
            for _ in 0..n {
                let (channel, receiver) = QueueChannel::new(4);
                registry.subscribe(fixture.id, Arc::new(channel));
                receivers.push(receiver);
            }
            let payload = score_update(&fixture);

            b.iter(|| {
                runtime.block_on(async {
                    let report = broadcaster.publish(fixture.id, &payload).await;
                    black_box(report.ok());
                });
                for receiver in receivers.iter_mut() {
                    while receiver.try_recv().is_ok() {}
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_table, bench_fan_out);
criterion_main!(benches);
