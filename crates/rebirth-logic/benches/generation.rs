use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rebirth_logic::generator::generate_life;
use rebirth_logic::journey::LifeJourney;
use rebirth_logic::karma::KarmaProfile;
use rebirth_logic::modes::GameMode;

fn bench_generation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let profile = KarmaProfile::new(0);

    c.bench_function("generate_classic_life", |b| {
        b.iter(|| generate_life(GameMode::Classic, Some(black_box(&profile)), 0, &mut rng))
    });

    c.bench_function("generate_fantasy_life", |b| {
        b.iter(|| generate_life(GameMode::Fantasy, Some(black_box(&profile)), 0, &mut rng))
    });

    let life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
    c.bench_function("schedule_journey", |b| {
        b.iter(|| LifeJourney::start(black_box(&life), &profile, &mut rng))
    });
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
