use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pixdex::{
    catalog::{Catalog, CatalogFilter, Item, StaticCatalog},
    game::{GameSession, GuessEvent, Phase, apply_guess, canonical_title, mask, normalize},
};
use rand::{SeedableRng, rngs::StdRng};
use std::{collections::BTreeSet, hint::black_box};

/// Helper to build a pool of N synthetic titles
fn pool(n_items: usize) -> Vec<Item> {
    (0..n_items)
        .map(|i| Item::new(i as i64 + 1, format!("Título Número {i}: ¡Acción!")))
        .collect()
}

/// Benchmark normalization of a short accented title
fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_title", |b| {
        b.iter(|| normalize(black_box("¿Quién Engañó a Roger Rabbit?")));
    });

    c.bench_function("canonical_title", |b| {
        b.iter(|| canonical_title(black_box("Fullmetal Alchemist: Brotherhood")));
    });
}

/// Benchmark masking a title against a set of guessed letters
fn bench_mask(c: &mut Criterion) {
    let guessed: BTreeSet<char> = ['A', 'E', 'R', 'T'].into_iter().collect();

    c.bench_function("mask_title", |b| {
        b.iter(|| mask(black_box("Mad Max: Fury Road"), &guessed));
    });
}

/// Benchmark whole games played by guessing the alphabet in order
fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    for n_items in [4, 16, 64] {
        let items = pool(n_items);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_items", n_items)),
            &items,
            |b, items| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(1);
                    let mut session = GameSession::new("bench", items.clone()).start(&mut rng);
                    while !session.is_terminal() {
                        for letter in 'A'..='Z' {
                            session = apply_guess(session, &GuessEvent::Letter(letter));
                            if session.phase() != Phase::InProgress {
                                break;
                            }
                        }
                        if session.phase() == Phase::Intermission {
                            session = session.next_target(&mut rng);
                        }
                    }
                    session.score()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark building a game pool from the bundled catalog
fn bench_game_pool(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let catalog = runtime
        .block_on(Catalog::load(&StaticCatalog::bundled().unwrap()))
        .unwrap();
    let filter = CatalogFilter::new().with_types([1, 3]).with_genres([1, 4]);

    c.bench_function("game_pool_filtered", |b| {
        b.iter(|| catalog.game_pool(black_box(&filter)));
    });
}

criterion_group!(text, bench_normalize, bench_mask);

criterion_group!(game_operations, bench_full_game, bench_game_pool);

criterion_main!(text, game_operations);
