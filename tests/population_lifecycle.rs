use genetic_cars::engines::generation::{
    Genome, GenomeDomain, IndividualId, LifecycleState, PopulationManager,
};
use genetic_cars::engines::simulation::{Clock, ManualClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

const TIMEOUT: u64 = 5000;

fn genomes(n: usize, seed: u64) -> Vec<Genome> {
    let domain = GenomeDomain::default();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Genome::random(&domain, &mut rng)).collect()
}

fn feed(manager: &PopulationManager, values: &[f64]) -> HashMap<IndividualId, f64> {
    manager
        .active()
        .iter()
        .zip(values.iter().copied())
        .map(|(ind, x)| (ind.id(), x))
        .collect()
}

#[test]
fn test_stagnation_kills_exactly_once_and_not_before() {
    let clock = ManualClock::new(1_000);
    let mut manager = PopulationManager::new(1, TIMEOUT);
    manager.spawn_generation(genomes(1, 1), clock.now()).unwrap();
    let id = manager.active()[0].id();

    // Some progress, then nothing
    clock.advance(100);
    manager.tick(&feed(&manager, &[2.0]), clock.now()).unwrap();
    let stalled_since = clock.now();

    let mut deaths = 0;
    while clock.now() <= stalled_since + TIMEOUT {
        let died = manager.tick(&feed(&manager, &[2.0]), clock.now()).unwrap();
        assert!(died.is_empty(), "died early at {}", clock.now());
        assert_eq!(manager.active().len(), 1);
        clock.advance(250);
    }

    // First tick strictly past the timeout
    let died = manager.tick(&feed(&manager, &[2.0]), clock.now()).unwrap();
    deaths += died.len();
    assert_eq!(died[0].id(), id);
    assert_eq!(died[0].state(), LifecycleState::Dead);
    assert_eq!(died[0].fitness(), 2.0);
    assert!(manager.active().is_empty());

    // Later ticks have nobody to kill
    clock.advance(TIMEOUT * 3);
    deaths += manager.tick(&HashMap::new(), clock.now()).unwrap().len();
    assert_eq!(deaths, 1);

    let archive = manager.drain_dead_archive();
    assert_eq!(archive.len(), 1);
    assert!(manager.drain_dead_archive().is_empty());
}

#[test]
fn test_progress_resets_clock() {
    let clock = ManualClock::new(0);
    let mut manager = PopulationManager::new(2, TIMEOUT);
    manager.spawn_generation(genomes(2, 2), clock.now()).unwrap();

    let mut x = 0.0;
    for _ in 0..1_000 {
        // Large steps: each tick alone exceeds the timeout
        clock.advance(TIMEOUT * 2);
        x += 0.01;
        let died = manager.tick(&feed(&manager, &[x, x]), clock.now()).unwrap();
        assert!(died.is_empty());
    }

    assert!(!manager.is_generation_over());
    assert!(manager.active().iter().all(|i| i.max_distance() == x));
}

#[test]
fn test_lead_individual_ties_go_to_earliest() {
    let mut manager = PopulationManager::new(4, TIMEOUT);
    manager.spawn_generation(genomes(4, 3), 0).unwrap();
    let ids: Vec<_> = manager.active().iter().map(|i| i.id()).collect();

    manager.tick(&feed(&manager, &[3.2, 7.1, 7.1, 1.0]), 10).unwrap();

    assert_eq!(manager.lead_individual().unwrap().id(), ids[1]);
}

#[test]
fn test_lead_skips_nan_position() {
    let mut manager = PopulationManager::new(3, TIMEOUT);
    manager.spawn_generation(genomes(3, 6), 0).unwrap();
    let ids: Vec<_> = manager.active().iter().map(|i| i.id()).collect();

    manager.tick(&feed(&manager, &[f64::NAN, 7.0, 2.0]), 10).unwrap();
    assert_eq!(manager.lead_individual().unwrap().id(), ids[1]);

    manager.tick(&feed(&manager, &[f64::NAN, f64::NAN, f64::NAN]), 20).unwrap();
    assert_eq!(manager.lead_individual().unwrap().id(), ids[0]);
}

#[test]
fn test_lead_follows_current_position_not_best() {
    let mut manager = PopulationManager::new(2, TIMEOUT);
    manager.spawn_generation(genomes(2, 4), 0).unwrap();
    let ids: Vec<_> = manager.active().iter().map(|i| i.id()).collect();

    manager.tick(&feed(&manager, &[9.0, 4.0]), 10).unwrap();
    manager.tick(&feed(&manager, &[3.0, 5.0]), 20).unwrap();

    assert_eq!(manager.lead_individual().unwrap().id(), ids[1]);
    assert_eq!(manager.active()[0].max_distance(), 9.0);
}

#[test]
fn test_archive_preserves_death_order() {
    let clock = ManualClock::new(0);
    let mut manager = PopulationManager::new(3, TIMEOUT);
    manager.spawn_generation(genomes(3, 5), clock.now()).unwrap();
    let ids: Vec<_> = manager.active().iter().map(|i| i.id()).collect();

    // Individual 2 stops first, then 0, then 1
    clock.advance(1000);
    manager.tick(&feed(&manager, &[1.0, 1.0, 1.0]), clock.now()).unwrap();
    clock.advance(2000);
    manager.tick(&feed(&manager, &[2.0, 2.0, 1.0]), clock.now()).unwrap();
    clock.advance(2000);
    manager.tick(&feed(&manager, &[2.0, 3.0, 1.0]), clock.now()).unwrap();

    clock.advance(1500);
    let died = manager.tick(&feed(&manager, &[2.0, 3.0, 1.0]), clock.now()).unwrap();
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].id(), ids[2]);

    clock.advance(2000);
    let died = manager.tick(&feed(&manager, &[2.0, 3.0]), clock.now()).unwrap();
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].id(), ids[0]);

    clock.advance(2000);
    manager.tick(&feed(&manager, &[3.0]), clock.now()).unwrap();

    let order: Vec<_> = manager.drain_dead_archive().iter().map(|i| i.id()).collect();
    assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
    assert!(manager.is_generation_over());
}

#[test]
fn test_every_generation_has_generation_size() {
    let mut manager = PopulationManager::new(10, TIMEOUT);
    for generation in 1..=3 {
        let spawned = manager.spawn_generation(genomes(10, generation), 0).unwrap();
        assert_eq!(spawned.len(), 10);
        manager.cull_remaining();
        assert_eq!(manager.drain_dead_archive().len(), 10);
    }
    assert!(manager.spawn_generation(genomes(11, 9), 0).is_err());
}
