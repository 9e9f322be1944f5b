use crate::engines::generation::genome::Genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How parents are drawn from the ranked parent pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Every pool member equally likely
    Uniform,
    /// Probability proportional to fitness
    Roulette,
    /// Best of `tournament_size` random draws
    Tournament,
}

/// Uniform pick from the pool.
pub fn uniform_selection<'a, R: Rng>(pool: &'a [(&'a Genome, f64)], rng: &mut R) -> &'a Genome {
    pool[rng.gen_range(0..pool.len())].0
}

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<'a, R: Rng>(
    pool: &'a [(&'a Genome, f64)],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Genome {
    let mut best_idx = rng.gen_range(0..pool.len());
    let mut best_fitness = pool[best_idx].1;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..pool.len());
        if pool[idx].1 > best_fitness {
            best_idx = idx;
            best_fitness = pool[idx].1;
        }
    }

    pool[best_idx].0
}

/// Roulette wheel selection: probability proportional to fitness
pub fn roulette_selection<'a, R: Rng>(pool: &'a [(&'a Genome, f64)], rng: &mut R) -> &'a Genome {
    // Cars that rolled backwards count as zero distance
    let total_fitness: f64 = pool.iter().map(|(_, f)| f.max(0.0)).sum();

    if !total_fitness.is_finite() || total_fitness <= 0.0 {
        return uniform_selection(pool, rng);
    }

    let mut spin = rng.gen::<f64>() * total_fitness;

    for (genome, fitness) in pool {
        spin -= fitness.max(0.0);
        if spin < 0.0 {
            return genome;
        }
    }

    // Float drift: land on the last member with positive fitness
    pool.iter()
        .rev()
        .find(|(_, f)| *f > 0.0)
        .map(|(g, _)| *g)
        .unwrap_or(pool[pool.len() - 1].0)
}

/// Draw one parent with `method`. `pool` must not be empty.
pub fn select_parent<'a, R: Rng>(
    pool: &'a [(&'a Genome, f64)],
    method: SelectionMethod,
    tournament_size: usize,
    rng: &mut R,
) -> &'a Genome {
    match method {
        SelectionMethod::Uniform => uniform_selection(pool, rng),
        SelectionMethod::Roulette => roulette_selection(pool, rng),
        SelectionMethod::Tournament => tournament_selection(pool, tournament_size, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::GenomeDomain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_genomes(n: usize) -> Vec<Genome> {
        let mut rng = StdRng::seed_from_u64(99);
        let domain = GenomeDomain::default();
        (0..n).map(|_| Genome::random(&domain, &mut rng)).collect()
    }

    fn count_picks<F>(genomes: &[Genome], fitness: &[f64], mut pick: F) -> Vec<usize>
    where
        F: FnMut(&[(&Genome, f64)]) -> Genome,
    {
        let pool: Vec<(&Genome, f64)> = genomes.iter().zip(fitness.iter().copied()).collect();
        let mut counts = vec![0; genomes.len()];
        for _ in 0..4000 {
            let chosen = pick(&pool);
            let idx = genomes.iter().position(|g| *g == chosen).unwrap();
            counts[idx] += 1;
        }
        counts
    }

    #[test]
    fn test_roulette_never_picks_zero_fitness() {
        let genomes = pool_genomes(3);
        let fitness = [0.0, 5.0, 15.0];
        let mut rng = StdRng::seed_from_u64(1);

        let counts = count_picks(&genomes, &fitness, |pool| roulette_selection(pool, &mut rng).clone());

        assert_eq!(counts[0], 0);
        assert!(counts[2] > counts[1], "higher fitness should be picked more: {:?}", counts);
    }

    #[test]
    fn test_roulette_all_zero_falls_back_to_uniform() {
        let genomes = pool_genomes(4);
        let fitness = [0.0, -1.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(2);

        let counts = count_picks(&genomes, &fitness, |pool| roulette_selection(pool, &mut rng).clone());

        assert!(counts.iter().all(|&c| c > 0), "uniform fallback should reach everyone: {:?}", counts);
    }

    #[test]
    fn test_tournament_favours_fitter() {
        let genomes = pool_genomes(5);
        let fitness = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(3);

        let counts = count_picks(&genomes, &fitness, |pool| tournament_selection(pool, 3, &mut rng).clone());

        for pair in counts.windows(2) {
            assert!(pair[1] >= pair[0], "selection pressure not monotone: {:?}", counts);
        }
    }

    #[test]
    fn test_single_member_pool() {
        let genomes = pool_genomes(1);
        let pool = vec![(&genomes[0], 3.0)];
        let mut rng = StdRng::seed_from_u64(4);

        for method in [SelectionMethod::Uniform, SelectionMethod::Roulette, SelectionMethod::Tournament] {
            assert_eq!(select_parent(&pool, method, 3, &mut rng), &genomes[0]);
        }
    }
}
