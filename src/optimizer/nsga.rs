//! The NSGA-II generational loop.

use std::sync::atomic::Ordering as AtomicOrdering;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
  config::Config,
  crowding::{assign_crowding_distances, mean_front_crowding},
  error::{Error, Result},
  individual::{initialize_population, Individual},
  mutation::polynomial_mutation,
  objective::{evaluate_all, Objectives, SectorObjectives},
  optimizer::{OptimizationResult, Optimizer},
  recombination::sbx,
  selection::{crowded_cmp, select_pair},
  sorting::{assign_ranks, Ranking, SolutionIndex},
  termination::{
    CrowdingTerminator,
    GenerationTerminator,
    TerminationReason,
    Terminator,
  },
};

/// States of the generational loop, in the order a generation passes them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Phase {
  /// Drawing the initial population.
  Initializing,
  /// Scoring the initial population.
  Evaluating,
  /// Sorting the initial population into fronts.
  Ranking,
  /// Selecting parents and producing offspring.
  Breeding,
  /// Scoring offspring.
  EvaluatingOffspring,
  /// Merging parents with offspring and truncating to the population size.
  Combining,
  /// The run is over.
  Terminated,
}

/// Ranks `individuals` and computes the crowding distance of every front.
///
/// Individuals with non-finite objectives are left out of the comparison and
/// reported in [`Ranking::flagged`].
pub fn rank_population(
  individuals: &mut [Individual],
  parallel: bool,
) -> Ranking {
  let ranking = assign_ranks(individuals, parallel);
  assign_crowding_distances(individuals, &ranking.fronts, parallel);
  ranking
}

/// Elitist multi-objective genetic algorithm, [NSGA-II].
///
/// Each generation breeds as many offspring as there are parents through
/// binary tournaments, SBX and polynomial mutation, ranks parents and
/// offspring together, and keeps the best `population_size` of them: whole
/// fronts first, then the least crowded members of the front that doesn't
/// fit.
///
/// All randomness comes from one stream seeded by [`Config::seed`], so a
/// seeded run is reproducible regardless of [`Config::parallel`].
///
/// [NSGA-II]: https://sci2s.ugr.es/sites/default/files/files/Teaching/OtherPostGraduateCourses/Metaheuristicas/Deb_NSGAII.pdf
pub struct Nsga2<O = SectorObjectives> {
  config: Config,
  objectives: O,
  terminators: Vec<Box<dyn Terminator>>,
  rng: StdRng,
  phase: Phase,
}

impl Nsga2<SectorObjectives> {
  /// Creates an optimizer of the sector allocation objectives.
  ///
  /// # Errors
  ///
  /// Fails if `config` doesn't validate.
  pub fn new(config: Config) -> Result<Self> {
    Self::with_objectives(config, SectorObjectives)
  }
}

impl<O> Nsga2<O>
where
  O: Objectives + Sync,
{
  /// Creates an optimizer of custom objectives.
  ///
  /// # Errors
  ///
  /// Fails if `config` doesn't validate.
  pub fn with_objectives(config: Config, objectives: O) -> Result<Self> {
    config.validate()?;
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    Ok(Self {
      config,
      objectives,
      terminators: Vec::new(),
      rng,
      phase: Phase::Initializing,
    })
  }

  /// Adds a termination condition checked after every generation, next to
  /// the configured ones. It also sees the last generation, whose population
  /// is the one [`run`](Self::run) returns.
  pub fn terminator(mut self, terminator: impl Terminator + 'static) -> Self {
    self.terminators.push(Box::new(terminator));
    self
  }

  /// The configuration of this optimizer.
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// The phase the loop is in.
  ///
  /// [`run`](Self::run) borrows the optimizer mutably for the whole run, so
  /// from the outside this is only ever `Initializing` before a run and
  /// `Terminated` after one. Transitions in between are reported as `trace`
  /// events.
  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Runs generations until a termination condition fires.
  ///
  /// # Errors
  ///
  /// Fails with [`Error::Computation`] if every individual of a generation
  /// has non-finite objectives.
  #[instrument(
    level = "info",
    skip(self),
    fields(
      n_sectors = self.config.n_sectors,
      population_size = self.config.population_size,
      n_generations = self.config.n_generations,
      seed = ?self.config.seed,
    )
  )]
  pub fn run(&mut self) -> Result<OptimizationResult> {
    info!("Starting optimization");
    let parallel = self.config.parallel;

    self.enter(Phase::Initializing);
    let mut population = initialize_population(
      self.config.n_sectors,
      self.config.population_size,
      &mut self.rng,
    )?;

    self.enter(Phase::Evaluating);
    evaluate_all(&self.objectives, &mut population, parallel);

    self.enter(Phase::Ranking);
    self.rank(&mut population, 0)?;

    let mut generation = 0;
    let reason = loop {
      if self.cancelled() {
        break TerminationReason::Cancelled;
      }
      generation += 1;

      self.enter(Phase::Breeding);
      let mut offspring = self.breed(&population);

      self.enter(Phase::EvaluatingOffspring);
      evaluate_all(&self.objectives, &mut offspring, parallel);

      self.enter(Phase::Combining);
      population.append(&mut offspring);
      let ranking = self.rank(&mut population, generation)?;
      population = self.truncate(population, ranking);
      let ranking = self.rank(&mut population, generation)?;

      debug!(
        generation,
        fronts = ranking.fronts.len(),
        pareto_front = ranking.fronts.first().map_or(0, Vec::len),
        mean_front_crowding = ?mean_front_crowding(&population),
        "Generation complete"
      );

      if let Some(reason) = self.check_termination(generation, &population) {
        break reason;
      }
    };

    self.enter(Phase::Terminated);
    population.sort_by(crowded_cmp);
    info!(generation, ?reason, "Optimization finished");
    Ok(OptimizationResult {
      population,
      generations: generation,
      reason,
    })
  }

  fn enter(&mut self, phase: Phase) {
    trace!(from = ?self.phase, to = ?phase, "Phase transition");
    self.phase = phase;
  }

  fn rank(
    &self,
    individuals: &mut [Individual],
    generation: usize,
  ) -> Result<Ranking> {
    let ranking = rank_population(individuals, self.config.parallel);
    if ranking.fronts.is_empty() {
      return Err(Error::Computation { generation });
    }
    if !ranking.flagged.is_empty() {
      warn!(
        generation,
        flagged = ranking.flagged.len(),
        "Individuals with non-finite objectives excluded from ranking"
      );
    }
    Ok(ranking)
  }

  /// Produces `population_size` offspring from tournament selected pairs.
  fn breed(&mut self, population: &[Individual]) -> Vec<Individual> {
    let Config {
      population_size,
      crossover_prob,
      mutation_prob,
      eta_c,
      eta_m,
      ..
    } = self.config;

    let mut offspring = Vec::with_capacity(population_size + 1);
    while offspring.len() < population_size {
      let (a, b) = select_pair(population, &mut self.rng);
      let (mut c, mut d) = sbx(
        &population[a].variables,
        &population[b].variables,
        crossover_prob,
        eta_c,
        &mut self.rng,
      );
      polynomial_mutation(&mut c, mutation_prob, eta_m, &mut self.rng);
      polynomial_mutation(&mut d, mutation_prob, eta_m, &mut self.rng);
      offspring.push(Individual::new(c));
      offspring.push(Individual::new(d));
    }
    // an odd population size leaves one child over
    offspring.truncate(population_size);
    offspring
  }

  /// Keeps the best `population_size` members of a ranked pool.
  fn truncate(
    &self,
    pool: Vec<Individual>,
    ranking: Ranking,
  ) -> Vec<Individual> {
    let population_size = self.config.population_size;
    let mut survivors: Vec<SolutionIndex> = Vec::with_capacity(population_size);

    // flagged individuals only fill slots no ranked individual can
    let groups = ranking
      .fronts
      .into_iter()
      .chain(std::iter::once(ranking.flagged));
    for mut front in groups {
      let room = population_size - survivors.len();
      if front.len() <= room {
        survivors.append(&mut front);
        continue;
      }
      // the least crowded members of a partial front survive. the sort is
      // stable, so ties keep pool order
      front.sort_by(|&a, &b| {
        pool[b].crowding_distance.total_cmp(&pool[a].crowding_distance)
      });
      survivors.extend(front.into_iter().take(room));
      break;
    }

    let mut slots: Vec<Option<Individual>> =
      pool.into_iter().map(Some).collect();
    let population: Vec<Individual> = survivors
      .into_iter()
      .filter_map(|idx| slots[idx].take())
      .collect();

    debug_assert_eq!(
      population.len(),
      population_size,
      "new population size must match configured population size"
    );
    population
  }

  /// Runs every custom terminator, then decides whether to stop. When
  /// several conditions hold at once, the generation limit wins over
  /// convergence, which wins over the custom terminators.
  fn check_termination(
    &mut self,
    generation: usize,
    population: &[Individual],
  ) -> Option<TerminationReason> {
    // no short circuit, each terminator sees every generation
    let custom = self.terminators.iter_mut().fold(false, |fired, t| {
      t.terminate(generation, population) || fired
    });

    if GenerationTerminator(self.config.n_generations)
      .terminate(generation, population)
    {
      return Some(TerminationReason::GenerationLimit);
    }
    if let Some(threshold) = self.config.convergence_threshold {
      if CrowdingTerminator(threshold).terminate(generation, population) {
        return Some(TerminationReason::Converged);
      }
    }
    custom.then_some(TerminationReason::Custom)
  }

  fn cancelled(&self) -> bool {
    self
      .config
      .cancel
      .as_ref()
      .is_some_and(|cancel| cancel.load(AtomicOrdering::Relaxed))
  }
}

impl<O> Optimizer for Nsga2<O>
where
  O: Objectives + Sync,
{
  fn optimize(mut self) -> Result<Vec<Individual>> {
    self.run().map(|result| result.population)
  }
}
