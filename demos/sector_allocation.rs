use pareto_alloc::{Config, Nsga2};
use tracing_subscriber::EnvFilter;

fn main() {
  // `RUST_LOG=pareto_alloc=debug` prints a line per generation
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  // eight sectors, a hundred candidate allocations, two hundred generations
  let config = Config::builder()
    .n_sectors(8)
    .population_size(100)
    .n_generations(200)
    .seed(7)
    .parallel(true)
    .build();

  let result = Nsga2::new(config)
    .and_then(|mut nsga| nsga.run())
    .unwrap_or_else(|e| panic!("optimization failed: {e}"));

  let front = result.pareto_front();
  println!(
    "{} generations, stopped by {:?}, {} allocations on the Pareto front",
    result.generations,
    result.reason,
    front.len()
  );
  if let Some([balance, smoothness, diversity, equity]) =
    result.mean_front_objectives()
  {
    println!(
      "front means: balance {balance:.4} | smoothness {smoothness:.4} | \
       diversity {diversity:.4} | equity {equity:.4}"
    );
  }

  // and print the first 10 allocations
  println!(" balance | smooth  | divers  | equity  | allocation");
  for individual in front.iter().take(10) {
    let [f1, f2, f3, f4] = individual.objectives();
    let allocation = individual
      .variables()
      .iter()
      .map(|v| format!("{v:.2}"))
      .collect::<Vec<_>>()
      .join(" ");
    println!("{f1:8.4} | {f2:7.4} | {f3:7.4} | {f4:7.4} | {allocation}");
  }
  println!("   ...   |   ...   |   ...   |   ...   |   ...");
}
