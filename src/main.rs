use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use graphplan::graph::PlanningGraph;
use graphplan::heuristic::{Constant, Heuristic, IgnorePreconditions, LevelSum, Memoized};
use graphplan::problems;
use graphplan::search::{
    astar_search, breadth_first_search, depth_first_graph_search, greedy_best_first_search,
    uniform_cost_search,
};
use graphplan::settings::Settings;

#[derive(Parser)]
#[command(name = "graphplan")]
#[command(about = "Solve a bundled STRIPS problem with planning graph heuristics")]
#[command(version)]
struct Args {
    /// Bundled problem to solve
    #[arg(value_name = "PROBLEM", default_value = "have-cake")]
    problem: String,

    #[arg(long, value_enum, default_value = "astar")]
    search: SearchKind,

    /// Heuristic for greedy and A* search
    #[arg(long, value_enum, default_value = "level-sum")]
    heuristic: HeuristicKind,

    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Print the planning graph of the initial state as JSON instead of searching
    #[arg(long)]
    dump_graph: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SearchKind {
    Bfs,
    Dfs,
    Ucs,
    Greedy,
    Astar,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeuristicKind {
    LevelSum,
    IgnorePreconditions,
    Constant,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.settings.as_deref()).context("loading settings")?;
    let problem = problems::by_name(&args.problem)
        .ok_or_else(|| {
            let known = problems::NAMES.join(", ");
            anyhow!("unknown problem `{}`, expected one of: {}", args.problem, known)
        })?
        .with_context(|| format!("building problem `{}`", args.problem))?;

    if args.dump_graph {
        let graph = PlanningGraph::create(&problem, problem.initial(), settings.graph)?;
        println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
        return Ok(());
    }

    let (pos, _) = problem.get_state_fluents(problem.initial());
    println!("Initial state: {}", pos.join(", "));
    let vocabulary = problem.all_fluents();
    let goal: Vec<String> = problem.goal()
        .literals(vocabulary)
        .iter()
        .map(|literal| literal.describe(vocabulary))
        .collect();
    println!("Goal: {}", goal.join(", "));

    let heuristic: Box<dyn Heuristic + '_> = match args.heuristic {
        HeuristicKind::LevelSum => Box::new(LevelSum::new(&problem, settings.graph)),
        HeuristicKind::IgnorePreconditions => Box::new(IgnorePreconditions::new(&problem)),
        HeuristicKind::Constant => Box::new(Constant(1)),
    };
    let heuristic = Memoized::new(heuristic, settings.heuristic.cache_capacity);

    let plan = match args.search {
        SearchKind::Bfs => breadth_first_search(&problem)?,
        SearchKind::Dfs => depth_first_graph_search(&problem)?,
        SearchKind::Ucs => uniform_cost_search(&problem)?,
        SearchKind::Greedy => greedy_best_first_search(&problem, &heuristic)?,
        SearchKind::Astar => astar_search(&problem, &heuristic)?,
    };
    if heuristic.hits() + heuristic.misses() > 0 {
        tracing::info!(hits = heuristic.hits(), misses = heuristic.misses(), "heuristic cache");
    }

    match plan {
        Some(plan) => {
            println!(
                "Plan of length {} ({} expansions, {} goal tests, {} new nodes):",
                plan.len(), plan.expansions, plan.goal_tests, plan.new_nodes
            );
            for name in plan.names() {
                println!("    {}", name);
            }
        },
        None => println!("No plan reaches the goal"),
    }
    Ok(())
}
