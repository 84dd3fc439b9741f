// rmtool: headless checks for Route-Mapper graph files
// Build with: cargo build --features cli --bin rmtool

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use route_mapper::graph_utils::graph::GraphRegistry;
use route_mapper::persistence::{persist, text_format};

#[derive(Serialize)]
struct Summary<'a> {
    file: &'a str,
    nodes: usize,
    edges: usize,
    routes: usize,
    total_distance: f64,
}

fn file_arg() -> Arg {
    Arg::new("file").required(true).value_parser(value_parser!(PathBuf)).help("Graph file")
}

fn path_of(matches: &ArgMatches, id: &str) -> anyhow::Result<PathBuf> {
    matches.get_one::<PathBuf>(id).cloned().with_context(|| format!("missing argument '{}'", id))
}

fn check(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches, "file")?;
    let mut graph = GraphRegistry::new();
    persist::load_from_path(&mut graph, &path)?;

    let total_distance: f64 = graph
        .edges()
        .iter()
        .filter_map(|&(a, b)| graph.distance(a, b))
        .sum();
    let file = path.display().to_string();
    let summary = Summary {
        file: &file,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        routes: graph.routes().len(),
        total_distance,
    };
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: {} nodes, {} edges ({:.2} total), {} routes to find",
            summary.file, summary.nodes, summary.edges, summary.total_distance, summary.routes
        );
    }
    Ok(())
}

fn normalize(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = path_of(matches, "file")?;
    let mut graph = GraphRegistry::new();
    persist::load_from_path(&mut graph, &path)?;
    match matches.get_one::<PathBuf>("output") {
        Some(out) => persist::save_to_path(&graph, out)?,
        None => print!("{}", text_format::export(&graph)),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let matches = Command::new("rmtool")
        .about("rmtool: inspect and rewrite Route-Mapper graph files")
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about("Load a file and print what it contains")
                .arg(file_arg())
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue).help("Print the summary as JSON")),
        )
        .subcommand(
            Command::new("normalize")
                .about("Load a file and write it back in canonical form")
                .arg(file_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", sub)) => check(sub),
        Some(("normalize", sub)) => normalize(sub),
        _ => unreachable!("subcommand_required"),
    }
}
