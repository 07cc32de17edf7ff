use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use imgraph_client::{ClientConfig, HttpBackend, Segmentation, UploadBatch};
use imgraph_core::{EditCommand, EditOutcome, GraphSession};
use imgraph_model::Graph;
use imgraph_render::convert;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("imgraph")
        .version(imgraph_core::VERSION)
        .about("Image knowledge graph client")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Backend base URL, overrides config and IMGRAPH_API_BASE_URL"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("health").about("Probe the backend"))
        .subcommand(
            Command::new("graph")
                .about("Fetch the full graph")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the graph as JSON"),
                )
                .arg(
                    Arg::new("render")
                        .long("render")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json")
                        .help("Print the render model as JSON"),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload images for analysis")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Image files"),
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .value_parser(value_parser!(u32))
                        .help("Segmentation grid rows"),
                )
                .arg(
                    Arg::new("cols")
                        .long("cols")
                        .value_parser(value_parser!(u32))
                        .help("Segmentation grid columns"),
                )
                .arg(
                    Arg::new("overlap")
                        .long("overlap")
                        .value_parser(value_parser!(u32))
                        .help("Overlap between grid sections"),
                ),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask a question about the graph")
                .arg(Arg::new("message").required(true).help("Question"))
                .arg(
                    Arg::new("full-context")
                        .long("full-context")
                        .action(ArgAction::SetTrue)
                        .help("Answer from the full graph instead of the relevant subgraph"),
                ),
        )
        .subcommand(
            Command::new("add-node")
                .about("Create a node")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("rename-node")
                .about("Rename a node, keeping its edges")
                .arg(Arg::new("old").required(true))
                .arg(Arg::new("new").required(true)),
        )
        .subcommand(
            Command::new("delete-node")
                .about("Delete a node and every edge touching it")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("add-edge")
                .about("Add labelled edges between two nodes")
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .arg(
                    Arg::new("labels")
                        .required(true)
                        .help("Comma separated labels"),
                ),
        )
        .subcommand(
            Command::new("edit-edge")
                .about("Replace the labels of an edge")
                .arg(Arg::new("edge-id").required(true).help("Edge id as printed by `graph`"))
                .arg(
                    Arg::new("labels")
                        .required(true)
                        .help("Comma separated labels"),
                ),
        )
        .subcommand(
            Command::new("delete-edge")
                .about("Delete an edge with all its labels")
                .arg(Arg::new("edge-id").required(true).help("Edge id as printed by `graph`")),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::new(),
    };
    let config = config.with_env_overrides();
    Ok(match matches.get_one::<String>("base-url") {
        Some(url) => config.with_base_url(url.as_str()),
        None => config,
    })
}

fn segmentation(args: &ArgMatches, defaults: Segmentation) -> Segmentation {
    Segmentation {
        rows: args.get_one::<u32>("rows").copied().unwrap_or(defaults.rows),
        cols: args.get_one::<u32>("cols").copied().unwrap_or(defaults.cols),
        overlap: args.get_one::<u32>("overlap").copied().unwrap_or(defaults.overlap),
    }
}

fn arg<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a str> {
    args.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{id}>"))
}

fn print_summary(graph: &Graph) {
    println!(
        "{} nodes, {} relationships",
        graph.node_count(),
        graph.relationship_count()
    );
    for edge in convert(graph).edges {
        println!("  {}  [{}]", edge.id, edge.label);
    }
}

fn report(outcome: &EditOutcome) {
    match outcome {
        EditOutcome::Applied {
            payload,
            full_graph,
        } => {
            println!("Applied {} change(s)", payload.len());
            print_summary(full_graph);
        }
        EditOutcome::Skipped => println!("Nothing to change"),
    }
}

async fn run(matches: ArgMatches) -> Result<()> {
    let config = load_config(&matches)?;
    tracing::debug!("Using backend at {}", config.api_base_url);
    let backend = HttpBackend::new(&config).context("building backend client")?;
    let session =
        GraphSession::new(Arc::new(backend)).with_segmentation(config.segmentation);

    match matches.subcommand() {
        Some(("health", _)) => {
            let health = session.health().await?;
            println!("{}", health.status);
            if !health.is_ok() {
                bail!("backend reported '{}'", health.status);
            }
        }
        Some(("graph", args)) => {
            let graph = session.refresh().await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&*graph)?);
            } else if args.get_flag("render") {
                println!("{}", serde_json::to_string_pretty(&convert(&graph))?);
            } else {
                print_summary(&graph);
            }
        }
        Some(("upload", args)) => {
            let files: Vec<&PathBuf> = args
                .get_many::<PathBuf>("files")
                .context("missing argument <files>")?
                .collect();
            let batch = UploadBatch::from_paths(&files).await?;
            let names: Vec<&str> = batch.names().collect();
            println!("Uploading {}", names.join(", "));

            let session = session.with_segmentation(segmentation(args, config.segmentation));
            let graph = session.upload(batch).await?;
            print_summary(&graph);
        }
        Some(("chat", args)) => {
            let answer = session
                .ask(arg(args, "message")?, !args.get_flag("full-context"))
                .await?;
            println!("{}", answer.text);
            if !answer.sources.is_empty() {
                println!();
                println!("Sources: {}", answer.sources.join(", "));
            }
            let relevant = session.store().current_relevant_subgraph();
            if !relevant.is_empty() {
                println!();
                print_summary(&relevant);
            }
        }
        Some(("add-node", args)) => {
            let command = EditCommand::add_node(arg(args, "name")?)?;
            report(&session.apply(&command).await?);
        }
        Some(("rename-node", args)) => {
            let command = EditCommand::rename_node(arg(args, "old")?, arg(args, "new")?)?;
            report(&session.apply(&command).await?);
        }
        Some(("delete-node", args)) => {
            let name = arg(args, "name")?;
            let graph = session.refresh().await?;
            if !graph.contains_node(name) {
                bail!("no node named '{name}'");
            }
            let incident = convert(&graph).incident_edge_keys(name);
            let command = EditCommand::delete_node(name, &incident)?;
            report(&session.apply(&command).await?);
        }
        Some(("add-edge", args)) => {
            let command =
                EditCommand::add_edge(arg(args, "from")?, arg(args, "to")?, arg(args, "labels")?)?;
            report(&session.apply(&command).await?);
        }
        Some(("edit-edge", args)) => {
            let graph = session.refresh().await?;
            let key = convert(&graph).resolve_edge(arg(args, "edge-id")?)?;
            let command = EditCommand::edit_edge(&key, arg(args, "labels")?)?;
            report(&session.apply(&command).await?);
        }
        Some(("delete-edge", args)) => {
            let graph = session.refresh().await?;
            let key = convert(&graph).resolve_edge(arg(args, "edge-id")?)?;
            let command = EditCommand::delete_edge(&key);
            report(&session.apply(&command).await?);
        }
        _ => bail!("unknown command"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));
    run(matches).await
}
