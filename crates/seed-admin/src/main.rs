use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use seed_admin::{catalog_report, compose, load_store, render_rows, save_store, CompositionDraft};
use seed_core::{delete_composition, list_compositions, AdminConfig, DocumentStore, SessionTarget};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("seed-admin")
        .version(seed_admin::VERSION)
        .about("Rice seed composition admin over a JSON store snapshot")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .default_value("seed-store.json")
                .value_parser(value_parser!(PathBuf))
                .help("Store snapshot file, created on first write"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file overriding collection names"),
        )
        .arg(
            Arg::new("read-only")
                .long("read-only")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Refuse every write"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging when RUST_LOG is unset"),
        )
        .subcommand(Command::new("catalog").about("Count reference catalog items"))
        .subcommand(
            Command::new("list").about("List stored compositions").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("compose")
                .about("Create or update a composition from a draft file")
                .arg(
                    Arg::new("draft")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Draft JSON file"),
                )
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help("Update the stored composition with this id"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a stored composition")
                .arg(Arg::new("id").required(true).help("Composition id")),
        )
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let fallback = if verbose {
        "seed_admin=debug,seed_core=debug,seed_composition=debug"
    } else {
        "seed_admin=info,seed_core=info"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"))?;

    let store_path = matches
        .get_one::<PathBuf>("store")
        .cloned()
        .context("missing --store")?;
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AdminConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AdminConfig::default(),
    };
    let is_authorized = !matches.get_flag("read-only");
    let store = Arc::new(
        load_store(&store_path)
            .with_context(|| format!("loading store {}", store_path.display()))?,
    );

    match matches.subcommand() {
        Some(("catalog", _)) => {
            println!("{}", catalog_report(&*store, &config).await?);
        }
        Some(("list", args)) => {
            let rows = list_compositions(&*store, &config).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_rows(&rows));
            }
        }
        Some(("compose", args)) => {
            let path = args.get_one::<PathBuf>("draft").context("missing draft")?;
            let draft = CompositionDraft::load(path)
                .with_context(|| format!("reading draft {}", path.display()))?;
            let target = args
                .get_one::<String>("id")
                .map_or(SessionTarget::New, |id| SessionTarget::Existing(id.clone()));

            let shared: Arc<dyn DocumentStore> = Arc::clone(&store) as Arc<dyn DocumentStore>;
            let receipt = compose(shared, config, &draft, target, is_authorized).await?;
            save_store(&store, &store_path)?;
            println!(
                "{} composition {} (ingredient total {})",
                if receipt.inserted { "Created" } else { "Updated" },
                receipt.id,
                receipt.ingredient_total_price
            );
        }
        Some(("delete", args)) => {
            let id = args.get_one::<String>("id").context("missing id")?;
            delete_composition(&*store, &config, id, is_authorized).await?;
            save_store(&store, &store_path)?;
            println!("Deleted composition {id}");
        }
        Some((other, _)) => anyhow::bail!("unknown command {other}"),
        None => anyhow::bail!("no command given"),
    }
    Ok(())
}
