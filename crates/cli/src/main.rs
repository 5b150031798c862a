use abi_lens::commands::{
    categorize_command, clear_deployments_command, correlate_command, dataset_name_command,
    init_project_command, list_deployments_command, project_info_command, queries_command,
    record_deployment_command, remove_deployment_command, show_deployment_command,
};
use abi_lens::init_logging;
use anyhow::Result;
use clap::{Parser, Subcommand};

/// Map a contract's ABI onto the event tables an indexer builds for it.
///
/// This CLI is a thin wrapper around `lens-core` (exposed in code as `lens_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "abi-lens",
    version,
    about = "Contract function/event mapping and query generation",
    long_about = None
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new project at the given root.
    ///
    /// This will:
    /// - Create a `.lens` metadata directory and a `reports` directory.
    /// - Write a `.lens/project.json` config file.
    /// - Create the project database.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Dataset namespace for new deployments (default: eth_global).
        #[arg(long)]
        namespace: Option<String>,
    },

    /// Show basic information about an existing project.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Split an ABI into read functions, write functions, and events.
    Categorize {
        /// ABI JSON file (bare array or compiler artifact with an `abi` field).
        #[arg(long)]
        abi: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Work out which events each write function emits.
    Correlate {
        /// Project root; its similarity thresholds are used when present.
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        abi: String,

        /// Contract source file.
        #[arg(long)]
        source: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Generate SQL queries against the dataset indexing the contract's events.
    Queries {
        /// Project root; its query row caps are used when present.
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        abi: String,

        /// Dataset id, e.g. `eth_global/counter_1700000000000@dev`.
        #[arg(long)]
        dataset: String,

        /// Restrict rows to this contract address (0x-prefixed).
        #[arg(long)]
        address: Option<String>,

        /// Exploration menu instead of chart queries.
        #[arg(long, default_value_t = false)]
        explore: bool,

        /// Write the queries to a .json, .yaml or .yml file instead of stdout.
        #[arg(long)]
        out: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the dataset id for the contract defined in a source file.
    DatasetName {
        #[arg(long)]
        source: String,

        #[arg(long)]
        namespace: Option<String>,

        /// Millisecond timestamp; defaults to now.
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Record a deployment, cache its emission map, and export its report.
    RecordDeployment {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        abi: String,

        #[arg(long)]
        source: String,

        /// Deployed contract address (0x-prefixed).
        #[arg(long)]
        address: String,

        /// Deployment transaction hash.
        #[arg(long)]
        tx: String,

        /// Contract name. Defaults to the first contract defined in the source.
        #[arg(long)]
        name: Option<String>,

        /// Dataset id. Defaults to one derived from the project namespace and contract name.
        #[arg(long)]
        dataset: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List all deployments recorded in the project database.
    ListDeployments {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the full report for a recorded deployment.
    ShowDeployment {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        address: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Forget a recorded deployment and delete its exported report.
    RemoveDeployment {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        address: String,
    },

    /// Forget every recorded deployment in the project database.
    ClearDeployments {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("abi-lens v{}", lens_core::version());
        println!("Run `abi-lens --help` to list commands.");
        return Ok(());
    };

    match command {
        Command::InitProject { root, name, namespace } => {
            init_project_command(&root, name, namespace)?
        }
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::Categorize { abi, json } => categorize_command(&abi, json)?,
        Command::Correlate { root, abi, source, json } => {
            correlate_command(&root, &abi, &source, json)?
        }
        Command::Queries { root, abi, dataset, address, explore, out, json } => queries_command(
            &root,
            &abi,
            &dataset,
            address.as_deref(),
            explore,
            out.as_deref(),
            json,
        )?,
        Command::DatasetName { source, namespace, timestamp } => {
            dataset_name_command(&source, namespace.as_deref(), timestamp)?
        }
        Command::RecordDeployment { root, abi, source, address, tx, name, dataset, json } => {
            record_deployment_command(&root, &abi, &source, &address, &tx, name, dataset, json)?
        }
        Command::ListDeployments { root, json } => list_deployments_command(&root, json)?,
        Command::ShowDeployment { root, address, json } => {
            show_deployment_command(&root, &address, json)?
        }
        Command::RemoveDeployment { root, address } => {
            remove_deployment_command(&root, &address)?
        }
        Command::ClearDeployments { root } => clear_deployments_command(&root)?,
    }

    Ok(())
}
