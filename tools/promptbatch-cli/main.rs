use clap::Parser;
use promptbatch::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Queue a batch of prompts against a node workflow server
///
/// Workflow arguments follow the options above as `--name value` or
/// `--name=value` and must be named in the mapping file, e.g.
/// `promptbatch-cli --workflow-file flux.json --prompt-file prompts.txt --steps 30`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file (API format)
    #[arg(long, alias = "workflow_file")]
    workflow_file: PathBuf,

    /// Path to the prompt file
    #[arg(long, alias = "prompt_file")]
    prompt_file: PathBuf,

    /// Path to the mapping file [default: the workflow path with a .map extension]
    #[arg(long, alias = "mapping_file")]
    mapping_file: Option<PathBuf>,

    /// Server address to submit to
    #[arg(long, alias = "server_addr", env = "PROMPTBATCH_SERVER_ADDR", default_value = ServerConfig::DEFAULT_ADDR)]
    server_addr: String,

    /// Bearer token sent with every request
    #[arg(long, alias = "auth_token", env = "PROMPTBATCH_AUTH_TOKEN")]
    auth_token: Option<String>,

    /// Text placed before every prompt
    #[arg(long, alias = "prompt_prepend")]
    prompt_prepend: Option<String>,

    /// Text placed after every prompt
    #[arg(long, alias = "prompt_append")]
    prompt_append: Option<String>,

    /// Cut prompts to this many characters (0 = no limit)
    #[arg(long, alias = "prompt_truncate", default_value_t = 0)]
    prompt_truncate: usize,

    /// Set a workflow argument, e.g. `--set steps=30`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Print each resolved workflow instead of submitting it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Workflow arguments as `--name value` pairs, after all other flags
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        value_name = "ARGS"
    )]
    workflow_args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();

    // --- 1. Arguments ---
    let mut args = UserArgs::from_flags(&cli.workflow_args)?;
    args.merge(UserArgs::from_pairs(cli.set.iter().map(String::as_str))?);

    // --- 2. File Loading ---
    let mapping_path = cli
        .mapping_file
        .clone()
        .unwrap_or_else(|| MappingTable::default_path_for(&cli.workflow_file));

    info!("Loading prompts from: {}", cli.prompt_file.display());
    let prompts = PromptStream::from_file(&cli.prompt_file)?;
    info!("Loading workflow from: {}", cli.workflow_file.display());
    let mut graph = WorkflowGraph::from_file(&cli.workflow_file)?;
    info!("Loading mapping from: {}", mapping_path.display());
    let mapping = MappingTable::from_file(&mapping_path)?;

    // --- 3. Binding ---
    let bindings = BindingSetBuilder::new(&mapping)
        .with_args(args)
        .with_default("seed", "random")
        .build(&graph)?;

    let options = PromptOptions {
        prepend: cli.prompt_prepend,
        append: cli.prompt_append,
        truncate: cli.prompt_truncate,
    };

    // --- 4. Dispatch ---
    let summary = if cli.dry_run {
        let submitter = DryRunSubmitter::new(io::stdout().lock());
        Dispatcher::new(bindings, submitter)
            .with_prompt_options(options)
            .run(&mut graph, prompts)
    } else {
        let server = ServerConfig::new(&cli.server_addr, cli.auth_token);
        info!("Sending prompts to {}", server.addr);
        Dispatcher::new(bindings, HttpSubmitter::new(server))
            .with_prompt_options(options)
            .run(&mut graph, prompts)
    };

    // --- 5. Summary ---
    if !summary.failures.is_empty() {
        warn!(
            "{} of {} prompt(s) could not be sent",
            summary.failures.len(),
            summary.prompts
        );
    }
    info!(
        "Done! Queued {} prompt(s), {} directive(s) applied, {} ignored, in {:?}",
        summary.queued,
        summary.directives_applied,
        summary.directives_rejected,
        start.elapsed()
    );
    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    eprintln!("Aborting!");
    std::process::exit(1);
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::CommandFactory;

    const BASE: [&str; 5] = [
        "promptbatch-cli",
        "--workflow-file",
        "flux.json",
        "--prompt-file",
        "prompts.txt",
    ];

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(BASE.iter().chain(extra)).expect("command line parses")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_workflow_args_follow_base_flags() {
        let cli = parse(&["--dry-run", "--steps", "30", "--filename-prefix=<prompt>"]);
        assert!(cli.dry_run);
        assert_eq!(
            cli.workflow_args,
            vec!["--steps", "30", "--filename-prefix=<prompt>"]
        );

        let args = UserArgs::from_flags(&cli.workflow_args).unwrap();
        assert_eq!(args.get("filename_prefix"), Some("<prompt>"));
    }

    #[test]
    fn test_workflow_args_after_separator() {
        let cli = parse(&["--", "--seed", "-1"]);
        assert_eq!(cli.workflow_args, vec!["--seed", "-1"]);
    }

    #[test]
    fn test_base_flags_without_workflow_args() {
        let cli = parse(&["--server-addr", "http://gpu:8188/", "--prompt-truncate", "50"]);
        assert!(cli.workflow_args.is_empty());
        assert_eq!(cli.prompt_truncate, 50);
        assert_eq!(cli.server_addr, "http://gpu:8188/");
    }
}
