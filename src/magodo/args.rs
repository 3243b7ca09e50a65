use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, with the git hash appended for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("MAGODO_GIT_HASH");
    const IS_RELEASE: &str = env!("MAGODO_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "magodo", version = get_version())]
#[command(about = "Normalize, sort, and check todo.txt lines read from stdin", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Skip all spells and use the bare todo.txt grammar
    #[arg(long, global = true)]
    pub plain: bool,

    /// Require an explicit priority or an x/o marker on every line
    #[arg(long, global = true)]
    pub strict: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite every line in canonical form
    #[command(alias = "format")]
    Fmt,

    /// Print todos sorted, optionally filtered
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Report lines that cannot be read
    Check,
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    /// Context filter (`home`, `-home` to exclude, `home.*` for children)
    #[arg(short, long = "context", value_name = "CTX", allow_hyphen_values = true)]
    pub contexts: Vec<String>,

    /// Project filter (same forms as --context)
    #[arg(short, long = "project", value_name = "PROJ", allow_hyphen_values = true)]
    pub projects: Vec<String>,

    /// Epic filter (same forms as --context)
    #[arg(short, long = "epic", value_name = "EPIC", allow_hyphen_values = true)]
    pub epics: Vec<String>,

    /// Only show these priorities (e.g. --priority A --priority B)
    #[arg(long = "priority", value_name = "LETTER")]
    pub priorities: Vec<char>,

    /// Only show done todos
    #[arg(long, conflicts_with = "open")]
    pub done: bool,

    /// Only show open todos
    #[arg(long)]
    pub open: bool,

    /// Description substring (case-insensitive when all lower-case)
    #[arg(short, long = "desc", value_name = "TEXT")]
    pub descs: Vec<String>,

    /// Metadata filter: KEY, KEY=VALUE, KEY!=VALUE, or KEY~TEXT
    #[arg(short, long = "meta", value_name = "FILTER")]
    pub metadata: Vec<String>,

    /// Print todos as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_filters() {
        let cli = Cli::parse_from([
            "magodo", "--strict", "ls", "-c", "home", "-c", "-work", "--priority", "A", "--open",
            "-m", "due",
        ]);
        assert!(cli.strict);
        let Commands::Ls(args) = cli.command else {
            panic!("expected ls");
        };
        assert_eq!(args.contexts, vec!["home", "-work"]);
        assert_eq!(args.priorities, vec!['A']);
        assert!(args.open);
        assert!(!args.done);
        assert_eq!(args.metadata, vec!["due"]);
    }

    #[test]
    fn done_and_open_conflict() {
        assert!(Cli::try_parse_from(["magodo", "ls", "--done", "--open"]).is_err());
    }
}
