use crate::cli::Output;
use crate::config::{HookcheckConfig, Settings};
use crate::git::GitRepo;
use crate::model::{PreCommitConfig, load_config};
use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

pub mod install;
pub mod list;
pub mod plan;
pub mod run;
pub mod settings;
pub mod show;
pub mod uninstall;
pub mod validate;
pub mod version;

#[derive(Parser)]
#[command(
    name = "hookcheck",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate, inspect and run pre-commit hook configurations",
    long_about = "hookcheck checks a .pre-commit-config.yaml for structural mistakes \
                  (missing revs, empty hook lists, duplicate hook ids), shows which \
                  hooks would run on which files, and runs the in-repository hooks."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Hooks configuration file [default: .pre-commit-config.yaml]
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Additional hookcheck settings file (toml, yaml or json)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check hooks configuration files for structural errors
    Validate(validate::ValidateArgs),
    /// List the configured hooks
    List(list::ListArgs),
    /// Show which hooks would run on which files
    Plan(plan::PlanArgs),
    /// Run hooks against staged, changed or all files
    Run(run::RunArgs),
    /// Install git hook shims that call hookcheck
    Install(install::InstallArgs),
    /// Remove hook shims installed by hookcheck
    Uninstall(uninstall::UninstallArgs),
    /// Print the hooks configuration with syntax highlighting
    Show(show::ShowArgs),
    /// Print the merged hookcheck settings
    Settings(settings::SettingsArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Machine-readable or human output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// State shared by every command after global flags are applied
pub struct Context {
    pub output: Output,
    pub config: HookcheckConfig,
    pub settings: Settings,
    /// Set when the hooks file was given with `--config`
    explicit_hooks_config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {dir}"))?;
        }

        setup_logging(self.verbose, self.quiet);

        let config = HookcheckConfig::load_with_custom_config(self.settings.as_deref())?;
        let settings = config.settings().context("Invalid hookcheck settings")?;
        if !settings.general.color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let ctx = Context {
            output: Output::new(self.verbose > 0, self.quiet),
            config,
            settings,
            explicit_hooks_config: self.config,
        };

        match self.command {
            Some(Commands::Validate(args)) => validate::execute(args, &ctx).await,
            Some(Commands::List(args)) => list::execute(args, &ctx).await,
            Some(Commands::Plan(args)) => plan::execute(args, &ctx).await,
            Some(Commands::Run(args)) => run::execute(args, &ctx).await,
            Some(Commands::Install(args)) => install::execute(args, &ctx).await,
            Some(Commands::Uninstall(args)) => uninstall::execute(args, &ctx).await,
            Some(Commands::Show(args)) => show::execute(args, &ctx).await,
            Some(Commands::Settings(args)) => settings::execute(args, &ctx).await,
            Some(Commands::Version(args)) => version::execute(args, &ctx).await,
            None => {
                // Default to validating the hooks file, the most common check
                validate::execute(validate::ValidateArgs::default(), &ctx).await
            }
        }
    }
}

impl Context {
    /// Path of the hooks file: `--config` relative to the working
    /// directory, otherwise `general.hooks_config` at the repository root
    pub fn hooks_config_path(&self) -> PathBuf {
        if let Some(path) = &self.explicit_hooks_config {
            return path.clone();
        }
        let name = &self.settings.general.hooks_config;
        match GitRepo::discover(Path::new(".")).ok().as_ref().and_then(|g| g.workdir().ok()) {
            Some(workdir) => workdir.join(name),
            None => PathBuf::from(name),
        }
    }

    pub fn load_hooks_config(&self) -> Result<PreCommitConfig> {
        let path = self.hooks_config_path();
        load_config(&path).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn workspace(&self) -> Result<Workspace> {
        Workspace::open(self.hooks_config_path())
    }
}

/// The repository (or plain directory) hooks are planned against
pub struct Workspace {
    pub git: Option<GitRepo>,
    pub root: PathBuf,
    pub hooks_config: PathBuf,
    /// Hooks file relative to `root`, with `/` separators
    pub config_file: String,
}

impl Workspace {
    fn open(hooks_config: PathBuf) -> Result<Self> {
        let git = GitRepo::discover(Path::new(".")).ok();
        let root = match &git {
            Some(repo) => repo.workdir()?.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let config_file = relative_to(&root, &hooks_config);
        tracing::debug!("Workspace root {} (config {})", root.display(), config_file);
        Ok(Self {
            git,
            root,
            hooks_config,
            config_file,
        })
    }

    pub fn git(&self) -> Result<&GitRepo> {
        match &self.git {
            Some(repo) => Ok(repo),
            None => bail!("Not inside a git repository"),
        }
    }

    /// Every tracked file, or the explicit list outside a repository
    pub fn all_files(&self, fallback: &[String]) -> Result<Vec<String>> {
        match &self.git {
            Some(repo) => Ok(repo.tracked_files()?),
            None => Ok(fallback.to_vec()),
        }
    }
}

/// File selection shared by `plan` and `run`
#[derive(Args, Clone, Debug, Default)]
pub struct FileSelection {
    /// Use every tracked file instead of the staged ones
    #[arg(short, long, conflicts_with_all = ["files", "from_ref"])]
    pub all_files: bool,

    /// Use exactly these files (relative to the repository root)
    #[arg(long, num_args = 1.., conflicts_with = "from_ref")]
    pub files: Vec<String>,

    /// Use files changed between --from-ref and --to-ref
    #[arg(long, requires = "to_ref", value_name = "REV")]
    pub from_ref: Option<String>,

    #[arg(long, requires = "from_ref", value_name = "REV")]
    pub to_ref: Option<String>,
}

impl FileSelection {
    /// Whether any selection flag was given
    pub fn is_explicit(&self) -> bool {
        self.all_files || !self.files.is_empty() || self.from_ref.is_some()
    }

    pub fn resolve(&self, workspace: &Workspace) -> Result<Vec<String>> {
        if !self.files.is_empty() {
            return Ok(self.files.iter().map(|f| f.replace('\\', "/")).collect());
        }
        let repo = workspace
            .git()
            .context("Pass --files to select files outside a git repository")?;
        let files = if self.all_files {
            repo.tracked_files()?
        } else if let (Some(from), Some(to)) = (&self.from_ref, &self.to_ref) {
            repo.changed_files(from, to)?
        } else {
            repo.staged_files()?
        };
        Ok(files)
    }
}

pub(super) fn relative_to(root: &Path, path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    absolute
        .strip_prefix(&root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stage;

    #[test]
    fn test_cli_parses_global_flags() {
        let argv = ["hookcheck", "-vv", "-c", "custom.yaml", "validate", "--strict"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Some(Commands::Validate(ref a)) if a.strict));
    }

    /// argv of the installed shim script with `"$@"` replaced by `git_args`
    fn shim_argv(stage: Stage, git_args: &[&str]) -> Vec<String> {
        let script = crate::git::hook_script(stage, ".pre-commit-config.yaml");
        let exec_line = script.lines().find(|l| l.starts_with("exec ")).unwrap();
        let mut argv = shlex::split(exec_line).unwrap();
        argv.remove(0);
        let at = argv.iter().position(|arg| arg == "$@").unwrap();
        argv.splice(at..=at, git_args.iter().map(|arg| arg.to_string()));
        argv
    }

    fn parse_run(argv: Vec<String>) -> run::RunArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Run(args)) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_hook_shim_parses_without_git_arguments() {
        let args = parse_run(shim_argv(Stage::PreCommit, &[]));
        assert_eq!(args.hook_stage, Stage::PreCommit);
        assert_eq!(args.hook, None);
        assert!(args.hook_args.is_empty());
    }

    #[test]
    fn test_hook_shim_forwards_git_arguments() {
        let args = parse_run(shim_argv(
            Stage::PrePush,
            &["origin", "https://example.com/repo.git"],
        ));
        assert_eq!(args.hook_stage, Stage::PrePush);
        assert_eq!(args.hook, None);
        assert_eq!(args.hook_args, vec!["origin", "https://example.com/repo.git"]);

        let args = parse_run(shim_argv(Stage::CommitMsg, &[".git/COMMIT_EDITMSG"]));
        assert_eq!(args.hook, None);
        assert_eq!(args.hook_args, vec![".git/COMMIT_EDITMSG"]);

        // Flag-like arguments must not be taken as hookcheck options
        let args = parse_run(shim_argv(Stage::PostCheckout, &["abc123", "def456", "1"]));
        assert_eq!(args.hook, None);
        assert_eq!(args.hook_args.len(), 3);
    }

    #[test]
    fn test_run_hook_id_and_git_arguments_together() {
        let args = parse_run(
            ["hookcheck", "run", "mypy", "--", "--all-files"]
                .map(String::from)
                .to_vec(),
        );
        assert_eq!(args.hook.as_deref(), Some("mypy"));
        assert!(!args.selection.all_files);
        assert_eq!(args.hook_args, vec!["--all-files"]);
    }

    #[test]
    fn test_file_selection_conflicts() {
        let both = ["hookcheck", "plan", "--all-files", "--files", "a.py"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["hookcheck", "plan", "--from-ref", "HEAD~1"]).is_err());
    }

    #[test]
    fn test_relative_to_root() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = temp_dir.path().join(".pre-commit-config.yaml");
        std::fs::write(&config, "repos: []\n").unwrap();
        assert_eq!(relative_to(temp_dir.path(), &config), ".pre-commit-config.yaml");
    }
}
