use clap::{ArgAction, Parser};

use crate::error::{TiniError, TiniResult};

/// Raw argv shape. Parsing is deliberately thin: it just turns argv
/// into an `Opts`, the supervision loop (`src/supervisor`) does not
/// know this type exists.
#[derive(Parser, Debug, Default)]
#[command(
    name = "tini",
    disable_help_flag = true,
    disable_version_flag = true,
    override_usage = "tini [OPTIONS] PROGRAM [ARGS...]"
)]
struct Opts {
    /// Print the usage banner and exit.
    #[arg(short = 'h', action = ArgAction::SetTrue)]
    help: bool,

    /// Increase verbosity. May be repeated up to 4 times.
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,

    /// The program to run as the main child, plus its arguments.
    ///
    /// Deliberately NOT `allow_hyphen_values`: only once `PROGRAM`
    /// (the first, non-dash value) has started this positional does
    /// `trailing_var_arg` let later hyphen-prefixed tokens (the
    /// child's own flags) ride along unparsed. A dash-prefixed token
    /// appearing before that point is still treated as one of our
    /// own options and rejected if unrecognized.
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// The outcome of parsing argv: either "print the usage banner and
/// exit 0" or a fully resolved configuration to run the supervisor
/// with.
#[derive(Debug)]
pub enum Cmd {
    Help,
    Run(Config),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub verbosity: u8,
    pub program: String,
    pub args: Vec<String>,
}

const OPTION_LIST: &str = "\
Options:
  -h            Print this usage banner and exit
  -v            Increase verbosity (repeatable up to 4 times)";

/// Render the usage banner: program name, version, git commit,
/// invocation shape, option list.
pub fn usage_banner() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_commit = option_env!("GIT_COMMIT").unwrap_or("unknown");
    format!(
        "tini version {version} (commit {git_commit})\n\
         Usage: tini [OPTIONS] PROGRAM [ARGS...]\n\n\
         {OPTION_LIST}"
    )
}

/// Parse argv (including argv[0]) into a `Cmd`, or a fatal error for
/// an unrecognized option or a missing `PROGRAM`. The caller is
/// responsible for printing `usage_banner()` to the right stream
/// (stdout for `-h`, stderr otherwise) based on which case fired.
pub fn determine_cmd<I, T>(argv: I) -> TiniResult<Cmd>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let opts = Opts::try_parse_from(argv)?;

    if opts.help {
        return Ok(Cmd::Help);
    }

    if opts.command.is_empty() {
        return Err(TiniError::new("no PROGRAM given", 1));
    }

    let mut command = opts.command;
    let program = command.remove(0);
    Ok(Cmd::Run(Config {
        verbosity: opts.verbosity.min(4),
        program,
        args: command,
    }))
}
