use anyhow::Result;
use argh::FromArgs;
use grade_analyzer::{Analyzer, SessionEnd};
use prompt_io::logging::{DEFAULT_LOG_LEVEL, init_logging};
use prompt_io::{EditorInput, LineSource, PipedInput};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Keep a list of students and their grades, then report averages and the top student.
struct Args {
    #[argh(option, default = "DEFAULT_LOG_LEVEL.to_string()")]
    /// log verbosity: trace, debug, info, warn or error.
    log_level: String,

    #[argh(option)]
    /// absolute directory for rotating log files; logs go to stderr when omitted.
    log_dir: Option<PathBuf>,

    #[argh(switch)]
    /// read plain lines from stdin instead of using the line editor.
    plain: bool,
}

fn main() -> Result<ExitCode> {
    let args: Args = argh::from_env();
    let _logger = init_logging(&args.log_level, args.log_dir.as_deref(), "grade_analyzer")?;

    let mut input: Box<dyn LineSource> = if args.plain || !io::stdin().is_terminal() {
        Box::new(PipedInput::stdio())
    } else {
        Box::new(EditorInput::new()?)
    };

    let mut analyzer = Analyzer::default();
    match analyzer.run(input.as_mut(), &mut io::stdout())? {
        SessionEnd::Exited | SessionEnd::InputClosed => Ok(ExitCode::SUCCESS),
        SessionEnd::Aborted(_) => Ok(ExitCode::FAILURE),
    }
}
