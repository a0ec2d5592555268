use anyhow::Result;
use argh::FromArgs;
use log::warn;
use prompt_io::logging::{DEFAULT_LOG_LEVEL, init_logging};
use prompt_io::{EditorInput, LineSource, PipedInput, is_input_closed};
use profile_generator::{DEFAULT_CURRENT_YEAR, collect_profile};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Ask for a name, birth year and hobbies, then print a profile summary.
struct Args {
    #[argh(option, default = "DEFAULT_CURRENT_YEAR")]
    /// year used to compute the age.
    current_year: i32,

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
    let _logger = init_logging(&args.log_level, args.log_dir.as_deref(), "profile_generator")?;

    let mut input: Box<dyn LineSource> = if args.plain || !io::stdin().is_terminal() {
        Box::new(PipedInput::stdio())
    } else {
        Box::new(EditorInput::new()?)
    };

    match collect_profile(input.as_mut(), &mut io::stdout(), args.current_year) {
        Ok(profile) => {
            println!("\n{profile}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if is_input_closed(&err) => {
            warn!("event=profile_aborted reason=input_closed");
            eprintln!("\nInput closed before the profile was complete.");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}
