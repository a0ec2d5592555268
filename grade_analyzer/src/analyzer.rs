use crate::command::{ActionFactory, Flow};
use crate::error::RosterError;
use crate::menu::EXIT_MESSAGE;
use crate::roster::Roster;
use anyhow::Result;
use log::{error, info};
use prompt_io::{LineSource, is_input_closed};
use std::io::Write;

const MENU_TITLE: &str = "--- Student Grade Analyzer ---";
const CHOICE_PROMPT: &str = "Enter your choice: ";

/// Factory allows creating instances of the built-in menu entries.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Why a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The user picked the exit entry.
    Exited,
    /// Input reached end of stream or was interrupted.
    InputClosed,
    /// An action failed unexpectedly; the error has already been reported.
    Aborted(anyhow::Error),
}

/// Menu-driven grade analyzer session.
///
/// Owns the [`Roster`] for the lifetime of the session and a list of
/// [`ActionFactory`] objects, queried in order to turn a typed choice into an
/// action. See [`Default`] for the built-in menu.
///
/// Example
/// ```
/// use grade_analyzer::{Analyzer, SessionEnd};
/// use prompt_io::ScriptedInput;
///
/// let mut analyzer = Analyzer::default();
/// let mut input = ScriptedInput::new(["1", "alice", "2", "alice", "90", "done", "5"]);
/// let mut out: Vec<u8> = Vec::new();
/// let end = analyzer.run(&mut input, &mut out).unwrap();
/// assert!(matches!(end, SessionEnd::Exited));
/// assert_eq!(analyzer.roster().get("Alice").unwrap().grades(), &[90]);
/// ```
pub struct Analyzer {
    roster: Roster,
    actions: Vec<Box<dyn ActionFactory>>,
}

impl Analyzer {
    /// Create an analyzer with an empty roster and a custom menu.
    pub fn new(actions: Vec<Box<dyn ActionFactory>>) -> Self {
        Self::with_roster(Roster::new(), actions)
    }

    /// Create an analyzer over an existing roster.
    pub fn with_roster(roster: Roster, actions: Vec<Box<dyn ActionFactory>>) -> Self {
        Self { roster, actions }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Run the action registered for `choice`.
    ///
    /// Unknown choices are reported to `output` and answered with
    /// [`Flow::Continue`].
    pub fn dispatch(
        &mut self,
        choice: &str,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
    ) -> Result<Flow> {
        for factory in &self.actions {
            if let Some(action) = factory.try_create(choice) {
                return action.execute(input, output, &mut self.roster);
            }
        }
        writeln!(output, "{}", RosterError::InvalidChoice)?;
        Ok(Flow::Continue)
    }

    /// Show the menu and dispatch choices until the session ends.
    ///
    /// Closing the input at any prompt ends the session gracefully. Any
    /// unexpected error is printed and stops the loop.
    ///
    /// Returns `Err` only if writing the closing message itself fails.
    pub fn run(&mut self, input: &mut dyn LineSource, output: &mut dyn Write) -> Result<SessionEnd> {
        info!("event=session_start actions={}", self.actions.len());
        loop {
            match self.step(input, output) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    info!("event=session_end reason=exit students={}", self.roster.len());
                    return Ok(SessionEnd::Exited);
                }
                Err(err) if is_input_closed(&err) => {
                    info!("event=session_end reason=input_closed students={}", self.roster.len());
                    writeln!(output, "\n{EXIT_MESSAGE}")?;
                    return Ok(SessionEnd::InputClosed);
                }
                Err(err) => {
                    error!("event=session_end reason=unexpected_error error={err:#}");
                    writeln!(output, "Unexpected error: {err:#}")?;
                    return Ok(SessionEnd::Aborted(err));
                }
            }
        }
    }

    fn step(&mut self, input: &mut dyn LineSource, output: &mut dyn Write) -> Result<Flow> {
        self.print_menu(output)?;
        let choice = input.read_line(CHOICE_PROMPT)?;
        self.dispatch(choice.trim(), input, output)
    }

    fn print_menu(&self, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "\n{MENU_TITLE}")?;
        for factory in &self.actions {
            writeln!(output, "{}. {}", factory.key(), factory.label())?;
        }
        output.flush()?;
        Ok(())
    }
}

impl Default for Analyzer {
    /// Create an analyzer with the built-in menu:
    /// add student, add grades, report, top student, exit.
    fn default() -> Self {
        use crate::menu::*;
        Self::new(vec![
            Box::new(Factory::<AddStudent>::default()),
            Box::new(Factory::<AddGrades>::default()),
            Box::new(Factory::<ShowReport>::default()),
            Box::new(Factory::<FindTopStudent>::default()),
            Box::new(Factory::<Exit>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MenuAction;
    use prompt_io::ScriptedInput;

    fn session(lines: &[&str]) -> (Analyzer, SessionEnd, String) {
        let mut analyzer = Analyzer::default();
        let mut input = ScriptedInput::new(lines.iter().copied());
        let mut out: Vec<u8> = Vec::new();
        let end = analyzer.run(&mut input, &mut out).unwrap();
        (analyzer, end, String::from_utf8(out).unwrap())
    }

    struct Broken;

    impl MenuAction for Broken {
        fn execute(
            self: Box<Self>,
            _input: &mut dyn LineSource,
            _output: &mut dyn Write,
            _roster: &mut Roster,
        ) -> Result<Flow> {
            Err(anyhow::anyhow!("roster storage corrupted"))
        }
    }

    struct BrokenFactory;

    impl ActionFactory for BrokenFactory {
        fn key(&self) -> &'static str {
            "9"
        }

        fn label(&self) -> &'static str {
            "Break things"
        }

        fn try_create(&self, choice: &str) -> Option<Box<dyn MenuAction>> {
            (choice == "9").then(|| Box::new(Broken) as Box<dyn MenuAction>)
        }
    }

    #[test]
    fn test_menu_lists_all_entries() {
        let (_, _, out) = session(&["5"]);
        assert!(out.starts_with(
            "\n--- Student Grade Analyzer ---\n\
             1. Add a new student\n\
             2. Add grades for a student\n\
             3. Generate a full report\n\
             4. Find the top student\n\
             5. Exit program\n"
        ));
    }

    #[test]
    fn test_invalid_choice_is_reported_and_loop_continues() {
        let (_, end, out) = session(&["9", "5"]);

        assert!(matches!(end, SessionEnd::Exited));
        assert!(out.contains("Invalid choice. Please select one of the suggested options (1-5).\n"));
        assert_eq!(out.matches(MENU_TITLE).count(), 2);
        assert!(out.ends_with("Exiting program.\n"));
    }

    #[test]
    fn test_exit_choice_stops_reading_input() {
        let mut analyzer = Analyzer::default();
        let mut input = ScriptedInput::new(["5", "1", "alice"]);
        let mut out: Vec<u8> = Vec::new();

        let end = analyzer.run(&mut input, &mut out).unwrap();

        assert!(matches!(end, SessionEnd::Exited));
        assert_eq!(input.remaining(), 2);
        assert!(analyzer.roster().is_empty());
    }

    #[test]
    fn test_choice_is_trimmed() {
        let (analyzer, end, _) = session(&[" 1 ", "alice", " 5"]);
        assert!(matches!(end, SessionEnd::Exited));
        assert_eq!(analyzer.roster().len(), 1);
    }

    #[test]
    fn test_end_of_input_at_menu_exits_gracefully() {
        let (_, end, out) = session(&[]);
        assert!(matches!(end, SessionEnd::InputClosed));
        assert!(out.ends_with("\nExiting program.\n"));
    }

    #[test]
    fn test_end_of_input_inside_grade_entry_exits_gracefully() {
        let (analyzer, end, out) = session(&["1", "Alice", "2", "alice", "80"]);

        assert!(matches!(end, SessionEnd::InputClosed));
        assert!(out.ends_with("\nExiting program.\n"));
        assert_eq!(analyzer.roster().get("alice").unwrap().grades(), &[80]);
    }

    #[test]
    fn test_full_session_report() {
        let (_, end, out) = session(&[
            "1", "alice", "1", "bob", "1", "ALICE", "2", "alice", "80", "90", "done", "3", "4", "5",
        ]);

        assert!(matches!(end, SessionEnd::Exited));
        assert!(out.contains("Student Alice already exists.\n"));
        assert!(out.contains(
            "--- Student Report ---\n\
             Alice's average grade is 85.0.\n\
             Bob's average grade is N/A.\n\
             --------------------------\n\
             Max Average: 85.0\n\
             Min Average: 85.0\n\
             Overall Average: 85.0\n"
        ));
        assert!(out.contains("The student with highest average is Alice with a grade of 85.0\n"));
    }

    #[test]
    fn test_unexpected_error_stops_the_loop() {
        let mut analyzer = Analyzer::new(vec![
            Box::new(BrokenFactory),
            Box::new(Factory::<crate::menu::Exit>::default()),
        ]);
        let mut input = ScriptedInput::new(["9", "5"]);
        let mut out: Vec<u8> = Vec::new();

        let end = analyzer.run(&mut input, &mut out).unwrap();

        assert!(matches!(end, SessionEnd::Aborted(ref err) if err.to_string() == "roster storage corrupted"));
        assert_eq!(input.remaining(), 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Unexpected error: roster storage corrupted\n"));
    }

    #[test]
    fn test_dispatch_runs_single_action() {
        let mut analyzer = Analyzer::default();
        let mut input = ScriptedInput::new(["carol"]);
        let mut out: Vec<u8> = Vec::new();

        let flow = analyzer.dispatch("1", &mut input, &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(analyzer.roster().get("Carol").is_some());
    }
}
