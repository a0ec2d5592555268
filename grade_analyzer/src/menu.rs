use crate::analyzer::Factory;
use crate::command::{ActionFactory, Flow, MenuAction};
use crate::error::RosterError;
use crate::roster::{GradeSubmission, Roster};
use anyhow::Result;
use log::debug;
use prompt_io::LineSource;
use std::io::Write;

const NAME_PROMPT: &str = "Enter student name: ";
const GRADE_PROMPT: &str = "Enter a grade (or 'done' to finish): ";

/// Text printed when the session ends, by choice or by closing input.
pub const EXIT_MESSAGE: &str = "Exiting program.";

/// Menu entries known at compile time.
///
/// Returning a [`RosterError`] from `execute` is the normal way to report an
/// expected problem: the blanket [`MenuAction`] impl prints it and keeps the
/// menu running. Any other error ends the session.
pub(crate) trait MenuCommand: Default {
    const KEY: &'static str;
    const LABEL: &'static str;

    fn execute(
        self,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow>;
}

impl<T: MenuCommand> MenuAction for T {
    fn execute(
        self: Box<Self>,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow> {
        match <T as MenuCommand>::execute(*self, input, output, roster) {
            Ok(flow) => Ok(flow),
            Err(err) => match err.downcast::<RosterError>() {
                Ok(expected) => {
                    debug!("event=action_rejected action={} reason={expected:?}", T::KEY);
                    writeln!(output, "{expected}")?;
                    Ok(Flow::Continue)
                }
                Err(unexpected) => Err(unexpected),
            },
        }
    }
}

impl<T: MenuCommand + 'static> ActionFactory for Factory<T> {
    fn key(&self) -> &'static str {
        T::KEY
    }

    fn label(&self) -> &'static str {
        T::LABEL
    }

    fn try_create(&self, choice: &str) -> Option<Box<dyn MenuAction>> {
        if choice == T::KEY {
            Some(Box::new(T::default()))
        } else {
            None
        }
    }
}

/// Register a new student by name.
#[derive(Default)]
pub struct AddStudent;

impl MenuCommand for AddStudent {
    const KEY: &'static str = "1";
    const LABEL: &'static str = "Add a new student";

    fn execute(
        self,
        input: &mut dyn LineSource,
        _output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow> {
        let raw = input.read_line(NAME_PROMPT)?;
        roster.add_student(&raw)?;
        Ok(Flow::Continue)
    }
}

/// Append grades to an existing student until `done`.
#[derive(Default)]
pub struct AddGrades;

impl MenuCommand for AddGrades {
    const KEY: &'static str = "2";
    const LABEL: &'static str = "Add grades for a student";

    fn execute(
        self,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow> {
        let raw = input.read_line(NAME_PROMPT)?;
        let mut entry = roster.grade_entry(&raw)?;
        loop {
            let token = input.read_line(GRADE_PROMPT)?;
            match entry.submit(&token) {
                Ok(GradeSubmission::Finished) => break,
                Ok(GradeSubmission::Appended(_)) => {}
                Err(err) => writeln!(output, "{err}")?,
            }
        }
        Ok(Flow::Continue)
    }
}

/// Print every student's average and the roster statistics.
#[derive(Default)]
pub struct ShowReport;

impl MenuCommand for ShowReport {
    const KEY: &'static str = "3";
    const LABEL: &'static str = "Generate a full report";

    fn execute(
        self,
        _input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow> {
        writeln!(output, "{}", roster.report())?;
        Ok(Flow::Continue)
    }
}

/// Print the student with the highest average.
#[derive(Default)]
pub struct FindTopStudent;

impl MenuCommand for FindTopStudent {
    const KEY: &'static str = "4";
    const LABEL: &'static str = "Find the top student";

    fn execute(
        self,
        _input: &mut dyn LineSource,
        output: &mut dyn Write,
        roster: &mut Roster,
    ) -> Result<Flow> {
        writeln!(output, "{}", roster.top_student())?;
        Ok(Flow::Continue)
    }
}

/// Leave the menu.
#[derive(Default)]
pub struct Exit;

impl MenuCommand for Exit {
    const KEY: &'static str = "5";
    const LABEL: &'static str = "Exit program";

    fn execute(
        self,
        _input: &mut dyn LineSource,
        output: &mut dyn Write,
        _roster: &mut Roster,
    ) -> Result<Flow> {
        writeln!(output, "{EXIT_MESSAGE}")?;
        Ok(Flow::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_io::{ScriptedInput, is_input_closed};

    fn run<T: MenuCommand>(lines: &[&str], roster: &mut Roster) -> (Result<Flow>, String) {
        let mut input = ScriptedInput::new(lines.iter().copied());
        let mut out: Vec<u8> = Vec::new();
        let flow = MenuAction::execute(Box::new(T::default()), &mut input, &mut out, roster);
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_student_reports_duplicates_and_continues() {
        let mut roster = Roster::new();
        let (flow, out) = run::<AddStudent>(&["john"], &mut roster);
        assert_eq!(flow.unwrap(), Flow::Continue);
        assert!(out.is_empty());

        let (flow, out) = run::<AddStudent>(&[" JOHN "], &mut roster);
        assert_eq!(flow.unwrap(), Flow::Continue);
        assert_eq!(out, "Student John already exists.\n");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_student_reports_invalid_name() {
        let mut roster = Roster::new();
        let (flow, out) = run::<AddStudent>(&["John3"], &mut roster);
        assert_eq!(flow.unwrap(), Flow::Continue);
        assert_eq!(out, format!("{}\n", RosterError::InvalidName));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_add_grades_skips_bad_tokens() {
        let mut roster = Roster::new();
        roster.add_student("Alice").unwrap();

        let (flow, out) = run::<AddGrades>(
            &["alice", "101", "-1", "abc", "0", "100", "Done"],
            &mut roster,
        );
        assert_eq!(flow.unwrap(), Flow::Continue);
        assert_eq!(
            out,
            "Invalid input. Grade must be between 0 and 100.\n\
             Invalid input. Grade must be between 0 and 100.\n\
             Invalid input. Please enter a number.\n"
        );
        assert_eq!(roster.get("Alice").unwrap().grades(), &[0, 100]);
    }

    #[test]
    fn test_add_grades_for_unknown_student_stops_early() {
        let mut roster = Roster::new();
        let mut input = ScriptedInput::new(["bob", "90", "done"]);
        let mut out: Vec<u8> = Vec::new();

        let flow = MenuAction::execute(Box::new(AddGrades), &mut input, &mut out, &mut roster);

        assert_eq!(flow.unwrap(), Flow::Continue);
        assert_eq!(String::from_utf8(out).unwrap(), "Student Bob doesn't exist.\n");
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn test_add_grades_propagates_closed_input() {
        let mut roster = Roster::new();
        roster.add_student("Alice").unwrap();

        let (flow, _) = run::<AddGrades>(&["Alice", "90"], &mut roster);

        assert!(is_input_closed(&flow.unwrap_err()));
        assert_eq!(roster.get("Alice").unwrap().grades(), &[90]);
    }

    #[test]
    fn test_report_and_top_student_write_summaries() {
        let mut roster = Roster::new();
        let (_, out) = run::<ShowReport>(&[], &mut roster);
        assert!(out.ends_with("No students found or no grades were entered.\n"));

        let (_, out) = run::<FindTopStudent>(&[], &mut roster);
        assert_eq!(out, "No students found or no grades were entered.\n");
    }

    #[test]
    fn test_exit_ends_the_menu() {
        let mut roster = Roster::new();
        let (flow, out) = run::<Exit>(&[], &mut roster);
        assert_eq!(flow.unwrap(), Flow::Exit);
        assert_eq!(out, "Exiting program.\n");
    }

    #[test]
    fn test_factory_matches_only_its_key() {
        let factory = Factory::<ShowReport>::default();
        assert_eq!(factory.key(), "3");
        assert_eq!(factory.label(), "Generate a full report");
        assert!(factory.try_create("3").is_some());
        assert!(factory.try_create("4").is_none());
        assert!(factory.try_create(" 3").is_none());
    }
}
