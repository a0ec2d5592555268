use anyhow::Result;
use log::debug;
use prompt_io::{LineSource, is_input_closed};
use std::fmt;
use std::io::Write;

/// Year ages are computed against unless `--current-year` overrides it.
pub const DEFAULT_CURRENT_YEAR: i32 = 2025;

/// Token that ends hobby entry, compared case-insensitively.
pub const STOP_TOKEN: &str = "stop";

const NAME_PROMPT: &str = "Enter your full name: ";
const YEAR_PROMPT: &str = "Enter your birth year: ";
const HOBBY_PROMPT: &str = "Enter a favorite hobby or type 'stop' to finish: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeStage {
    Child,
    Teenager,
    Adult,
}

impl LifeStage {
    /// 0..=12 is a child, 13..=19 a teenager; everything else, negative ages
    /// included, is an adult.
    pub fn from_age(age: i32) -> Self {
        match age {
            0..=12 => LifeStage::Child,
            13..=19 => LifeStage::Teenager,
            _ => LifeStage::Adult,
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifeStage::Child => "Child",
            LifeStage::Teenager => "Teenager",
            LifeStage::Adult => "Adult",
        };
        f.write_str(name)
    }
}

/// Age reached in `current_year`, or `None` if it does not fit in an `i32`.
pub fn age_in(current_year: i32, birth_year: i32) -> Option<i32> {
    current_year.checked_sub(birth_year)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub age: i32,
    pub stage: LifeStage,
    pub hobbies: Vec<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, age: i32, hobbies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            age,
            stage: LifeStage::from_age(age),
            hobbies,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "Profile Summary:")?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Age: {}", self.age)?;
        writeln!(f, "Life stage: {}", self.stage)?;
        if self.hobbies.is_empty() {
            writeln!(f, "You didn't mention any hobbies.")?;
        } else {
            writeln!(f, "Favorite Hobbies ({}):", self.hobbies.len())?;
            for hobby in &self.hobbies {
                writeln!(f, "- {hobby}")?;
            }
        }
        write!(f, "---")
    }
}

/// One line typed at the hobby prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HobbyEntry<'a> {
    Stop,
    Blank,
    Hobby(&'a str),
}

pub fn parse_hobby(line: &str) -> HobbyEntry<'_> {
    let line = line.trim();
    if line.eq_ignore_ascii_case(STOP_TOKEN) {
        HobbyEntry::Stop
    } else if line.is_empty() {
        HobbyEntry::Blank
    } else {
        HobbyEntry::Hobby(line)
    }
}

/// Prompt for name, birth year and hobbies.
///
/// The name is kept exactly as typed. A birth year that is not a whole number,
/// or that makes the age overflow, is reported to `output` and asked again. Closing the input during hobby entry finishes the list.
///
/// # Errors
/// Returns [`prompt_io::InputClosed`] if input ends before the name and birth
/// year are known, and propagates any other read or write failure.
pub fn collect_profile(
    input: &mut dyn LineSource,
    output: &mut dyn Write,
    current_year: i32,
) -> Result<Profile> {
    let name = input.read_line(NAME_PROMPT)?;

    let age = loop {
        let raw = input.read_line(YEAR_PROMPT)?;
        match raw.trim().parse::<i32>() {
            Ok(year) => match age_in(current_year, year) {
                Some(age) => break age,
                None => {
                    debug!("event=birth_year_rejected input={raw:?} reason=age_overflow");
                    writeln!(output, "Invalid input. Birth year is out of range.")?;
                }
            },
            Err(err) => {
                debug!("event=birth_year_rejected input={raw:?} reason={err}");
                writeln!(output, "Invalid input. Please enter the year as a whole number.")?;
            }
        }
    };

    let mut hobbies = Vec::new();
    loop {
        let line = match input.read_line(HOBBY_PROMPT) {
            Ok(line) => line,
            Err(err) if is_input_closed(&err) => break,
            Err(err) => return Err(err),
        };
        match parse_hobby(&line) {
            HobbyEntry::Stop => break,
            HobbyEntry::Blank => {}
            HobbyEntry::Hobby(hobby) => hobbies.push(hobby.to_string()),
        }
    }

    debug!(
        "event=profile_collected age={age} hobbies={}",
        hobbies.len()
    );
    Ok(Profile::new(name, age, hobbies))
}
