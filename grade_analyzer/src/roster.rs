use crate::error::{RosterError, RosterResult};
use crate::name::normalize_name;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;

/// Lowest accepted grade, inclusive.
pub const MIN_GRADE: i64 = 0;
/// Highest accepted grade, inclusive.
pub const MAX_GRADE: i64 = 100;

/// Token that ends grade entry, compared case-insensitively.
pub const DONE_TOKEN: &str = "done";

/// Shown by the report and the top-student lookup when there is nothing to rank.
pub const NO_DATA_MESSAGE: &str = "No students found or no grades were entered.";

const NO_GRADES_MESSAGE: &str = "No grades have been entered.";
const REPORT_HEADER: &str = "--- Student Report ---";
const REPORT_SEPARATOR_WIDTH: usize = 26;

/// Arithmetic mean of `grades`, rounded to one decimal place.
///
/// Rounding is half-to-even on the exact value of the quotient.
///
/// # Errors
/// Returns [`RosterError::EmptyGradeSet`] for an empty slice. An ungraded
/// student is a normal state, so callers must handle this rather than propagate it.
pub fn calculate_average<T: Copy + Into<f64>>(grades: &[T]) -> RosterResult<f64> {
    if grades.is_empty() {
        return Err(RosterError::EmptyGradeSet);
    }
    let sum: f64 = grades.iter().map(|&grade| grade.into()).sum();
    Ok(round_to_tenth(sum / grades.len() as f64))
}

fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Parse one grade token.
///
/// Integers that overflow are out of range rather than not-a-number.
/// Digit-group underscores (`1_00`) are not accepted.
pub fn parse_grade(token: &str) -> RosterResult<u8> {
    match token.trim().parse::<i64>() {
        Ok(value) if (MIN_GRADE..=MAX_GRADE).contains(&value) => {
            u8::try_from(value).map_err(|_| RosterError::GradeOutOfRange)
        }
        Ok(_) => Err(RosterError::GradeOutOfRange),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Err(RosterError::GradeOutOfRange)
            }
            _ => Err(RosterError::NotANumber),
        },
    }
}

/// A student and the grades recorded for them, in entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    name: String,
    grades: Vec<u8>,
}

impl StudentRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grades(&self) -> &[u8] {
        &self.grades
    }

    /// Rounded average, or `None` for an ungraded student.
    pub fn average(&self) -> Option<f64> {
        calculate_average(&self.grades).ok()
    }
}

/// In-memory set of students for one interactive session.
///
/// Records keep insertion order; `index` maps each canonical name to its
/// position so lookups and duplicate checks do not scan the list.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<StudentRecord>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Look up a student by any spelling that normalizes to their name.
    pub fn get(&self, raw_name: &str) -> Option<&StudentRecord> {
        let name = normalize_name(raw_name).ok()?;
        self.index.get(&name).map(|&pos| &self.students[pos])
    }

    /// Register a new student with no grades.
    ///
    /// # Errors
    /// - [`RosterError::InvalidName`] if the name fails validation.
    /// - [`RosterError::DuplicateStudent`] if the normalized name is taken;
    ///   the roster is left unchanged.
    pub fn add_student(&mut self, raw_name: &str) -> RosterResult<&StudentRecord> {
        let name = normalize_name(raw_name)?;
        if self.index.contains_key(&name) {
            debug!("event=student_rejected reason=duplicate name={name}");
            return Err(RosterError::DuplicateStudent(name));
        }

        info!("event=student_added name={name}");
        let pos = self.students.len();
        self.index.insert(name.clone(), pos);
        self.students.push(StudentRecord {
            name,
            grades: Vec::new(),
        });
        Ok(&self.students[pos])
    }

    /// Open a grade-entry session for an existing student.
    ///
    /// # Errors
    /// - [`RosterError::InvalidName`] if the name fails validation.
    /// - [`RosterError::StudentNotFound`] if nobody has that name.
    pub fn grade_entry(&mut self, raw_name: &str) -> RosterResult<GradeEntry<'_>> {
        let name = normalize_name(raw_name)?;
        match self.index.get(&name) {
            Some(&pos) => Ok(GradeEntry {
                record: &mut self.students[pos],
            }),
            None => Err(RosterError::StudentNotFound(name)),
        }
    }

    /// Per-student averages plus max, min and overall statistics.
    pub fn report(&self) -> Report {
        let lines: Vec<ReportLine> = self
            .students
            .iter()
            .map(|student| ReportLine {
                name: student.name.clone(),
                average: student.average(),
            })
            .collect();

        let averages: Vec<f64> = lines.iter().filter_map(|line| line.average).collect();
        let summary = match calculate_average(&averages) {
            Ok(overall) => Some(Summary {
                max: averages.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                min: averages.iter().copied().fold(f64::INFINITY, f64::min),
                overall,
            }),
            Err(_) => None,
        };

        Report { lines, summary }
    }

    /// The student with the highest average.
    ///
    /// Ungraded students compete with a key of 0 and the first maximum wins,
    /// so an ungraded student listed before a student averaging 0.0 is
    /// selected and reported as [`TopStudent::NoGrades`].
    pub fn top_student(&self) -> TopStudent {
        let mut best: Option<(&StudentRecord, f64)> = None;
        for student in &self.students {
            let key = student.average().unwrap_or(0.0);
            if best.is_none_or(|(_, best_key)| key > best_key) {
                best = Some((student, key));
            }
        }

        let Some((student, _)) = best else {
            return TopStudent::NoData;
        };
        match calculate_average(&student.grades) {
            Ok(average) => TopStudent::Found {
                name: student.name.clone(),
                average,
            },
            Err(_) => TopStudent::NoGrades,
        }
    }
}

/// Result of feeding one token to a [`GradeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeSubmission {
    Appended(u8),
    Finished,
}

/// Grade-entry session holding the student being graded.
pub struct GradeEntry<'a> {
    record: &'a mut StudentRecord,
}

impl GradeEntry<'_> {
    pub fn student(&self) -> &str {
        &self.record.name
    }

    pub fn grades(&self) -> &[u8] {
        &self.record.grades
    }

    /// Handle one line typed during grade entry.
    ///
    /// `done` in any case ends the session. Rejected tokens leave the grades
    /// untouched and the session open.
    pub fn submit(&mut self, token: &str) -> RosterResult<GradeSubmission> {
        let token = token.trim();
        if token.eq_ignore_ascii_case(DONE_TOKEN) {
            return Ok(GradeSubmission::Finished);
        }

        match parse_grade(token) {
            Ok(grade) => {
                self.record.grades.push(grade);
                debug!(
                    "event=grade_appended name={} grade={grade}",
                    self.record.name
                );
                Ok(GradeSubmission::Appended(grade))
            }
            Err(err) => {
                debug!(
                    "event=grade_rejected name={} reason={err:?}",
                    self.record.name
                );
                Err(err)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub max: f64,
    pub min: f64,
    pub overall: f64,
}

/// Snapshot produced by [`Roster::report`]; `Display` renders the full text.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    /// `None` when no student has any grade.
    pub summary: Option<Summary>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_HEADER}")?;
        for line in &self.lines {
            match line.average {
                Some(average) => writeln!(f, "{}'s average grade is {average:.1}.", line.name)?,
                None => writeln!(f, "{}'s average grade is N/A.", line.name)?,
            }
        }
        match &self.summary {
            Some(summary) => {
                writeln!(f, "{}", "-".repeat(REPORT_SEPARATOR_WIDTH))?;
                writeln!(f, "Max Average: {:.1}", summary.max)?;
                writeln!(f, "Min Average: {:.1}", summary.min)?;
                write!(f, "Overall Average: {:.1}", summary.overall)
            }
            None => write!(f, "{NO_DATA_MESSAGE}"),
        }
    }
}

/// Outcome of [`Roster::top_student`].
#[derive(Debug, Clone, PartialEq)]
pub enum TopStudent {
    /// The roster is empty.
    NoData,
    /// The selected student has no grades.
    NoGrades,
    Found { name: String, average: f64 },
}

impl fmt::Display for TopStudent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopStudent::NoData => write!(f, "{NO_DATA_MESSAGE}"),
            TopStudent::NoGrades => write!(f, "{NO_GRADES_MESSAGE}"),
            TopStudent::Found { name, average } => write!(
                f,
                "The student with highest average is {name} with a grade of {average:.1}"
            ),
        }
    }
}
