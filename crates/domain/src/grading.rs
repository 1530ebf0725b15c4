//! Grading engine: marks to letter grades, grade points and GPA.
//!
//! Every function here is pure. The grade ladder is evaluated top-down, so a
//! mark that satisfies several bands receives the best one. Marks below every
//! threshold (negative marks included) fall through to `F` / `0.0`, and marks
//! above 100 land in the top band. Range checks belong to [`SubjectMark::new`].

use std::fmt::{Display, Formatter};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use schooldesk_core::{AppError, AppResult, NonEmptyString};

/// Lowest accepted mark.
pub const MARK_MIN: f64 = 0.0;

/// Highest accepted mark.
pub const MARK_MAX: f64 = 100.0;

/// Letter assigned to marks below every threshold.
pub const FAILING_LETTER: &str = "F";

struct GradeBand {
    min_mark: f64,
    letter: &'static str,
    point_tenths: i64,
}

const GRADE_LADDER: [GradeBand; 6] = [
    GradeBand {
        min_mark: 80.0,
        letter: "A+",
        point_tenths: 50,
    },
    GradeBand {
        min_mark: 70.0,
        letter: "A",
        point_tenths: 40,
    },
    GradeBand {
        min_mark: 60.0,
        letter: "A-",
        point_tenths: 35,
    },
    GradeBand {
        min_mark: 50.0,
        letter: "B",
        point_tenths: 30,
    },
    GradeBand {
        min_mark: 40.0,
        letter: "C",
        point_tenths: 20,
    },
    GradeBand {
        min_mark: 33.0,
        letter: "D",
        point_tenths: 10,
    },
];

fn band_of(mark: f64) -> Option<&'static GradeBand> {
    GRADE_LADDER.iter().find(|band| mark >= band.min_mark)
}

fn point_tenths_of(mark: f64) -> i64 {
    band_of(mark).map_or(0, |band| band.point_tenths)
}

/// Letter grade and grade point derived from one mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    /// Letter grade, `A+` through `F`.
    pub letter: &'static str,
    /// Grade point, `5.0` through `0.0`.
    pub point: f64,
}

impl Grade {
    /// Returns whether this grade fails the subject.
    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.letter == FAILING_LETTER
    }
}

/// Returns the grade point for a mark.
#[must_use]
pub fn grade_point_of(mark: f64) -> f64 {
    point_tenths_of(mark) as f64 / 10.0
}

/// Returns the letter grade for a mark.
#[must_use]
pub fn grade_letter_of(mark: f64) -> &'static str {
    band_of(mark).map_or(FAILING_LETTER, |band| band.letter)
}

/// Returns the combined letter grade and grade point for a mark.
#[must_use]
pub fn grade_of(mark: f64) -> Grade {
    Grade {
        letter: grade_letter_of(mark),
        point: grade_point_of(mark),
    }
}

/// One subject and the mark obtained in it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectMark {
    name: NonEmptyString,
    mark: f64,
}

impl SubjectMark {
    /// Creates a validated subject mark within `0..=100`.
    pub fn new(name: impl Into<String>, mark: f64) -> AppResult<Self> {
        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::Validation("subject name must not be empty".to_owned()))?;

        if !mark.is_finite() || !(MARK_MIN..=MARK_MAX).contains(&mark) {
            return Err(AppError::Validation(format!(
                "mark for subject '{name}' must be between {MARK_MIN} and {MARK_MAX}"
            )));
        }

        Ok(Self { name, mark })
    }

    /// Returns the subject name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the mark.
    #[must_use]
    pub fn mark(&self) -> f64 {
        self.mark
    }

    /// Returns the grade for this mark.
    #[must_use]
    pub fn grade(&self) -> Grade {
        grade_of(self.mark)
    }
}

/// Aggregate grade point average, held to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Gpa(Decimal);

impl Gpa {
    /// GPA of a failed or empty result.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the GPA as a float for transport.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Returns the exact decimal value.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Display for Gpa {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.2}", self.0)
    }
}

/// Computes the GPA of an exam result.
///
/// A single failing subject forces the whole GPA to zero. Otherwise the GPA
/// is the mean of the grade points, rounded half away from zero to two
/// decimal places. An empty list yields zero.
#[must_use]
pub fn compute_gpa(subjects: &[SubjectMark]) -> Gpa {
    gpa_of_marks(subjects.iter().map(SubjectMark::mark))
}

/// Computes the GPA from bare marks using the same rules as [`compute_gpa`].
#[must_use]
pub fn gpa_of_marks(marks: impl IntoIterator<Item = f64>) -> Gpa {
    let mut total_tenths = 0_i64;
    let mut count = 0_i64;

    for mark in marks {
        let tenths = point_tenths_of(mark);
        if tenths == 0 {
            return Gpa::ZERO;
        }
        total_tenths += tenths;
        count += 1;
    }

    if count == 0 {
        return Gpa::ZERO;
    }

    let mean = Decimal::new(total_tenths, 1) / Decimal::from(count);
    Gpa(mean.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Graded view of one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedSubject {
    /// Subject name.
    pub name: String,
    /// Mark obtained.
    pub mark: f64,
    /// Derived grade.
    pub grade: Grade,
}

/// Per-subject grades plus the aggregate GPA of one exam.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSheet {
    /// Graded subjects in input order.
    pub subjects: Vec<GradedSubject>,
    /// Aggregate GPA.
    pub gpa: Gpa,
    /// Whether any subject failed.
    pub failed: bool,
}

/// Grades every subject and computes the GPA in one pass over the marks.
#[must_use]
pub fn grade_sheet(subjects: &[SubjectMark]) -> GradeSheet {
    let graded: Vec<GradedSubject> = subjects
        .iter()
        .map(|subject| GradedSubject {
            name: subject.name().as_str().to_owned(),
            mark: subject.mark(),
            grade: subject.grade(),
        })
        .collect();
    let failed = graded.iter().any(|subject| subject.grade.is_failing());

    GradeSheet {
        subjects: graded,
        gpa: compute_gpa(subjects),
        failed,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn subjects(marks: &[f64]) -> Vec<SubjectMark> {
        marks
            .iter()
            .enumerate()
            .filter_map(|(index, mark)| SubjectMark::new(format!("Subject {index}"), *mark).ok())
            .collect()
    }

    #[test]
    fn ladder_boundaries_pick_the_best_band() {
        let expected = [
            (100.0, "A+", 5.0),
            (80.0, "A+", 5.0),
            (79.9, "A", 4.0),
            (70.0, "A", 4.0),
            (60.0, "A-", 3.5),
            (50.0, "B", 3.0),
            (40.0, "C", 2.0),
            (33.0, "D", 1.0),
            (32.99, "F", 0.0),
            (0.0, "F", 0.0),
        ];

        for (mark, letter, point) in expected {
            assert_eq!(grade_letter_of(mark), letter, "letter for {mark}");
            assert_eq!(grade_point_of(mark), point, "point for {mark}");
        }
    }

    #[test]
    fn out_of_range_marks_fall_through() {
        assert_eq!(grade_of(-5.0).letter, "F");
        assert_eq!(grade_point_of(-5.0), 0.0);
        assert_eq!(grade_point_of(120.0), 5.0);
    }

    #[test]
    fn subject_mark_rejects_out_of_range_values() {
        assert!(SubjectMark::new("Math", -1.0).is_err());
        assert!(SubjectMark::new("Math", 100.5).is_err());
        assert!(SubjectMark::new("Math", f64::NAN).is_err());
        assert!(SubjectMark::new("  ", 50.0).is_err());
        assert!(SubjectMark::new("Math", 100.0).is_ok());
    }

    #[test]
    fn empty_result_has_zero_gpa() {
        assert_eq!(compute_gpa(&[]), Gpa::ZERO);
    }

    #[test]
    fn one_failing_subject_zeroes_the_gpa() {
        assert_eq!(compute_gpa(&subjects(&[100.0, 20.0])).value(), 0.0);
    }

    #[test]
    fn passing_subjects_average_their_points() {
        assert_eq!(compute_gpa(&subjects(&[85.0, 75.0])).value(), 4.5);
    }

    #[test]
    fn gpa_rounds_half_away_from_zero() {
        // 5.0 * 3 + 3.5 + 4.0 * 3 + 1.0 = 31.5 over 8 subjects = 3.9375
        let gpa = compute_gpa(&subjects(&[90.0, 90.0, 90.0, 65.0, 75.0, 75.0, 75.0, 35.0]));
        assert_eq!(gpa.to_string(), "3.94");

        // 5.0 + 4.0 * 2 + 3.0 * 3 + 2.0 + 1.0 = 25.0 over 8 subjects = 3.125, an exact tie
        let gpa = gpa_of_marks([85.0, 75.0, 75.0, 55.0, 55.0, 55.0, 45.0, 35.0]);
        assert_eq!(gpa.to_string(), "3.13");
    }

    #[test]
    fn repeating_means_round_to_two_places() {
        assert_eq!(gpa_of_marks([85.0, 75.0, 75.0]).to_string(), "4.33");
        assert_eq!(gpa_of_marks([85.0, 85.0, 75.0]).to_string(), "4.67");
    }

    #[test]
    fn grade_sheet_flags_failures() {
        let sheet = grade_sheet(&subjects(&[82.0, 12.0]));
        assert!(sheet.failed);
        assert_eq!(sheet.gpa, Gpa::ZERO);
        assert_eq!(sheet.subjects[0].grade.letter, "A+");
        assert_eq!(sheet.subjects[1].grade.letter, "F");
    }

    proptest! {
        #[test]
        fn letter_f_iff_point_zero(mark in -50.0f64..150.0) {
            prop_assert_eq!(grade_letter_of(mark) == "F", grade_point_of(mark) == 0.0);
        }

        #[test]
        fn d_band_is_one_point(mark in 33.0f64..40.0) {
            prop_assert_eq!(grade_letter_of(mark), "D");
            prop_assert_eq!(grade_point_of(mark), 1.0);
        }

        #[test]
        fn below_33_fails(mark in -100.0f64..33.0) {
            prop_assert_eq!(grade_letter_of(mark), "F");
            prop_assert_eq!(grade_point_of(mark), 0.0);
        }

        #[test]
        fn gpa_stays_within_point_range(marks in proptest::collection::vec(0.0f64..=100.0, 1..12)) {
            let gpa = gpa_of_marks(marks.iter().copied()).value();
            prop_assert!((0.0..=5.0).contains(&gpa));
            if marks.iter().any(|mark| *mark < 33.0) {
                prop_assert_eq!(gpa, 0.0);
            } else {
                prop_assert!(gpa >= 1.0);
            }
        }

        #[test]
        fn gpa_is_deterministic(marks in proptest::collection::vec(0.0f64..=100.0, 0..12)) {
            prop_assert_eq!(gpa_of_marks(marks.clone()), gpa_of_marks(marks));
        }
    }
}
