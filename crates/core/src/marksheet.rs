//! Marksheet scoring rules.

/// Minimum mark in every subject for a marksheet to count as passed.
pub const PASS_MARK: i32 = 33;

/// Maximum mark per subject.
pub const MAX_MARK: i32 = 100;

/// Number of subjects on a marksheet.
pub const SUBJECT_COUNT: i32 = 3;

/// Sum of the subject marks.
pub fn total(physics: i32, chemistry: i32, maths: i32) -> i32 {
    physics + chemistry + maths
}

/// Total as a percentage of the maximum attainable marks.
pub fn percentage(physics: i32, chemistry: i32, maths: i32) -> f64 {
    f64::from(total(physics, chemistry, maths)) * 100.0 / f64::from(MAX_MARK * SUBJECT_COUNT)
}

/// A marksheet passes when every subject reaches [`PASS_MARK`].
pub fn is_pass(physics: i32, chemistry: i32, maths: i32) -> bool {
    [physics, chemistry, maths].iter().all(|m| *m >= PASS_MARK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_percentages() {
        assert_eq!(total(70, 80, 90), 240);
        assert!((percentage(70, 80, 90) - 80.0).abs() < f64::EPSILON);
        assert!((percentage(100, 100, 100) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pass_requires_every_subject() {
        assert!(is_pass(33, 33, 33));
        assert!(!is_pass(32, 100, 100));
        assert!(!is_pass(100, 100, 0));
    }
}
