//! Fixed step template applied to every new project.

/// Step names in order; the position is the step's `order_index`.
pub const DEFAULT_STEPS: &[&str] = &["Unboxing", "Assembly", "Priming", "Painting", "Finishing"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = DEFAULT_STEPS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_STEPS.len());
    }

    #[test]
    fn sentinels_are_not_step_names() {
        use crate::progress::{COMPLETE, NOT_STARTED};
        assert!(!DEFAULT_STEPS.contains(&NOT_STARTED));
        assert!(!DEFAULT_STEPS.contains(&COMPLETE));
    }
}
