/// Arabic diacritics (tashkeel) stripped before fuzzy comparison.
const DIACRITICS: [char; 8] = ['\u{064B}', '\u{064C}', '\u{064D}', '\u{064E}', '\u{064F}', '\u{0650}', '\u{0651}', '\u{0652}'];

const AUTO_DISMISS_THRESHOLD: f64 = 0.82;

fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !DIACRITICS.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Auto-dismiss fuzzy match (§4.1 step 5, `_auto_dismiss_reminders`, Open
/// Question decision): a completed task's title fuzzy-matches a pending
/// reminder's title via `jaro_winkler` on normalised (diacritics/whitespace
/// stripped) titles at or above 0.82.
pub fn fuzzy_matches(task_title: &str, reminder_title: &str) -> bool {
    let a = normalize_title(task_title);
    let b = normalize_title(reminder_title);
    strsim::jaro_winkler(&a, &b) >= AUTO_DISMISS_THRESHOLD
}

/// Returns the indices of `reminder_titles` that should be auto-dismissed
/// when `task_title` is marked done.
pub fn find_auto_dismiss_candidates(task_title: &str, reminder_titles: &[String]) -> Vec<usize> {
    reminder_titles
        .iter()
        .enumerate()
        .filter(|(_, title)| fuzzy_matches(task_title, title))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_titles_with_diacritics_stripped() {
        assert!(fuzzy_matches("اتصل بالطبيب", "اِتَّصِل بالطبيب"));
    }

    #[test]
    fn matches_minor_surface_variation() {
        assert!(fuzzy_matches("Pay electricity bill", "Pay the electricity bill"));
    }

    #[test]
    fn rejects_unrelated_titles() {
        assert!(!fuzzy_matches("Buy groceries", "Schedule dentist appointment"));
    }

    #[test]
    fn find_candidates_returns_matching_indices() {
        let reminders = vec!["Pay electricity bill".to_string(), "Call mom".to_string()];
        assert_eq!(find_auto_dismiss_candidates("Pay the electricity bill", &reminders), vec![0]);
    }
}
