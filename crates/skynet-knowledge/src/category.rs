/// Knowledge auto-categorisation heuristic (§3 Knowledge.category, Open
/// Question decision). A fixed Arabic keyword table, first match wins,
/// defaulting to عام ("general") when nothing matches.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("مالية", &["مصروف", "دين", "فاتورة", "راتب", "بنك", "مال", "expense", "debt", "invoice", "salary", "bank"]),
    ("عمل", &["مشروع", "اجتماع", "عمل", "مهمة", "شركة", "project", "meeting", "work", "task", "company"]),
    ("صحة", &["صحة", "دواء", "طبيب", "مرض", "علاج", "health", "medicine", "doctor", "illness"]),
    ("تعليم", &["دراسة", "كورس", "جامعة", "تعليم", "امتحان", "study", "course", "university", "exam"]),
    ("شخصي", &["عائلة", "صديق", "شخصي", "بيت", "family", "friend", "personal", "home"]),
];

const DEFAULT_CATEGORY: &str = "عام";

pub fn categorize(title: &str, content: &str) -> String {
    let haystack = format!("{title} {content}").to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(&kw.to_lowercase())) {
            return (*category).to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_financial_knowledge() {
        assert_eq!(categorize("فاتورة الكهرباء", "دفعت الفاتورة اليوم"), "مالية");
    }

    #[test]
    fn categorizes_english_work_content() {
        assert_eq!(categorize("Sprint planning", "meeting notes for project X"), "عمل");
    }

    #[test]
    fn defaults_to_general_when_no_keyword_matches() {
        assert_eq!(categorize("random musing", "nothing in particular"), "عام");
    }

    #[test]
    fn first_matching_category_wins() {
        // contains both a "عمل" and "مالية" keyword; مالية is listed first.
        assert_eq!(categorize("مصروف اجتماع العمل", ""), "مالية");
    }
}
