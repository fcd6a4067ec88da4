use super::types::ScheduleCategory;

/// Ordered keyword table. The first category with any hit wins, so "미팅"
/// (listed under both Trip and Meeting) always classifies as Trip.
const CATEGORY_KEYWORDS: &[(ScheduleCategory, &[&str])] = &[
    (
        ScheduleCategory::Deadline,
        &["까지", "마감", "기한", "제출일", "납기", "데드라인", "deadline", "due"],
    ),
    (
        ScheduleCategory::Submit,
        &["제출", "보고", "보내", "발송", "송부", "submit", "report"],
    ),
    (
        ScheduleCategory::Trip,
        &["출장", "방문", "미팅", "외근", "trip", "visit"],
    ),
    (
        ScheduleCategory::Meeting,
        &["회의", "미팅", "간담회", "협의", "회합", "meeting", "conference"],
    ),
];

/// Classify a text fragment by keyword containment (case-insensitive).
pub fn classify_fragment(fragment: &str) -> ScheduleCategory {
    let lower = fragment.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ScheduleCategory::Other)
}

/// Normalize a type label from oracle output (English or Korean).
/// Exact match only, unlike `classify_fragment`.
pub fn normalize_category_label(label: &str) -> ScheduleCategory {
    match label.trim().to_lowercase().as_str() {
        "마감" | "기한" | "deadline" => ScheduleCategory::Deadline,
        "회의" | "미팅" | "meeting" => ScheduleCategory::Meeting,
        "출장" | "방문" | "trip" => ScheduleCategory::Trip,
        "제출" | "보고" | "submit" => ScheduleCategory::Submit,
        _ => ScheduleCategory::Other,
    }
}
