/// Appended to document text cut short before it is sent to the oracle.
pub const TRUNCATION_MARKER: &str = "\n...(이하 생략)";

/// Keep the first `max_chars` chars of `text`, marking the cut if one was made.
pub fn cap_external_input(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Build the schedule extraction prompt for a (capped) document.
///
/// `today_iso` is `YYYY-MM-DD`; the model is told to drop past dates and to
/// assume the year of `today_iso` when the document omits one.
pub fn build_schedule_prompt(document: &str, today_iso: &str) -> String {
    let year = today_iso.get(..4).unwrap_or(today_iso);
    format!(
        "당신은 문서에서 일정 정보를 추출하는 전문가입니다.\n\
오늘 날짜: {today_iso}\n\n\
다음 문서에서 모든 일정, 마감일, 회의, 출장, 제출 기한 등을 찾아 JSON 배열로 출력하세요.\n\n\
규칙:\n\
1. 날짜는 YYYY-MM-DD 형식으로 변환\n\
2. 날짜가 \"12월 5일\" 같이 연도가 없으면 {year}년으로 가정\n\
3. 과거 날짜는 제외\n\
4. 각 일정마다 title, date, type(deadline/meeting/trip/submit/other), description 포함\n\n\
문서 내용:\n\
---\n\
{document}\n\
---\n\n\
JSON 배열만 출력하세요 (다른 설명 없이):"
    )
}
