//! Incremental plan parser.
//!
//! Turns the model's free-form plan text into day blocks. Parsing is a pure
//! function of the text, so the caller can reparse the whole accumulated
//! response after every streamed chunk and replace what it displayed before.
//!
//! Expected grammar (see the API's plan prompt):
//!
//! ```text
//! Day 1 (~45 min):
//! • Goblet Squat 3x12 – keep your chest up
//! • Push-up 3x10 – brace your core
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Start of a line whose first non-blank text is `Day <digits>`.
static DAY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Day \d+").expect("day header pattern is valid"));

pub const BULLET: char = '•';
/// Separates the exercise name from its form tip.
pub const TIP_SEPARATOR: char = '–';
pub const EXPORT_HEADER: &str = "Your Custom Workout Plan";

/// One day's worth of plan text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBlock {
    /// First line of the block, verbatim. Normally `Day N ...`, but a preamble
    /// before the first header is kept as a block with whatever its first line is.
    pub title: String,
    pub exercises: Vec<ExerciseLine>,
}

/// One bullet line.
///
/// `id` is the position of the line across the whole parse. It is not stable
/// between parses of a growing text; key rendering on (day index, position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseLine {
    pub id: usize,
    pub text: String,
}

/// Parses plan text into day blocks. Blank input yields an empty plan.
pub fn parse_plan(text: &str) -> Vec<DayBlock> {
    let mut next_id = 0;

    split_days(text)
        .map(|segment| {
            let mut lines = segment.lines();
            let title = lines.next().unwrap_or_default().trim_end().to_string();

            let exercises = lines
                .map(str::trim)
                .filter(|line| line.starts_with(BULLET))
                .map(|line| {
                    let exercise = ExerciseLine {
                        id: next_id,
                        text: line.to_string(),
                    };
                    next_id += 1;
                    exercise
                })
                .collect();

            DayBlock { title, exercises }
        })
        .collect()
}

/// Splits before every day header; the header stays with the segment it opens.
/// Segments are trimmed and blank ones dropped.
fn split_days(text: &str) -> impl Iterator<Item = &str> {
    let mut bounds: Vec<usize> = DAY_HEADER.find_iter(text).map(|m| m.start()).collect();
    bounds.push(text.len());

    let mut start = 0;
    bounds
        .into_iter()
        .map(move |end| {
            let segment = &text[start..end];
            start = end;
            segment.trim()
        })
        .filter(|segment| !segment.is_empty())
}

/// Renders a plan as plain text for copying or saving.
pub fn render_plan_text(plan: &[DayBlock]) -> String {
    let mut out = format!("{EXPORT_HEADER}\n\n");
    for day in plan {
        out.push_str(&day.title);
        out.push('\n');
        for exercise in &day.exercises {
            out.push_str(&exercise.text);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Extracts the exercise name from a bullet line: bullet removed, form tip dropped.
///
/// `"• Goblet Squat 3x12 – keep your chest up"` becomes `"Goblet Squat 3x12"`.
pub fn exercise_name(line: &str) -> String {
    let line = line.trim();
    let line = line.strip_prefix(BULLET).unwrap_or(line);
    line.split(TIP_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PLAN: &str = "Day 1 (~45 min):
• Goblet Squat 3x12 – keep your chest up
• Push-up 3x10 – brace your core
• Dumbbell Row 3x12 – pull to the hip

Day 2 (~40 min):
• Romanian Deadlift 3x10 – hinge at the hips
• Plank 3x30s – squeeze the glutes

Day 3 (~35 min):
• Lunge 3x10 – knee over ankle
";

    fn texts(day: &DayBlock) -> Vec<&str> {
        day.exercises.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_parse_two_day_plan() {
        let plan = parse_plan("Day 1:\n• A\n• B\n\nDay 2:\n• C");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].title, "Day 1:");
        assert_eq!(plan[1].title, "Day 2:");
        assert_eq!(texts(&plan[0]), vec!["• A", "• B"]);
        assert_eq!(texts(&plan[1]), vec!["• C"]);
    }

    #[test]
    fn test_parse_empty_and_whitespace_only() {
        assert!(parse_plan("").is_empty());
        assert!(parse_plan("   \n\t\n  ").is_empty());
    }

    #[test]
    fn test_ids_are_sequential_across_days() {
        let plan = parse_plan(FULL_PLAN);
        let ids: Vec<usize> = plan
            .iter()
            .flat_map(|d| d.exercises.iter().map(|e| e.id))
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_non_bullet_lines_are_skipped_without_breaking_bullets() {
        let plan = parse_plan("Day 1:\n• A\n\nWarm up first!\n• B\n");
        assert_eq!(texts(&plan[0]), vec!["• A", "• B"]);
    }

    #[test]
    fn test_bullet_lines_are_trimmed() {
        let plan = parse_plan("Day 1:\n   • Squat 3x5 – brace   \n");
        assert_eq!(texts(&plan[0]), vec!["• Squat 3x5 – brace"]);
    }

    #[test]
    fn test_preamble_becomes_its_own_block() {
        let plan = parse_plan("Here is your plan\n• stray\nDay 1:\n• A");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].title, "Here is your plan");
        assert_eq!(texts(&plan[0]), vec!["• stray"]);
        assert_eq!(plan[1].title, "Day 1:");
    }

    #[test]
    fn test_indented_header_still_splits() {
        let plan = parse_plan("Day 1:\n• A\n  Day 2:\n• B");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].title, "Day 2:");
    }

    #[test]
    fn test_day_mentioned_mid_line_does_not_split() {
        let plan = parse_plan("Day 1:\n• Rest like on Day 2 – easy\n");
        assert_eq!(plan.len(), 1);
        assert_eq!(texts(&plan[0]), vec!["• Rest like on Day 2 – easy"]);
    }

    #[test]
    fn test_day_without_digits_is_not_a_header() {
        let plan = parse_plan("Day 1:\n• A\nDay off tomorrow\n• B");
        assert_eq!(plan.len(), 1);
        assert_eq!(texts(&plan[0]), vec!["• A", "• B"]);
    }

    #[test]
    fn test_partial_trailing_day_shows_partial_content() {
        let plan = parse_plan("Day 1:\n• A\nDay 2 (~3");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].title, "Day 2 (~3");
        assert!(plan[1].exercises.is_empty());
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let plan = parse_plan("Day 1:\r\n• A\r\n• B\r\n");
        assert_eq!(plan[0].title, "Day 1:");
        assert_eq!(texts(&plan[0]), vec!["• A", "• B"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_plan(FULL_PLAN), parse_plan(FULL_PLAN));
    }

    #[test]
    fn test_streamed_prefixes_converge_to_full_parse() {
        let expected = parse_plan(FULL_PLAN);
        let boundaries: Vec<usize> = FULL_PLAN
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(FULL_PLAN.len()))
            .collect();

        let mut last = Vec::new();
        for end in boundaries {
            last = parse_plan(&FULL_PLAN[..end]);
            assert!(last.len() <= expected.len());
        }
        assert_eq!(last, expected);
    }

    #[test]
    fn test_rendered_text_reparses_to_same_blocks() {
        let plan = parse_plan(FULL_PLAN);
        let rendered = render_plan_text(&plan);
        let body = rendered
            .strip_prefix(&format!("{EXPORT_HEADER}\n\n"))
            .unwrap();
        assert_eq!(parse_plan(body), plan);
    }

    #[test]
    fn test_render_plan_text_layout() {
        let plan = parse_plan("Day 1:\n• A\n• B\nDay 2:\n• C");
        assert_eq!(
            render_plan_text(&plan),
            "Your Custom Workout Plan\n\nDay 1:\n• A\n• B\n\nDay 2:\n• C\n\n"
        );
    }

    #[test]
    fn test_exercise_name_strips_bullet_and_tip() {
        assert_eq!(
            exercise_name("• Goblet Squat 3x12 – keep your chest up"),
            "Goblet Squat 3x12"
        );
        assert_eq!(exercise_name("  • Plank 3x30s  "), "Plank 3x30s");
        assert_eq!(exercise_name("Burpees 3x10"), "Burpees 3x10");
    }
}
