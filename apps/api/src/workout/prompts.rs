// Prompt templates for workout generation.
//
// Plan grammar: each day opens with a `Day N (~total time):` header line and lists
// exercises as `•` bullet lines of the form `Exercise SetsxReps – form tip`.
// The client-side parser splits on the header and collects the bullets, so any
// change here must stay in step with it.

/// Plan generation prompt. Replace `{days}`, `{goal}`, `{equipment}` before sending.
pub const PLAN_PROMPT_TEMPLATE: &str = "\
Generate a {days}-day {goal} workout plan using {equipment}. Format exactly like this:
Day 1 (~total time):
• Exercise 4x12 – one short tip on proper form
• Exercise 3x15 – one short tip on proper form
Each day should have 4–5 exercises. Keep instructions concise and focused on form cues. \
Include an estimated total time for the day in parentheses. Use neat formatting. \
Do not add introductions or extra commentary.";

/// Exercise swap prompt. Replace `{exercise}` and `{equipment}` before sending.
pub const SWAP_PROMPT_TEMPLATE: &str = "\
Suggest one single alternative exercise for \"{exercise}\" using \"{equipment}\". \
The new exercise must target the same primary muscle group.
Provide ONLY the new exercise line in this exact format: • Exercise Name SetsxReps – Short Form Tip
Do not add any other text, introductions, or explanations.";

pub fn plan_prompt(goal: &str, equipment: &str, days: u8) -> String {
    PLAN_PROMPT_TEMPLATE
        .replace("{days}", &days.to_string())
        .replace("{goal}", goal)
        .replace("{equipment}", equipment)
}

pub fn swap_prompt(exercise: &str, equipment: &str) -> String {
    SWAP_PROMPT_TEMPLATE
        .replace("{exercise}", exercise)
        .replace("{equipment}", equipment)
}
