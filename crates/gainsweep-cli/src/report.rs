use gainsweep::core::models::gain::GainRange;
use gainsweep::core::models::solution::Solution;
use gainsweep::engine::config::SearchConfig;
use gainsweep::workflows::search::SearchOutcome;
use std::fmt::Write;

const SOLUTION_RULE: &str = "#####################";

/// Six significant decimals with trailing zeros dropped, so grid values such as
/// `0.30000000000000004` print as `0.3`.
pub fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

fn format_range(range: &GainRange) -> String {
    format!(
        "[{} ~ {}]",
        format_number(range.min()),
        format_number(range.max())
    )
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_header(config: &SearchConfig) -> String {
    let (x1, x2) = config.input_range();
    let (v_min, v_max) = config.output_range();
    format!(
        "Search Parameters:\nInput:  [{}, {}]\nOutput: [{}, {}]\nStep:   {}\n",
        format_number(x1),
        format_number(x2),
        format_number(v_min),
        format_number(v_max),
        format_number(config.step())
    )
}

/// Renders one solution block; `number` is 1-based.
pub fn render_solution(number: usize, solution: &Solution, config: &SearchConfig) -> String {
    let (v_min, v_max) = config.output_range();
    let mut out = String::new();

    let _ = writeln!(out, "# Solution {} {}", number, SOLUTION_RULE);
    let _ = writeln!(out, "Stage 1: {}", format_range(solution.stage1()));
    let _ = writeln!(out, "Stage 2: {}", format_range(solution.stage2()));
    let _ = writeln!(out, "Assignment: {}", solution.assignment());
    let _ = writeln!(out, "Gains: {}", join_numbers(&solution.gains()));
    let _ = writeln!(out, "Thresholds: {}", join_numbers(&solution.breakpoints()));
    let _ = writeln!(out, "Output Ranges:");
    for zone in solution.zones() {
        let mark = if zone.output_within(v_min, v_max) {
            "✓"
        } else {
            "⚠"
        };
        let _ = writeln!(out, "{} => {} {}", zone.input, zone.output, mark);
    }
    out
}

pub fn render(config: &SearchConfig, outcome: &SearchOutcome) -> String {
    let mut out = render_header(config);

    if outcome.cancelled {
        let _ = writeln!(
            out,
            "\nSearch cancelled after {} of {} combinations; results are partial.",
            outcome.snapshot.processed, outcome.snapshot.total
        );
    }
    let _ = writeln!(
        out,
        "\nFound {} valid solutions:",
        outcome.solutions.len()
    );
    for (i, solution) in outcome.solutions.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_solution(i + 1, solution, config));
    }
    let _ = writeln!(
        out,
        "\nSearch completed in {:.3}s.",
        outcome.elapsed.as_secs_f64()
    );
    out
}
