//! Text rendering of analysis output.

use std::fmt::Write;

use levelscope_core::domain::{LevelSet, ReactionKind, SignalKind};
use levelscope_core::session::Analysis;

/// How many trailing reactions the report lists individually.
const REACTION_TAIL: usize = 10;

/// Render the level ladder, outermost resistance first.
pub fn render_levels(levels: &LevelSet) -> String {
    let anchor = levels.anchor();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Anchor {}  high {:.4}  low {:.4}",
        anchor.time.format("%Y-%m-%d %H:%M UTC"),
        anchor.high,
        anchor.low
    );
    let _ = writeln!(out);
    for level in levels.resistances().iter().rev() {
        let _ = writeln!(out, "  {}  {:>12.4}", level.name, level.price);
    }
    let _ = writeln!(out, "  --  {:>12}", "anchor");
    for level in levels.supports() {
        let _ = writeln!(out, "  {}  {:>12.4}", level.name, level.price);
    }
    out
}

/// Render a full analysis snapshot as a human-readable report.
pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = render_levels(&analysis.levels);

    let count_kind = |kind: ReactionKind| {
        analysis
            .reactions
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Reactions ({} total: {} bounce, {} breakout, {} rejection)",
        analysis.reactions.len(),
        count_kind(ReactionKind::Bounce),
        count_kind(ReactionKind::Breakout),
        count_kind(ReactionKind::Rejection),
    );
    let tail_start = analysis.reactions.len().saturating_sub(REACTION_TAIL);
    if tail_start > 0 {
        let _ = writeln!(out, "  ... {tail_start} earlier");
    }
    for reaction in &analysis.reactions[tail_start..] {
        let _ = writeln!(
            out,
            "  {}  {}  {:<9}  {:.2}%",
            reaction.time.format("%H:%M"),
            reaction.level.name,
            reaction.kind.to_string(),
            reaction.strength
        );
    }

    let _ = writeln!(out);
    if analysis.patterns.is_empty() {
        let _ = writeln!(out, "Patterns: none");
    } else {
        let _ = writeln!(out, "Patterns");
        for pattern in &analysis.patterns {
            let _ = writeln!(
                out,
                "  {:<17} x{:<3} {:>3.0}%  {}",
                pattern.kind.to_string(),
                pattern.occurrences,
                pattern.success_rate,
                pattern.description
            );
        }
    }

    let signal = &analysis.signal;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Signal: {} (confidence {:.0})",
        signal.kind, signal.confidence
    );
    let _ = writeln!(out, "  reason: {}", signal.reason);
    if signal.kind != SignalKind::Neutral {
        let stop = signal.stop_loss.map(|p| format!("{p:.4}"));
        let target = signal.take_profit.map(|p| format!("{p:.4}"));
        let _ = writeln!(
            out,
            "  entry {:.4}  stop {}  target {}",
            signal.entry,
            stop.as_deref().unwrap_or("-"),
            target.as_deref().unwrap_or("-"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use levelscope_core::domain::Bar;
    use levelscope_core::session::Session;

    fn sample_analysis() -> Analysis {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let bar = |m: i64, o: f64, h: f64, l: f64, c: f64| Bar {
            time: t0 + Duration::minutes(m),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: None,
        };
        let mut session = Session::new();
        session.push_bar(bar(0, 99.5, 100.0, 99.0, 99.8)).unwrap();
        session.push_bar(bar(1, 98.90, 98.97, 98.85, 98.95)).unwrap();
        session.push_bar(bar(2, 98.91, 98.98, 98.86, 98.96)).unwrap();
        session.analyze().unwrap().unwrap()
    }

    #[test]
    fn report_carries_all_sections() {
        let report = render_analysis(&sample_analysis());
        assert!(report.contains("Anchor 2024-01-02 09:30 UTC"));
        assert!(report.contains("R1"));
        assert!(report.contains("S4"));
        assert!(report.contains("Reactions (2 total: 2 bounce, 0 breakout, 0 rejection)"));
        assert!(report.contains("Repeated Bounces"));
        assert!(report.contains("Signal: BUY (confidence 80)"));
        assert!(report.contains("entry 98.9600"));
    }

    #[test]
    fn ladder_renders_outermost_resistance_first() {
        let report = render_levels(&sample_analysis().levels);
        let r4 = report.find("R4").unwrap();
        let r1 = report.find("R1").unwrap();
        let s1 = report.find("S1").unwrap();
        let s4 = report.find("S4").unwrap();
        assert!(r4 < r1 && r1 < s1 && s1 < s4);
    }
}
