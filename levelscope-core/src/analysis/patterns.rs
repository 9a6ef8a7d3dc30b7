//! Pattern detector — mines the reaction log for recurring behaviors.
//!
//! Four additive rules; a single log can match several at once. Every
//! success rate is a fixed heuristic constant, not a measured outcome, and
//! the exact numbers are part of the output contract. The set is rebuilt
//! from scratch on every call.

use crate::domain::{LevelKind, LevelName, Pattern, PatternKind, Reaction, ReactionKind};

/// Minimum bounces at one level for a repeated-bounce pattern.
const REPEATED_BOUNCE_MIN: usize = 2;

/// Minimum same-side breakouts for a trend pattern.
const TREND_BREAKOUT_MIN: usize = 2;

/// Minimum total rejections for a rejection-cluster pattern.
const REJECTION_CLUSTER_MIN: usize = 3;

/// Detect all patterns present in the reaction log.
///
/// Output order is deterministic: repeated bounces in ladder order, then
/// breakout-retests in log order, then trend patterns (up before down),
/// then the rejection cluster.
pub fn detect_patterns(reactions: &[Reaction]) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    detect_repeated_bounces(reactions, &mut patterns);
    detect_breakout_retests(reactions, &mut patterns);
    detect_trends(reactions, &mut patterns);
    detect_rejection_cluster(reactions, &mut patterns);
    patterns
}

fn detect_repeated_bounces(reactions: &[Reaction], out: &mut Vec<Pattern>) {
    for name in LevelName::ALL {
        let count = reactions
            .iter()
            .filter(|r| r.kind == ReactionKind::Bounce && r.level.name == name)
            .count();
        if count >= REPEATED_BOUNCE_MIN {
            out.push(Pattern {
                kind: PatternKind::RepeatedBounce,
                level: Some(name),
                occurrences: count,
                success_rate: 75.0 + 5.0 * count as f64,
                description: format!("{name} has held as {} across {count} bounces", name.kind()),
            });
        }
    }
}

fn detect_breakout_retests(reactions: &[Reaction], out: &mut Vec<Pattern>) {
    for pair in reactions.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.kind == ReactionKind::Breakout
            && second.kind == ReactionKind::Bounce
            && first.level.name == second.level.name
        {
            out.push(Pattern {
                kind: PatternKind::BreakoutRetest,
                level: Some(first.level.name),
                occurrences: 1,
                success_rate: 85.0,
                description: format!(
                    "Breakout at {} immediately retested and held",
                    first.level.name
                ),
            });
        }
    }
}

fn detect_trends(reactions: &[Reaction], out: &mut Vec<Pattern>) {
    let breakouts_on = |side: LevelKind| {
        reactions
            .iter()
            .filter(|r| r.kind == ReactionKind::Breakout && r.level.kind == side)
            .count()
    };

    let up = breakouts_on(LevelKind::Resistance);
    if up >= TREND_BREAKOUT_MIN {
        out.push(Pattern {
            kind: PatternKind::Uptrend,
            level: None,
            occurrences: up,
            success_rate: 70.0 + 5.0 * up as f64,
            description: format!("{up} resistance levels broken in sequence"),
        });
    }

    let down = breakouts_on(LevelKind::Support);
    if down >= TREND_BREAKOUT_MIN {
        out.push(Pattern {
            kind: PatternKind::Downtrend,
            level: None,
            occurrences: down,
            success_rate: 70.0 + 5.0 * down as f64,
            description: format!("{down} support levels broken in sequence"),
        });
    }
}

fn detect_rejection_cluster(reactions: &[Reaction], out: &mut Vec<Pattern>) {
    let count = reactions
        .iter()
        .filter(|r| r.kind == ReactionKind::Rejection)
        .count();
    if count >= REJECTION_CLUSTER_MIN {
        out.push(Pattern {
            kind: PatternKind::RejectionCluster,
            level: None,
            occurrences: count,
            success_rate: 60.0,
            description: "Price repeatedly rejected at the level grid".into(),
        });
    }
}
