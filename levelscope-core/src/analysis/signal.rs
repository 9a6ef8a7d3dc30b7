//! Signal synthesizer — folds the latest bar, the ladder, recent reactions,
//! and detected patterns into exactly one recommendation.
//!
//! The three rules are evaluated in fixed priority order and the last
//! applicable rule wins. In particular a momentum breakout in the most
//! recent reaction replaces whatever the proximity rules produced, even when
//! its direction contradicts them — the freshest break always outranks a
//! level-proximity read.

use crate::domain::{
    Bar, LevelKind, LevelName, LevelSet, Pattern, PatternKind, Reaction, ReactionKind, Signal,
    SignalKind,
};

/// A close within this fraction of a level price counts as "at" the level.
pub const PROXIMITY: f64 = 0.002;

/// How many trailing reactions the proximity rules look at.
pub const RECENT_WINDOW: usize = 5;

struct SignalContext<'a> {
    latest: &'a Bar,
    levels: &'a LevelSet,
    reactions: &'a [Reaction],
    patterns: &'a [Pattern],
}

impl SignalContext<'_> {
    fn recent_reactions(&self) -> &[Reaction] {
        let start = self.reactions.len().saturating_sub(RECENT_WINDOW);
        &self.reactions[start..]
    }

    fn has_pattern(&self, kind: PatternKind) -> bool {
        self.patterns.iter().any(|p| p.kind == kind)
    }
}

/// Evaluate the rule chain for the current pipeline run.
///
/// Returns NEUTRAL with confidence 0 when no rule fires; every firing rule
/// uses the latest close as the entry price.
pub fn synthesize_signal(
    latest: &Bar,
    levels: &LevelSet,
    reactions: &[Reaction],
    patterns: &[Pattern],
) -> Signal {
    let ctx = SignalContext {
        latest,
        levels,
        reactions,
        patterns,
    };

    // Priority order: later rules overwrite earlier ones.
    let rules: [fn(&SignalContext) -> Option<Signal>; 3] = [
        support_proximity_rule,
        resistance_proximity_rule,
        momentum_override_rule,
    ];

    let mut signal = Signal::neutral(latest.close, latest.time);
    for rule in rules {
        if let Some(s) = rule(&ctx) {
            signal = s;
        }
    }
    signal
}

/// BUY when price sits on a support that has recently held.
fn support_proximity_rule(ctx: &SignalContext) -> Option<Signal> {
    let close = ctx.latest.close;
    let near = ctx
        .levels
        .supports()
        .iter()
        .any(|l| (close - l.price).abs() / l.price <= PROXIMITY);
    if !near {
        return None;
    }

    let bounces = ctx
        .recent_reactions()
        .iter()
        .filter(|r| r.kind == ReactionKind::Bounce && r.level.kind == LevelKind::Support)
        .count();
    let uptrend = ctx.has_pattern(PatternKind::Uptrend);
    if bounces < 2 && !uptrend {
        return None;
    }

    let support = ctx.levels.nearest_support(close);
    let confidence = (60.0 + 10.0 * bounces as f64 + if uptrend { 15.0 } else { 0.0 }).min(95.0);
    let reason = if uptrend {
        format!("price at support {} with uptrend intact ({bounces} recent bounces)", support.name)
    } else {
        format!("support {} holding after {bounces} recent bounces", support.name)
    };
    Some(Signal {
        kind: SignalKind::Buy,
        confidence,
        reason,
        entry: close,
        stop_loss: Some(support.price * 0.997),
        take_profit: Some(ctx.levels.get(LevelName::R1).price),
        time: ctx.latest.time,
    })
}

/// SELL when price presses into a resistance that has recently rejected it.
fn resistance_proximity_rule(ctx: &SignalContext) -> Option<Signal> {
    let close = ctx.latest.close;
    let near = ctx
        .levels
        .resistances()
        .iter()
        .any(|l| (close - l.price).abs() / l.price <= PROXIMITY);
    if !near {
        return None;
    }

    let rejections = ctx
        .recent_reactions()
        .iter()
        .filter(|r| r.kind == ReactionKind::Rejection && r.level.kind == LevelKind::Resistance)
        .count();
    let downtrend = ctx.has_pattern(PatternKind::Downtrend);
    if rejections < 2 && !downtrend {
        return None;
    }

    let resistance = ctx.levels.nearest_resistance(close);
    let confidence =
        (60.0 + 10.0 * rejections as f64 + if downtrend { 15.0 } else { 0.0 }).min(95.0);
    let reason = if downtrend {
        format!(
            "price at resistance {} with downtrend intact ({rejections} recent rejections)",
            resistance.name
        )
    } else {
        format!(
            "resistance {} capping price after {rejections} recent rejections",
            resistance.name
        )
    };
    Some(Signal {
        kind: SignalKind::Sell,
        confidence,
        reason,
        entry: close,
        stop_loss: Some(resistance.price * 1.003),
        take_profit: Some(ctx.levels.get(LevelName::S1).price),
        time: ctx.latest.time,
    })
}

/// Follow the most recent reaction when it is a breakout, replacing any
/// proximity verdict regardless of direction.
fn momentum_override_rule(ctx: &SignalContext) -> Option<Signal> {
    let last = ctx.reactions.last()?;
    if last.kind != ReactionKind::Breakout {
        return None;
    }

    let close = ctx.latest.close;
    let level = &last.level;
    let confidence = (70.0 + 2.0 * last.strength).min(90.0);

    let signal = match level.kind {
        LevelKind::Resistance => Signal {
            kind: SignalKind::Buy,
            confidence,
            reason: format!("momentum breakout above resistance {}", level.name),
            entry: close,
            stop_loss: Some(level.price * 0.998),
            take_profit: Some(
                ctx.levels
                    .next_resistance_above(level.name)
                    .map(|l| l.price)
                    .unwrap_or(level.price * 1.01),
            ),
            time: ctx.latest.time,
        },
        LevelKind::Support => Signal {
            kind: SignalKind::Sell,
            confidence,
            reason: format!("momentum breakdown below support {}", level.name),
            entry: close,
            stop_loss: Some(level.price * 1.002),
            take_profit: Some(
                ctx.levels
                    .next_support_below(level.name)
                    .map(|l| l.price)
                    .unwrap_or(level.price * 0.99),
            ),
            time: ctx.latest.time,
        },
    };
    Some(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::levels::compute_levels;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
    }

    /// Anchor {high: 100, low: 99} -> R1 = 100.09, S1 = 98.9109.
    fn reference_levels() -> LevelSet {
        let anchor = Bar {
            time: t0(),
            open: 99.5,
            high: 100.0,
            low: 99.0,
            close: 99.8,
            volume: None,
        };
        compute_levels(&anchor).unwrap()
    }

    fn latest(close: f64) -> Bar {
        Bar {
            time: t0() + Duration::minutes(30),
            open: close,
            high: close + 0.05,
            low: close - 0.05,
            close,
            volume: None,
        }
    }

    fn reaction(seq: i64, levels: &LevelSet, name: LevelName, kind: ReactionKind) -> Reaction {
        Reaction {
            level: *levels.get(name),
            kind,
            strength: 0.1,
            time: t0() + Duration::minutes(seq),
        }
    }

    fn uptrend_pattern() -> Pattern {
        Pattern {
            kind: PatternKind::Uptrend,
            level: None,
            occurrences: 2,
            success_rate: 80.0,
            description: "2 resistance levels broken in sequence".into(),
        }
    }

    fn downtrend_pattern() -> Pattern {
        Pattern {
            kind: PatternKind::Downtrend,
            level: None,
            occurrences: 2,
            success_rate: 80.0,
            description: "2 support levels broken in sequence".into(),
        }
    }

    #[test]
    fn no_rule_fires_neutral() {
        let levels = reference_levels();
        // Mid-range close, no reactions, no patterns.
        let signal = synthesize_signal(&latest(99.5), &levels, &[], &[]);
        assert_eq!(signal.kind, SignalKind::Neutral);
        assert_eq!(signal.confidence, 0.0);
        assert_eq!(signal.reason, "no clear signal");
    }

    #[test]
    fn proximity_alone_without_evidence_stays_neutral() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // At support but only one recent bounce and no uptrend.
        let reactions = [reaction(1, &levels, LevelName::S1, ReactionKind::Bounce)];
        let signal = synthesize_signal(&latest(s1 * 1.001), &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Neutral);
    }

    #[test]
    fn support_proximity_buy_from_bounces() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        let reactions = [
            reaction(1, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(2, &levels, LevelName::S1, ReactionKind::Bounce),
        ];
        let bar = latest(s1 * 1.001);
        let signal = synthesize_signal(&bar, &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 80.0); // 60 + 10*2
        assert_eq!(signal.entry, bar.close);
        assert_eq!(signal.stop_loss, Some(s1 * 0.997));
        assert_eq!(signal.take_profit, Some(levels.get(LevelName::R1).price));
    }

    #[test]
    fn support_proximity_buy_from_uptrend_alone() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        let patterns = [uptrend_pattern()];
        let signal = synthesize_signal(&latest(s1 * 0.9995), &levels, &[], &patterns);
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 75.0); // 60 + 0 bounces + 15
        assert!(signal.reason.contains("uptrend"));
    }

    #[test]
    fn support_confidence_is_capped_at_95() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // Five support bounces in the window plus an uptrend: 60+50+15 -> capped.
        let reactions: Vec<Reaction> = (0..5)
            .map(|i| reaction(i, &levels, LevelName::S1, ReactionKind::Bounce))
            .collect();
        let patterns = [uptrend_pattern()];
        let signal = synthesize_signal(&latest(s1 * 1.001), &levels, &reactions, &patterns);
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 95.0);
    }

    #[test]
    fn resistance_proximity_sell_from_rejections() {
        let levels = reference_levels();
        let r1 = levels.get(LevelName::R1).price;
        let reactions = [
            reaction(1, &levels, LevelName::R1, ReactionKind::Rejection),
            reaction(2, &levels, LevelName::R1, ReactionKind::Rejection),
        ];
        let bar = latest(r1 * 0.999);
        let signal = synthesize_signal(&bar, &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Sell);
        assert_eq!(signal.confidence, 80.0);
        assert_eq!(signal.stop_loss, Some(r1 * 1.003));
        assert_eq!(signal.take_profit, Some(levels.get(LevelName::S1).price));
    }

    #[test]
    fn resistance_proximity_sell_from_downtrend_alone() {
        let levels = reference_levels();
        let r1 = levels.get(LevelName::R1).price;
        let patterns = [downtrend_pattern()];
        let signal = synthesize_signal(&latest(r1 * 1.0005), &levels, &[], &patterns);
        assert_eq!(signal.kind, SignalKind::Sell);
        assert_eq!(signal.confidence, 75.0);
        assert!(signal.reason.contains("downtrend"));
    }

    #[test]
    fn only_window_reactions_count() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // Two old bounces pushed out of the 5-reaction window by rejections
        // at resistance (which don't count for the support rule).
        let reactions = [
            reaction(1, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(2, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(3, &levels, LevelName::R1, ReactionKind::Rejection),
            reaction(4, &levels, LevelName::R1, ReactionKind::Rejection),
            reaction(5, &levels, LevelName::R2, ReactionKind::Rejection),
            reaction(6, &levels, LevelName::R2, ReactionKind::Rejection),
            reaction(7, &levels, LevelName::R3, ReactionKind::Rejection),
        ];
        let signal = synthesize_signal(&latest(s1 * 1.001), &levels, &reactions, &[]);
        // Support rule sees zero bounces in the window; resistance rule isn't
        // near; the last reaction isn't a breakout -> neutral.
        assert_eq!(signal.kind, SignalKind::Neutral);
    }

    #[test]
    fn momentum_breakout_buy_with_next_rung_target() {
        let levels = reference_levels();
        let r1 = levels.get(LevelName::R1);
        let reactions = [Reaction {
            level: *r1,
            kind: ReactionKind::Breakout,
            strength: 4.0,
            time: t0() + Duration::minutes(5),
        }];
        let bar = latest(r1.price * 1.004);
        let signal = synthesize_signal(&bar, &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 78.0); // 70 + 2*4
        assert_eq!(signal.stop_loss, Some(r1.price * 0.998));
        assert_eq!(signal.take_profit, Some(levels.get(LevelName::R2).price));
    }

    #[test]
    fn momentum_confidence_is_capped_at_90() {
        let levels = reference_levels();
        let r1 = levels.get(LevelName::R1);
        let reactions = [Reaction {
            level: *r1,
            kind: ReactionKind::Breakout,
            strength: 50.0,
            time: t0() + Duration::minutes(5),
        }];
        let signal = synthesize_signal(&latest(r1.price * 1.05), &levels, &reactions, &[]);
        assert_eq!(signal.confidence, 90.0);
    }

    #[test]
    fn momentum_beyond_outermost_rung_uses_fallback_target() {
        let levels = reference_levels();
        let r4 = levels.get(LevelName::R4);
        let reactions = [Reaction {
            level: *r4,
            kind: ReactionKind::Breakout,
            strength: 1.0,
            time: t0() + Duration::minutes(5),
        }];
        let signal = synthesize_signal(&latest(r4.price * 1.01), &levels, &reactions, &[]);
        assert_eq!(signal.take_profit, Some(r4.price * 1.01));

        let s4 = levels.get(LevelName::S4);
        let reactions = [Reaction {
            level: *s4,
            kind: ReactionKind::Breakout,
            strength: 1.0,
            time: t0() + Duration::minutes(5),
        }];
        let signal = synthesize_signal(&latest(s4.price * 0.99), &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Sell);
        assert_eq!(signal.stop_loss, Some(s4.price * 1.002));
        assert_eq!(signal.take_profit, Some(s4.price * 0.99));
    }

    #[test]
    fn momentum_override_beats_contradicting_proximity() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // Support proximity would emit BUY (two bounces, at support), but the
        // most recent reaction is a support breakdown: momentum wins and the
        // final signal flips to SELL.
        let reactions = [
            reaction(1, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(2, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(3, &levels, LevelName::S1, ReactionKind::Breakout),
        ];
        let signal = synthesize_signal(&latest(s1 * 0.9985), &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Sell);
        assert!(signal.reason.contains("breakdown"));
    }

    #[test]
    fn momentum_override_replaces_agreeing_proximity_verdict() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // Support proximity fires BUY on its own, but the latest reaction is
        // a resistance breakout: the final signal must be momentum's BUY,
        // with the breakout's risk prices rather than the support's.
        let reactions = [
            reaction(1, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(2, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(3, &levels, LevelName::R1, ReactionKind::Breakout),
        ];
        let signal = synthesize_signal(&latest(s1 * 1.001), &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Buy);
        assert!(signal.reason.contains("momentum breakout"));
        let r1 = levels.get(LevelName::R1).price;
        assert_eq!(signal.stop_loss, Some(r1 * 0.998));
        assert_eq!(signal.take_profit, Some(levels.get(LevelName::R2).price));
    }

    #[test]
    fn old_breakout_does_not_override() {
        let levels = reference_levels();
        let s1 = levels.get(LevelName::S1).price;
        // A breakout deeper in the log loses to the proximity rule: only the
        // single most recent reaction can trigger the override.
        let reactions = [
            reaction(1, &levels, LevelName::S1, ReactionKind::Breakout),
            reaction(2, &levels, LevelName::S1, ReactionKind::Bounce),
            reaction(3, &levels, LevelName::S1, ReactionKind::Bounce),
        ];
        let signal = synthesize_signal(&latest(s1 * 1.001), &levels, &reactions, &[]);
        assert_eq!(signal.kind, SignalKind::Buy);
    }
}
