// src/core/cost.rs — Model whitelist, price table and per-session cost tracking

use std::collections::HashMap;

use crate::provider::TokenUsage;

/// Model used when the caller omits one or asks for one we don't relay.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Models the relay will forward to, in display order.
pub const SUPPORTED_MODELS: &[&str] = &["gpt-4o-mini", "gpt-3.5-turbo", "gpt-4o", "gpt-4-turbo"];

/// Map a requested model onto the whitelist. Anything unknown becomes
/// [`DEFAULT_MODEL`].
pub fn resolve_model(requested: Option<&str>) -> &'static str {
    let Some(requested) = requested else {
        return DEFAULT_MODEL;
    };
    SUPPORTED_MODELS
        .iter()
        .copied()
        .find(|m| *m == requested.trim())
        .unwrap_or(DEFAULT_MODEL)
}

/// Human-readable model label for menus.
pub fn display_name(model: &str) -> &'static str {
    match model {
        "gpt-4o-mini" => "GPT-4o Mini",
        "gpt-3.5-turbo" => "GPT-3.5 Turbo",
        "gpt-4o" => "GPT-4o",
        "gpt-4-turbo" => "GPT-4 Turbo",
        _ => "Unknown model",
    }
}

/// Returns (input_price_per_mtok, output_price_per_mtok).
///
/// Models outside the table are billed at the default model's rate.
pub fn model_pricing(model: &str) -> (f64, f64) {
    match model {
        "gpt-4o-mini" => (0.15, 0.6),
        "gpt-3.5-turbo" => (0.5, 1.5),
        "gpt-4o" => (5.0, 15.0),
        "gpt-4-turbo" => (10.0, 30.0),
        _ => model_pricing(DEFAULT_MODEL),
    }
}

/// Calculate cost in USD for a given model and token usage.
pub fn calculate_cost(model: &str, usage: &TokenUsage) -> f64 {
    let (input_price, output_price) = model_pricing(model);
    let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * input_price;
    let output_cost = (usage.output_tokens as f64 / 1_000_000.0) * output_price;
    input_cost + output_cost
}

/// Running totals for the relay calls made by one session.
#[derive(Debug, Default)]
pub struct CostTracker {
    pub total_usd: f64,
    pub by_model: HashMap<String, f64>,
    /// Token counts per model (input, output).
    pub tokens_by_model: HashMap<String, (u64, u64)>,
    /// Number of relay calls per model.
    pub calls_by_model: HashMap<String, u64>,
}

impl CostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call whose cost was already computed (e.g. by the relay server).
    pub fn record_priced(&mut self, model: &str, usage: &TokenUsage, cost: f64) {
        self.total_usd += cost;
        *self.by_model.entry(model.into()).or_default() += cost;
        let tokens = self.tokens_by_model.entry(model.into()).or_insert((0, 0));
        tokens.0 += usage.input_tokens as u64;
        tokens.1 += usage.output_tokens as u64;
        *self.calls_by_model.entry(model.into()).or_default() += 1;
    }

    /// Total tokens used (input + output across all models).
    pub fn total_tokens(&self) -> u64 {
        self.tokens_by_model.values().map(|(i, o)| i + o).sum()
    }

    /// Total relay calls across all models.
    pub fn total_calls(&self) -> u64 {
        self.calls_by_model.values().sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "${:.4} over {} call(s), {} tokens",
            self.total_usd,
            self.total_calls(),
            self.total_tokens()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u32, output: u32) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    // ─── model whitelist ────────────────────────────────────────

    #[test]
    fn test_resolve_known_models() {
        for m in SUPPORTED_MODELS {
            assert_eq!(resolve_model(Some(m)), *m);
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(resolve_model(Some("claude-opus-4")), DEFAULT_MODEL);
        assert_eq!(resolve_model(Some("")), DEFAULT_MODEL);
        assert_eq!(resolve_model(None), DEFAULT_MODEL);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("gpt-4o"), "GPT-4o");
        assert_eq!(display_name("gpt-3.5-turbo"), "GPT-3.5 Turbo");
    }

    // ─── pricing ────────────────────────────────────────────────

    #[test]
    fn test_pricing_table() {
        assert_eq!(model_pricing("gpt-4o-mini"), (0.15, 0.6));
        assert_eq!(model_pricing("gpt-3.5-turbo"), (0.5, 1.5));
        assert_eq!(model_pricing("gpt-4o"), (5.0, 15.0));
        assert_eq!(model_pricing("gpt-4-turbo"), (10.0, 30.0));
    }

    #[test]
    fn test_pricing_unknown_uses_default_rate() {
        assert_eq!(model_pricing("some-unknown-model"), (0.15, 0.6));
    }

    #[test]
    fn test_calculate_cost_basic() {
        // 1M input × $5 + 500K output × $15 = $5 + $7.50
        let cost = calculate_cost("gpt-4o", &usage(1_000_000, 500_000));
        assert!((cost - 12.50).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_cost_small_turn() {
        // 120 in × 0.15/1M + 40 out × 0.6/1M
        let cost = calculate_cost("gpt-4o-mini", &usage(120, 40));
        assert!((cost - 0.000_042).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_cost_zero_usage() {
        assert_eq!(calculate_cost("gpt-4-turbo", &usage(0, 0)), 0.0);
    }

    // ─── CostTracker ────────────────────────────────────────────

    #[test]
    fn test_tracker_new() {
        let t = CostTracker::new();
        assert_eq!(t.total_usd, 0.0);
        assert_eq!(t.total_tokens(), 0);
        assert_eq!(t.total_calls(), 0);
    }

    #[test]
    fn test_tracker_accumulates_across_models() {
        let mut t = CostTracker::new();
        for model in ["gpt-4o", "gpt-4o-mini"] {
            let u = usage(1000, 500);
            t.record_priced(model, &u, calculate_cost(model, &u));
        }
        assert_eq!(t.by_model.len(), 2);
        assert_eq!(t.total_calls(), 2);
        assert_eq!(t.total_tokens(), 3000);
        let expected =
            calculate_cost("gpt-4o", &usage(1000, 500)) + calculate_cost("gpt-4o-mini", &usage(1000, 500));
        assert!((t.total_usd - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tracker_record_priced_trusts_given_cost() {
        let mut t = CostTracker::new();
        t.record_priced("gpt-4o", &usage(10, 10), 0.25);
        assert!((t.total_usd - 0.25).abs() < 1e-12);
        assert!(t.summary().starts_with("$0.2500"));
    }
}
