//! Market-basket mining over same-day sale baskets.
//!
//! A basket is the set of distinct products sold on one calendar date. The
//! order log carries no basket/order id, so same-day co-occurrence stands in
//! for "same order" — a documented approximation, not a bug to fix here. If
//! a true order id ever becomes available, group on that instead.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::error::{EngineError, EngineResult};
use stocklens_core::records::OrderRecord;

/// Minimum baskets before mining produces anything.
const MIN_BASKETS: usize = 3;
/// Lift at or above which a rule counts as "strong" in the insight list.
const STRONG_LIFT: f64 = 2.0;

/// Mining thresholds and output caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasketConfig {
    /// Minimum pair support (fraction of baskets, 0–1).
    pub min_support: f64,
    /// Minimum rule confidence (0–1).
    pub min_confidence: f64,
    pub max_rules: usize,
    pub max_pairs: usize,
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            min_support: 0.03,
            min_confidence: 0.25,
            max_rules: 20,
            max_pairs: 15,
        }
    }
}

impl BasketConfig {
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    fn validate(&self) -> EngineResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(EngineError::invalid_parameter(
                "min_support must be in (0, 1]",
            ));
        }
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(EngineError::invalid_parameter(
                "min_confidence must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// An unordered product pair that clears the support threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentPair {
    pub product_a: String,
    pub product_b: String,
    /// Baskets containing both products.
    pub count: usize,
    /// `count / total_baskets`, 0–1.
    pub support: f64,
}

/// A directional rule "antecedent → consequent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: String,
    pub consequent: String,
    /// Pair support, 0–1.
    pub support: f64,
    /// `co_occurrence / freq(antecedent)`, 0–1.
    pub confidence: f64,
    /// Confidence over the consequent's baseline frequency; > 1 means
    /// positive association.
    pub lift: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketAnalysis {
    pub total_baskets: usize,
    /// Ranked by lift descending, capped at `max_rules`.
    pub rules: Vec<AssociationRule>,
    /// Ranked by raw count descending, capped at `max_pairs`.
    pub frequent_pairs: Vec<FrequentPair>,
    pub insights: Vec<String>,
}

/// Mine frequent pairs and association rules from same-day sale baskets.
pub fn mine_baskets(orders: &[OrderRecord], config: &BasketConfig) -> EngineResult<BasketAnalysis> {
    config.validate()?;

    let baskets = collect_baskets(orders);
    let total = baskets.len();
    if total < MIN_BASKETS {
        return Ok(BasketAnalysis::default());
    }

    let mut item_freq: BTreeMap<&str, usize> = BTreeMap::new();
    let mut pair_counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for basket in &baskets {
        for product in basket {
            *item_freq.entry(product.as_str()).or_insert(0) += 1;
        }
        // BTreeSet iteration is sorted, so (a, b) is already the canonical
        // unordered-pair key.
        let products: Vec<&str> = basket.iter().map(String::as_str).collect();
        for (i, &a) in products.iter().enumerate() {
            for &b in &products[i + 1..] {
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    let mut frequent_pairs: Vec<FrequentPair> = pair_counts
        .iter()
        .filter_map(|((a, b), count)| {
            let support = *count as f64 / total as f64;
            (support >= config.min_support).then(|| FrequentPair {
                product_a: a.to_string(),
                product_b: b.to_string(),
                count: *count,
                support,
            })
        })
        .collect();

    let mut rules = Vec::new();
    for pair in &frequent_pairs {
        for (antecedent, consequent) in [
            (&pair.product_a, &pair.product_b),
            (&pair.product_b, &pair.product_a),
        ] {
            let antecedent_freq = item_freq[antecedent.as_str()];
            let consequent_freq = item_freq[consequent.as_str()];
            if antecedent_freq == 0 || consequent_freq == 0 {
                continue;
            }
            let confidence = pair.count as f64 / antecedent_freq as f64;
            let baseline = consequent_freq as f64 / total as f64;
            let lift = confidence / baseline;
            if confidence >= config.min_confidence && lift > 1.0 {
                rules.push(AssociationRule {
                    antecedent: antecedent.clone(),
                    consequent: consequent.clone(),
                    support: pair.support,
                    confidence,
                    lift,
                });
            }
        }
    }

    rules.sort_by(|a, b| b.lift.total_cmp(&a.lift));
    rules.truncate(config.max_rules);
    frequent_pairs.sort_by(|a, b| b.count.cmp(&a.count));
    frequent_pairs.truncate(config.max_pairs);

    let insights = build_insights(total, &rules, &frequent_pairs);
    debug!(
        baskets = total,
        pairs = frequent_pairs.len(),
        rules = rules.len(),
        "mined association rules"
    );

    Ok(BasketAnalysis {
        total_baskets: total,
        rules,
        frequent_pairs,
        insights,
    })
}

/// Distinct product sets per sale date.
fn collect_baskets(orders: &[OrderRecord]) -> Vec<BTreeSet<String>> {
    let mut by_date: BTreeMap<chrono::NaiveDate, BTreeSet<String>> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.is_sale()) {
        by_date
            .entry(order.order_date)
            .or_default()
            .insert(order.product_id.clone());
    }
    by_date.into_values().collect()
}

fn build_insights(
    total: usize,
    rules: &[AssociationRule],
    pairs: &[FrequentPair],
) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(top) = rules.first() {
        insights.push(format!(
            "Buyers of {} also pick up {} {:.0}% of the time (lift {:.1})",
            top.antecedent,
            top.consequent,
            top.confidence * 100.0,
            top.lift
        ));
    }
    if let Some(top) = pairs.first() {
        insights.push(format!(
            "{} and {} appear together in {} of {} baskets",
            top.product_a, top.product_b, top.count, total
        ));
    }
    let strong = rules.iter().filter(|r| r.lift >= STRONG_LIFT).count();
    if strong > 0 {
        insights.push(format!(
            "{strong} rule(s) show strong association (lift >= 2) - candidates for bundling"
        ));
    }
    insights
}
