//! Token usage and cost types.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Token usage for one model call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<ModelTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens_details: Option<ModelTokensDetails>,
}

/// Per-modality breakdown of a token count.
///
/// Cached counts are a subset of the matching modality count.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_text_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_audio_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_image_tokens: Option<u32>,
}

impl ModelTokensDetails {
    fn merge(&mut self, other: &ModelTokensDetails) {
        add_opt(&mut self.text_tokens, other.text_tokens);
        add_opt(&mut self.cached_text_tokens, other.cached_text_tokens);
        add_opt(&mut self.audio_tokens, other.audio_tokens);
        add_opt(&mut self.cached_audio_tokens, other.cached_audio_tokens);
        add_opt(&mut self.image_tokens, other.image_tokens);
        add_opt(&mut self.cached_image_tokens, other.cached_image_tokens);
    }
}

fn add_opt(target: &mut Option<u32>, value: Option<u32>) {
    if let Some(v) = value {
        *target.get_or_insert(0) += v;
    }
}

impl ModelUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            ..Default::default()
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Whether this report carries a per-modality breakdown.
    pub fn has_details(&self) -> bool {
        self.input_tokens_details.is_some() || self.output_tokens_details.is_some()
    }

    /// Add another call's usage into this one.
    ///
    /// Only meaningful across separate calls. Reports within one stream are
    /// running totals and replace each other instead.
    pub fn merge(&mut self, other: &ModelUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        if let Some(d) = &other.input_tokens_details {
            self.input_tokens_details
                .get_or_insert_with(Default::default)
                .merge(d);
        }
        if let Some(d) = &other.output_tokens_details {
            self.output_tokens_details
                .get_or_insert_with(Default::default)
                .merge(d);
        }
    }

    /// Compute cost in USD from per-million-token pricing.
    ///
    /// Without a breakdown, all tokens are priced at the text rates.
    pub fn calculate_cost(&self, pricing: &ModelPricing) -> f64 {
        let input = match &self.input_tokens_details {
            Some(d) => {
                modality_cost(
                    d.text_tokens,
                    d.cached_text_tokens,
                    pricing.input_text_per_m,
                    pricing.input_cached_text_per_m,
                ) + modality_cost(
                    d.audio_tokens,
                    d.cached_audio_tokens,
                    pricing.input_audio_per_m,
                    pricing.input_cached_audio_per_m,
                ) + modality_cost(
                    d.image_tokens,
                    d.cached_image_tokens,
                    pricing.input_image_per_m,
                    pricing.input_cached_image_per_m,
                )
            }
            None => per_m(self.input_tokens, pricing.input_text_per_m),
        };
        let output = match &self.output_tokens_details {
            Some(d) => {
                per_m(d.text_tokens.unwrap_or(0), pricing.output_text_per_m)
                    + per_m(d.audio_tokens.unwrap_or(0), pricing.output_audio_per_m)
                    + per_m(d.image_tokens.unwrap_or(0), pricing.output_image_per_m)
            }
            None => per_m(self.output_tokens, pricing.output_text_per_m),
        };
        input + output
    }
}

fn per_m(tokens: u32, price_per_m: f64) -> f64 {
    (tokens as f64 / 1_000_000.0) * price_per_m
}

fn modality_cost(
    tokens: Option<u32>,
    cached: Option<u32>,
    price_per_m: f64,
    cached_price_per_m: Option<f64>,
) -> f64 {
    let tokens = tokens.unwrap_or(0);
    let cached = cached.unwrap_or(0).min(tokens);
    per_m(tokens - cached, price_per_m)
        + per_m(cached, cached_price_per_m.unwrap_or(price_per_m))
}

/// Per-million-token prices for one model, in USD.
///
/// Cached rates fall back to the uncached rate when absent.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelPricing {
    #[builder(default)]
    #[serde(default)]
    pub input_text_per_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cached_text_per_m: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub input_audio_per_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cached_audio_per_m: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub input_image_per_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cached_image_per_m: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub output_text_per_m: f64,
    #[builder(default)]
    #[serde(default)]
    pub output_audio_per_m: f64,
    #[builder(default)]
    #[serde(default)]
    pub output_image_per_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn coarse_usage_priced_at_text_rates() {
        let usage = ModelUsage::new(1_000_000, 500_000);
        let pricing = ModelPricing::builder()
            .input_text_per_m(2.5)
            .output_text_per_m(10.0)
            .build();
        assert!(approx(usage.calculate_cost(&pricing), 7.5));
    }

    #[test]
    fn detailed_usage_prices_each_modality() {
        let usage = ModelUsage {
            input_tokens: 3_000_000,
            output_tokens: 1_000_000,
            input_tokens_details: Some(ModelTokensDetails {
                text_tokens: Some(2_000_000),
                cached_text_tokens: Some(1_000_000),
                audio_tokens: Some(1_000_000),
                ..Default::default()
            }),
            output_tokens_details: Some(ModelTokensDetails {
                audio_tokens: Some(1_000_000),
                ..Default::default()
            }),
        };
        let pricing = ModelPricing::builder()
            .input_text_per_m(2.0)
            .input_cached_text_per_m(0.5)
            .input_audio_per_m(40.0)
            .output_text_per_m(8.0)
            .output_audio_per_m(80.0)
            .build();
        // 1M uncached text * 2 + 1M cached * 0.5 + 1M audio * 40 + 1M audio out * 80
        assert!(approx(usage.calculate_cost(&pricing), 122.5));
    }

    #[test]
    fn cached_rate_falls_back_to_base_rate() {
        let usage = ModelUsage {
            input_tokens: 1_000_000,
            output_tokens: 0,
            input_tokens_details: Some(ModelTokensDetails {
                text_tokens: Some(1_000_000),
                cached_text_tokens: Some(400_000),
                ..Default::default()
            }),
            output_tokens_details: None,
        };
        let pricing = ModelPricing::builder().input_text_per_m(3.0).build();
        assert!(approx(usage.calculate_cost(&pricing), 3.0));
    }

    #[test]
    fn merge_accumulates_counts_and_details() {
        let mut total = ModelUsage::new(10, 20);
        total.merge(&ModelUsage {
            input_tokens: 5,
            output_tokens: 15,
            input_tokens_details: Some(ModelTokensDetails {
                cached_text_tokens: Some(3),
                ..Default::default()
            }),
            output_tokens_details: None,
        });
        assert_eq!(total.input_tokens, 15);
        assert_eq!(total.output_tokens, 35);
        assert_eq!(total.total_tokens(), 50);
        assert_eq!(
            total.input_tokens_details.unwrap().cached_text_tokens,
            Some(3)
        );
    }
}
