//! Survey input collection
//!
//! Translates raw answers from the presentation layer into the encodings the
//! model was trained on. Pure mapping: no I/O, no state.

mod choices;

pub use choices::{Choice, EatOutFrequency, LivingArrangement, ShopFrequency, YesNo};

use crate::error::{PredictorError, Result};
use crate::models::{EncodedAnswers, RawAnswers};
use std::ops::RangeInclusive;

/// Accepted range of the financial discipline scale
pub const DISCIPLINE_RANGE: RangeInclusive<i64> = 1..=5;

/// Normalizes raw survey answers into model encodings
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCollector;

impl InputCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, raw: &RawAnswers) -> Result<EncodedAnswers> {
        let living = parse_field::<LivingArrangement>("living", &raw.living)?;
        let shop = parse_field::<ShopFrequency>("shop_frequency", &raw.shop_frequency)?;
        let eat_out = parse_field::<EatOutFrequency>("eat_out", &raw.eat_out)?;
        let laptop = parse_field::<YesNo>("laptop", &raw.laptop)?;
        let track = parse_field::<YesNo>("track_expenses", &raw.track_expenses)?;

        Ok(EncodedAnswers {
            allowance: clamp_amount(raw.allowance),
            part_time_income: clamp_amount(raw.part_time_income),
            living,
            shop_non_essential: shop.code(),
            eat_out: eat_out.code(),
            laptop: laptop.code(),
            track_expenses: track.code(),
            conscious: encode_discipline(raw.discipline)?,
        })
    }
}

/// Amounts below zero are treated as zero
pub fn clamp_amount(amount: i64) -> u64 {
    amount.max(0) as u64
}

pub fn encode_discipline(value: i64) -> Result<u8> {
    if DISCIPLINE_RANGE.contains(&value) {
        Ok(value as u8)
    } else {
        Err(PredictorError::invalid_input("discipline", value.to_string()))
    }
}

/// Parse a choice and report failures under the question's own name
fn parse_field<C: Choice>(field: &'static str, value: &str) -> Result<C> {
    C::parse(value).map_err(|e| match e {
        PredictorError::InvalidInput { value, .. } => PredictorError::InvalidInput { field, value },
        other => other,
    })
}
