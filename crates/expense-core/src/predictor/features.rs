//! Feature schemas for the expense model
//!
//! Two trained model generations exist and they disagree on how living
//! arrangement and income are represented:
//!
//! - housing schema: `Hostel` and `Rental` indicators, no income feature
//! - income schema: `Hostel` indicator only, plus `PartTimeIncome`, and an
//!   affordability comparison on the output
//!
//! The schema is picked from the feature names the loaded artifact declares.
//! The record is then validated by name against those names and reordered to
//! match them before it reaches the model.

use super::output::OutputFormatter;
use crate::error::{PredictorError, Result};
use crate::models::{EncodedAnswers, FeatureRow, Insight};
use std::collections::HashSet;
use std::fmt;

pub const SHOP_NON_ESSENTIAL: &str = "ShopNonEssential";
pub const ALLOWANCE: &str = "Allowance";
pub const HOSTEL: &str = "Hostel";
pub const RENTAL: &str = "Rental";
pub const EAT_OUT: &str = "EatOut";
pub const LAPTOP: &str = "Laptop";
pub const PART_TIME_INCOME: &str = "PartTimeIncome";
pub const TRACK_EXPENSES: &str = "TrackExpenses";
pub const CONSCIOUS: &str = "Conscious";

/// Named feature values in a schema's canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(&'static str, f64)>,
}

impl FeatureRecord {
    pub fn new(fields: Vec<(&'static str, f64)>) -> Self {
        Self { fields }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// Select fields in the model's declared order.
    ///
    /// The declared names must be exactly the record's names: a missing,
    /// extra or duplicated name is a schema error, never a silent drop.
    pub fn reindex(&self, declared: &[String]) -> Result<FeatureRow> {
        let mut seen = HashSet::with_capacity(declared.len());
        let duplicates: Vec<&str> = declared
            .iter()
            .filter(|name| !seen.insert(name.as_str()))
            .map(String::as_str)
            .collect();
        if !duplicates.is_empty() {
            return Err(PredictorError::FeatureSchema(format!(
                "model declares duplicate features {:?}",
                duplicates
            )));
        }

        let missing: Vec<&str> = declared
            .iter()
            .map(String::as_str)
            .filter(|name| self.get(name).is_none())
            .collect();
        let extra: Vec<&str> = self
            .names()
            .filter(|name| !seen.contains(name))
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            return Err(PredictorError::FeatureSchema(format!(
                "record is missing {:?} and has unexpected {:?}",
                missing, extra
            )));
        }

        let values = declared
            .iter()
            .filter_map(|name| self.get(name))
            .collect();
        Ok(FeatureRow {
            names: declared.to_vec(),
            values,
        })
    }
}

/// Feature layout of one trained model generation
pub trait FeatureSchema: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Canonical field list
    fn fields(&self) -> &'static [&'static str];

    fn build_record(&self, answers: &EncodedAnswers) -> FeatureRecord;

    /// Optional comparison of the prediction against stated income
    fn insight(
        &self,
        _prediction: f64,
        _answers: &EncodedAnswers,
        _formatter: &OutputFormatter,
    ) -> Option<Insight> {
        None
    }
}

/// Housing schema: living arrangement as two exclusive indicators
#[derive(Debug, Clone, Copy, Default)]
pub struct HousingSchema;

pub static HOUSING_SCHEMA: HousingSchema = HousingSchema;

impl FeatureSchema for HousingSchema {
    fn name(&self) -> &'static str {
        "housing"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            SHOP_NON_ESSENTIAL,
            ALLOWANCE,
            HOSTEL,
            RENTAL,
            EAT_OUT,
            LAPTOP,
            TRACK_EXPENSES,
            CONSCIOUS,
        ]
    }

    fn build_record(&self, a: &EncodedAnswers) -> FeatureRecord {
        FeatureRecord::new(vec![
            (SHOP_NON_ESSENTIAL, a.shop_non_essential as f64),
            (ALLOWANCE, a.allowance as f64),
            (HOSTEL, indicator(a.living.is_hostel())),
            (RENTAL, indicator(a.living.is_rental())),
            (EAT_OUT, a.eat_out as f64),
            (LAPTOP, a.laptop as f64),
            (TRACK_EXPENSES, a.track_expenses as f64),
            (CONSCIOUS, a.conscious as f64),
        ])
    }
}

/// Income schema: hostel indicator plus part-time income
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeSchema;

pub static INCOME_SCHEMA: IncomeSchema = IncomeSchema;

impl FeatureSchema for IncomeSchema {
    fn name(&self) -> &'static str {
        "income"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            SHOP_NON_ESSENTIAL,
            ALLOWANCE,
            HOSTEL,
            EAT_OUT,
            LAPTOP,
            PART_TIME_INCOME,
            TRACK_EXPENSES,
            CONSCIOUS,
        ]
    }

    fn build_record(&self, a: &EncodedAnswers) -> FeatureRecord {
        FeatureRecord::new(vec![
            (SHOP_NON_ESSENTIAL, a.shop_non_essential as f64),
            (ALLOWANCE, a.allowance as f64),
            (HOSTEL, indicator(a.living.is_hostel())),
            (EAT_OUT, a.eat_out as f64),
            (LAPTOP, a.laptop as f64),
            (PART_TIME_INCOME, a.part_time_income as f64),
            (TRACK_EXPENSES, a.track_expenses as f64),
            (CONSCIOUS, a.conscious as f64),
        ])
    }

    fn insight(
        &self,
        prediction: f64,
        answers: &EncodedAnswers,
        formatter: &OutputFormatter,
    ) -> Option<Insight> {
        Some(formatter.affordability(prediction, answers.total_income()))
    }
}

/// Every schema a model artifact may declare
pub static KNOWN_SCHEMAS: &[&dyn FeatureSchema] = &[&HOUSING_SCHEMA, &INCOME_SCHEMA];

/// Pick the schema whose field set equals the declared feature names
pub fn select_schema(declared: &[String]) -> Result<&'static dyn FeatureSchema> {
    let declared_set: HashSet<&str> = declared.iter().map(String::as_str).collect();
    KNOWN_SCHEMAS
        .iter()
        .copied()
        .find(|schema| {
            schema.fields().len() == declared.len()
                && schema.fields().iter().all(|f| declared_set.contains(f))
        })
        .ok_or_else(|| {
            PredictorError::FeatureSchema(format!(
                "declared features {:?} match no known schema",
                declared
            ))
        })
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::LivingArrangement;

    fn answers(living: LivingArrangement) -> EncodedAnswers {
        EncodedAnswers {
            allowance: 300,
            part_time_income: 120,
            living,
            shop_non_essential: 1,
            eat_out: 2,
            laptop: 1,
            track_expenses: 0,
            conscious: 4,
        }
    }

    fn names(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_housing_living_indicators() {
        let cases = [
            (LivingArrangement::WithFamily, 0.0, 0.0),
            (LivingArrangement::OnCampusHostel, 1.0, 0.0),
            (LivingArrangement::OffCampusRental, 0.0, 1.0),
        ];
        for (living, hostel, rental) in cases {
            let record = HOUSING_SCHEMA.build_record(&answers(living));
            assert_eq!(record.get(HOSTEL), Some(hostel), "{living:?}");
            assert_eq!(record.get(RENTAL), Some(rental), "{living:?}");
        }
    }

    #[test]
    fn test_income_living_indicator() {
        let cases = [
            (LivingArrangement::WithFamily, 0.0),
            (LivingArrangement::OnCampusHostel, 1.0),
            (LivingArrangement::OffCampusRental, 0.0),
        ];
        for (living, hostel) in cases {
            let record = INCOME_SCHEMA.build_record(&answers(living));
            assert_eq!(record.get(HOSTEL), Some(hostel), "{living:?}");
            assert_eq!(record.get(RENTAL), None);
            assert_eq!(record.get(PART_TIME_INCOME), Some(120.0));
        }
    }

    #[test]
    fn test_record_fields_match_schema_fields() {
        for schema in KNOWN_SCHEMAS {
            let record = schema.build_record(&answers(LivingArrangement::WithFamily));
            let built: Vec<&str> = record.names().collect();
            assert_eq!(built, schema.fields().to_vec(), "{}", schema.name());
        }
    }

    #[test]
    fn test_reindex_follows_declared_order() {
        let record = INCOME_SCHEMA.build_record(&answers(LivingArrangement::OnCampusHostel));
        let declared = names(&[
            CONSCIOUS,
            TRACK_EXPENSES,
            PART_TIME_INCOME,
            LAPTOP,
            EAT_OUT,
            HOSTEL,
            ALLOWANCE,
            SHOP_NON_ESSENTIAL,
        ]);
        let row = record.reindex(&declared).unwrap();
        assert_eq!(row.names, declared);
        assert_eq!(row.values, vec![4.0, 0.0, 120.0, 1.0, 2.0, 1.0, 300.0, 1.0]);
    }

    #[test]
    fn test_reindex_rejects_missing_field() {
        let record = HOUSING_SCHEMA.build_record(&answers(LivingArrangement::WithFamily));
        let declared = names(&HOUSING_SCHEMA.fields()[..7]);
        let err = record.reindex(&declared).unwrap_err();
        assert!(matches!(err, PredictorError::FeatureSchema(_)));
        assert!(err.to_string().contains(CONSCIOUS));
    }

    #[test]
    fn test_reindex_rejects_extra_field() {
        let record = HOUSING_SCHEMA.build_record(&answers(LivingArrangement::WithFamily));
        let mut declared = names(HOUSING_SCHEMA.fields());
        declared.push("Scholarship".to_string());
        let err = record.reindex(&declared).unwrap_err();
        assert!(err.to_string().contains("Scholarship"));
    }

    #[test]
    fn test_reindex_rejects_duplicates() {
        let record = HOUSING_SCHEMA.build_record(&answers(LivingArrangement::WithFamily));
        let mut declared = names(&HOUSING_SCHEMA.fields()[..7]);
        declared.push(ALLOWANCE.to_string());
        let err = record.reindex(&declared).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_select_schema_by_declared_names() {
        let housing = select_schema(&names(HOUSING_SCHEMA.fields())).unwrap();
        assert_eq!(housing.name(), "housing");

        let mut shuffled = names(INCOME_SCHEMA.fields());
        shuffled.reverse();
        let income = select_schema(&shuffled).unwrap();
        assert_eq!(income.name(), "income");

        let unknown = names(&[ALLOWANCE, HOSTEL]);
        assert!(matches!(
            select_schema(&unknown),
            Err(PredictorError::FeatureSchema(_))
        ));
    }

    #[test]
    fn test_only_income_schema_has_insight() {
        let formatter = OutputFormatter::new();
        let a = answers(LivingArrangement::WithFamily);
        assert!(HOUSING_SCHEMA.insight(500.0, &a, &formatter).is_none());
        assert!(INCOME_SCHEMA.insight(500.0, &a, &formatter).is_some());
    }
}
