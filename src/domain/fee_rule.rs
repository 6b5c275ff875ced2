use super::settings::{RuleKey, Setting};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Surcharge configuration for a single gateway.
///
/// `percent` is expressed in percent units, so `4.4` means 4.4% of the invoice total.
/// Both components are kept non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeRule {
    pub fixed: Decimal,
    pub percent: Decimal,
}

impl FeeRule {
    pub const ZERO: Self = Self {
        fixed: Decimal::ZERO,
        percent: Decimal::ZERO,
    };

    /// Builds a rule, clamping negative components to zero.
    pub fn new(fixed: Decimal, percent: Decimal) -> Self {
        Self {
            fixed: fixed.max(Decimal::ZERO),
            percent: percent.max(Decimal::ZERO),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.fixed.is_zero() && self.percent.is_zero()
    }

    /// Compact form of the rule used in line item descriptions: `5+4.4%`, `4.4%` or `5`.
    ///
    /// Zero components are omitted; a zero rule has no summary.
    pub fn summary(&self) -> Option<String> {
        let fixed = self.fixed.normalize();
        let percent = self.percent.normalize();
        match (fixed > Decimal::ZERO, percent > Decimal::ZERO) {
            (true, true) => Some(format!("{fixed}+{percent}%")),
            (false, true) => Some(format!("{percent}%")),
            (true, false) => Some(fixed.to_string()),
            (false, false) => None,
        }
    }

    /// Full line item description, e.g. `Payment Gateway Fees (5+4.4%)`.
    pub fn describe(&self, prefix: &str) -> String {
        match self.summary() {
            Some(summary) => format!("{prefix} ({summary})"),
            None => prefix.to_string(),
        }
    }
}

/// Fee rules keyed by gateway identifier.
///
/// A gateway without an entry has the zero rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeRuleSet {
    rules: BTreeMap<String, FeeRule>,
}

impl FeeRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rule set from flat addon settings rows.
    ///
    /// Rows whose key is not a fee key are ignored. Values are parsed leniently:
    /// blank or malformed values count as zero.
    pub fn from_settings<I>(settings: I) -> Self
    where
        I: IntoIterator<Item = Setting>,
    {
        let mut set = Self::new();
        for setting in settings {
            match RuleKey::parse(&setting.key) {
                Some(RuleKey::Fixed(gateway)) => {
                    let value = parse_rule_value(&setting.key, &setting.value);
                    set.entry(gateway).fixed = value;
                }
                Some(RuleKey::Percent(gateway)) => {
                    let value = parse_rule_value(&setting.key, &setting.value);
                    set.entry(gateway).percent = value;
                }
                None => {}
            }
        }
        set
    }

    pub fn insert(&mut self, gateway: impl Into<String>, rule: FeeRule) {
        self.rules.insert(gateway.into(), rule);
    }

    /// Returns the rule for `gateway`, or the zero rule when none is configured.
    pub fn rule_for(&self, gateway: &str) -> FeeRule {
        self.rules.get(gateway).copied().unwrap_or(FeeRule::ZERO)
    }

    pub fn contains(&self, gateway: &str) -> bool {
        self.rules.contains_key(gateway)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeeRule)> {
        self.rules.iter().map(|(gateway, rule)| (gateway.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn entry(&mut self, gateway: String) -> &mut FeeRule {
        self.rules.entry(gateway).or_default()
    }
}

fn parse_rule_value(key: &str, raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(trimmed) {
        Ok(value) if value.is_sign_negative() => {
            tracing::warn!(setting = %key, value = %trimmed, "Negative fee value, using zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(setting = %key, value = %trimmed, error = %e, "Unparseable fee value, using zero");
            Decimal::ZERO
        }
    }
}
