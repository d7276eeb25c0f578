//! FERS annuity and Social Security benefit rules

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::{FersRules, Participant};

const MONTHS_AT_62: i32 = 62 * 12;
const MONTHS_AT_60: i32 = 60 * 12;
const MONTHS_AT_70: i32 = 70 * 12;

/// Social Security full retirement age in months for a birth year.
///
/// 66 through 1954, rising two months per year to 67 for 1960 and later.
#[must_use]
pub fn full_retirement_age_months(birth_year: i16) -> i32 {
    match birth_year {
        ..=1954 => 66 * 12,
        1955..=1959 => 66 * 12 + 2 * (i32::from(birth_year) - 1954),
        _ => 67 * 12,
    }
}

/// Monthly benefit when claiming at `claim_age`, in today's dollars.
///
/// Interpolates linearly between the statement's age-62, FRA and age-70
/// amounts.
#[must_use]
pub fn social_security_at_claim(participant: &Participant, claim_age: u8) -> f64 {
    let claim = i32::from(claim_age) * 12;
    let fra = full_retirement_age_months(participant.birth_year());
    let (b62, bfra, b70) = (
        participant.ss_benefit_62,
        participant.ss_benefit_fra,
        participant.ss_benefit_70,
    );

    if claim <= MONTHS_AT_62 {
        b62
    } else if claim >= MONTHS_AT_70 {
        b70
    } else if claim < fra {
        b62 + (bfra - b62) * f64::from(claim - MONTHS_AT_62) / f64::from(fra - MONTHS_AT_62)
    } else {
        bfra + (b70 - bfra) * f64::from(claim - fra) / f64::from(MONTHS_AT_70 - fra)
    }
}

/// FERS "diet COLA": full CPI up to 2%, capped at 2% between 2% and 3%,
/// CPI minus one point above 3%.
#[must_use]
pub fn fers_cola(cpi: f64) -> f64 {
    if cpi <= 0.02 {
        cpi.max(0.0)
    } else if cpi <= 0.03 {
        0.02
    } else {
        cpi - 0.01
    }
}

/// How a FERS annuity becomes payable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityKind {
    /// 62+/5, 60+/20 or MRA+30
    Immediate,
    /// MRA+10, reduced for each year under 62
    ReducedMraPlus10,
    /// Separated before eligibility; payable from age 62
    Deferred,
}

/// A computed FERS annuity for one participant's retirement date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FersAnnuity {
    pub kind: AnnuityKind,
    pub years_of_service: f64,
    pub multiplier: f64,
    /// High-3 x service x multiplier, before reductions
    pub unreduced_annual: f64,
    pub early_reduction: f64,
    pub survivor_reduction: f64,
    /// Payable annual amount after reductions, in retirement-year dollars
    pub annual: f64,
    /// First calendar year with annuity payments
    pub start_year: i16,
    /// Special retirement supplement, paid until the year the retiree turns 62
    pub supplement_annual: f64,
    pub supplement_end_year: i16,
}

impl FersAnnuity {
    /// Annual survivor annuity for the given election, before COLA
    #[must_use]
    pub fn survivor_annual(&self, election: f64) -> f64 {
        self.unreduced_annual * election
    }
}

/// Compute the FERS annuity for a participant retiring on `retirement_date`.
///
/// Returns `None` for non-federal participants and for separations with less
/// than five years of service.
#[must_use]
pub fn fers_annuity(
    participant: &Participant,
    retirement_date: Date,
    rules: &FersRules,
) -> Option<FersAnnuity> {
    if !participant.is_federal_employee {
        return None;
    }
    let service = participant.years_of_service_at(retirement_date);
    if service < 5.0 {
        return None;
    }
    let age_months = participant.age_in_months_on(retirement_date);
    let mra_months = i32::from(rules.minimum_retirement_age) * 12;

    let immediate = age_months >= MONTHS_AT_62
        || (age_months >= MONTHS_AT_60 && service >= 20.0)
        || (age_months >= mra_months && service >= 30.0);
    let kind = if immediate {
        AnnuityKind::Immediate
    } else if age_months >= mra_months && service >= 10.0 {
        AnnuityKind::ReducedMraPlus10
    } else {
        AnnuityKind::Deferred
    };

    let multiplier = if age_months >= MONTHS_AT_62 && service >= 20.0 {
        rules.enhanced_multiplier
    } else {
        rules.multiplier
    };
    let unreduced_annual = participant.high_3_salary * service * multiplier;

    let early_reduction = match kind {
        AnnuityKind::ReducedMraPlus10 => (rules.early_reduction_per_year
            * f64::from(MONTHS_AT_62 - age_months)
            / 12.0)
            .clamp(0.0, 1.0),
        _ => 0.0,
    };
    let survivor_reduction = 0.2 * participant.survivor_benefit_election;
    let annual = unreduced_annual * (1.0 - early_reduction) * (1.0 - survivor_reduction);

    let turns_62 = participant.birth_year() + 62;
    let start_year = match kind {
        AnnuityKind::Deferred => turns_62,
        _ => retirement_date.year(),
    };

    let supplement_annual = if kind == AnnuityKind::Immediate && age_months < MONTHS_AT_62 {
        participant.ss_benefit_62 * 12.0 * service.floor() / 40.0
    } else {
        0.0
    };

    Some(FersAnnuity {
        kind,
        years_of_service: service,
        multiplier,
        unreduced_annual,
        early_reduction,
        survivor_reduction,
        annual,
        start_year,
        supplement_annual,
        supplement_end_year: turns_62,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticipantBuilder;
    use jiff::civil::date;

    #[test]
    fn test_full_retirement_age() {
        assert_eq!(full_retirement_age_months(1950), 66 * 12);
        assert_eq!(full_retirement_age_months(1957), 66 * 12 + 6);
        assert_eq!(full_retirement_age_months(1960), 67 * 12);
        assert_eq!(full_retirement_age_months(1975), 67 * 12);
    }

    #[test]
    fn test_social_security_interpolation() {
        let p = ParticipantBuilder::new("Alex", date(1965, 1, 1))
            .social_security(2_000.0, 2_800.0, 3_500.0)
            .build();
        assert_eq!(social_security_at_claim(&p, 62), 2_000.0);
        assert_eq!(social_security_at_claim(&p, 67), 2_800.0);
        assert_eq!(social_security_at_claim(&p, 70), 3_500.0);
        // 36 of 60 months from 62 toward FRA 67
        let b65 = social_security_at_claim(&p, 65);
        assert!((b65 - 2_480.0).abs() < 1e-9, "got {b65}");
        // 12 of 36 months from FRA toward 70
        let b68 = social_security_at_claim(&p, 68);
        assert!((b68 - (2_800.0 + 700.0 / 3.0)).abs() < 1e-9, "got {b68}");
    }

    #[test]
    fn test_diet_cola() {
        assert_eq!(fers_cola(0.015), 0.015);
        assert_eq!(fers_cola(0.025), 0.02);
        assert!((fers_cola(0.05) - 0.04).abs() < 1e-12);
        assert_eq!(fers_cola(-0.01), 0.0);
    }

    #[test]
    fn test_immediate_annuity_with_supplement() {
        // MRA+30 at 57 with 32 years
        let p = ParticipantBuilder::federal_employee("Alex", date(1968, 1, 15), date(1993, 1, 15))
            .high_3(100_000.0)
            .social_security(1_800.0, 2_500.0, 3_100.0)
            .build();
        let annuity = fers_annuity(&p, date(2025, 1, 15), &FersRules::default()).unwrap();
        assert_eq!(annuity.kind, AnnuityKind::Immediate);
        assert!((annuity.years_of_service - 32.0).abs() < 1e-9);
        assert!((annuity.annual - 32_000.0).abs() < 1e-6);
        assert!((annuity.supplement_annual - 1_800.0 * 12.0 * 32.0 / 40.0).abs() < 1e-6);
        assert_eq!(annuity.supplement_end_year, 2030);
    }

    #[test]
    fn test_enhanced_multiplier_at_62_with_20_years() {
        let p = ParticipantBuilder::federal_employee("Alex", date(1962, 6, 1), date(2000, 6, 1))
            .high_3(90_000.0)
            .build();
        let annuity = fers_annuity(&p, date(2024, 6, 1), &FersRules::default()).unwrap();
        assert_eq!(annuity.multiplier, 0.011);
        assert!((annuity.annual - 90_000.0 * 24.0 * 0.011).abs() < 1e-6);
        assert_eq!(annuity.supplement_annual, 0.0);
    }

    #[test]
    fn test_mra_plus_10_reduction_and_survivor_election() {
        // Age 58 with 15 years: 4 years under 62 -> 20% reduction
        let p = ParticipantBuilder::federal_employee("Alex", date(1970, 1, 1), date(2013, 1, 1))
            .high_3(80_000.0)
            .survivor_election(0.5)
            .build();
        let annuity = fers_annuity(&p, date(2028, 1, 1), &FersRules::default()).unwrap();
        assert_eq!(annuity.kind, AnnuityKind::ReducedMraPlus10);
        assert!((annuity.early_reduction - 0.20).abs() < 1e-12);
        assert!((annuity.survivor_reduction - 0.10).abs() < 1e-12);
        let expected = 80_000.0 * 15.0 * 0.01 * 0.8 * 0.9;
        assert!((annuity.annual - expected).abs() < 1e-6);
        assert!((annuity.survivor_annual(0.5) - 6_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_deferred_and_ineligible() {
        let p = ParticipantBuilder::federal_employee("Alex", date(1980, 1, 1), date(2010, 1, 1))
            .high_3(70_000.0)
            .build();
        let annuity = fers_annuity(&p, date(2025, 1, 1), &FersRules::default()).unwrap();
        assert_eq!(annuity.kind, AnnuityKind::Deferred);
        assert_eq!(annuity.start_year, 2042);

        let short = ParticipantBuilder::federal_employee("Sam", date(1980, 1, 1), date(2022, 1, 1))
            .build();
        assert!(fers_annuity(&short, date(2025, 1, 1), &FersRules::default()).is_none());
        let civilian = ParticipantBuilder::new("Pat", date(1980, 1, 1)).build();
        assert!(fers_annuity(&civilian, date(2025, 1, 1), &FersRules::default()).is_none());
    }
}
