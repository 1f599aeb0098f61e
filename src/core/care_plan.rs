//! Vaccination and nutrition calculators.
//!
//! Both calculators are pure. Incomplete input yields `None`, which callers
//! render as "not enough information yet" rather than as an error.

use crate::domain::model::{
    CarePlan, NutritionInput, NutritionPlan, VaccinationInput, VaccinationSchedule,
};

pub const VACCINATION_INTERVAL_DAYS: u32 = 180;
pub const MIN_FODDER_KG_PER_DAY: f64 = 3.0;
pub const FODDER_BODY_WEIGHT_RATIO: f64 = 0.02;
pub const CONCENTRATE_KG_PER_LITRE: f64 = 0.4;
pub const BASE_CONCENTRATE_KG_PER_DAY: f64 = 1.0;
pub const SUPPLEMENTS: &str = "Mineral mix 50g, salt 30g";

/// Days until the next dose.
///
/// The interval is anchored to the animal's age in months, not to
/// `last_vaccination_date`; the date only has to be present.
pub fn compute_vaccination_schedule(input: &VaccinationInput) -> Option<VaccinationSchedule> {
    if input.breed.is_empty() {
        return None;
    }
    let age_months = input.age_months?;
    input.last_vaccination_date?;

    let next_due_in_days = VACCINATION_INTERVAL_DAYS - (age_months % VACCINATION_INTERVAL_DAYS);

    Some(VaccinationSchedule {
        next_due_in_days,
        notes: format!(
            "Based on {} at {} months. Consult local guidelines.",
            input.breed, age_months
        ),
    })
}

pub fn compute_nutrition_plan(input: &NutritionInput) -> Option<NutritionPlan> {
    if input.breed.is_empty() {
        return None;
    }
    let age_months = input.age_months.filter(|a| a.is_finite() && *a >= 0.0)?;
    // zero weight counts as not entered
    let weight_kg = input.weight_kg.filter(|w| w.is_finite() && *w > 0.0)?;
    let milk_yield = input
        .milk_yield_l_per_day
        .filter(|m| m.is_finite() && *m > 0.0);

    let fodder_kg_per_day = (weight_kg * FODDER_BODY_WEIGHT_RATIO).max(MIN_FODDER_KG_PER_DAY);
    let concentrate_kg_per_day = match milk_yield {
        Some(litres) => litres * CONCENTRATE_KG_PER_LITRE,
        None => BASE_CONCENTRATE_KG_PER_DAY,
    };

    let milk_note = milk_yield
        .map(|litres| format!(", {} L/day", litres))
        .unwrap_or_default();

    Some(NutritionPlan {
        fodder_kg_per_day,
        concentrate_kg_per_day,
        supplements: SUPPLEMENTS.to_string(),
        notes: format!(
            "Auto plan for {}, {} mo, ~{} kg{}.",
            input.breed, age_months, weight_kg, milk_note
        ),
    })
}

impl CarePlan {
    pub fn compute(vaccination: &VaccinationInput, nutrition: &NutritionInput) -> Self {
        Self {
            vaccination: compute_vaccination_schedule(vaccination),
            nutrition: compute_nutrition_plan(nutrition),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vaccination.is_none() && self.nutrition.is_none()
    }
}
