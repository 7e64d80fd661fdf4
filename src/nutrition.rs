// src/nutrition.rs
use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::model::{InputError, Macro, NutritionData, NutritionHistory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickMeal {
    pub name: &'static str,
    pub macros: NutritionData,
}

const fn meal(name: &'static str, calories: f64, protein: f64, carbs: f64, fats: f64) -> QuickMeal {
    QuickMeal {
        name,
        macros: NutritionData {
            calories,
            protein,
            carbs,
            fats,
        },
    }
}

pub static QUICK_MEALS: [QuickMeal; 6] = [
    meal("Protein Shake", 120.0, 25.0, 3.0, 1.0),
    meal("Chicken Breast", 231.0, 43.0, 0.0, 5.0),
    meal("Rice (100g)", 130.0, 2.7, 28.0, 0.3),
    meal("Banana", 105.0, 1.3, 27.0, 0.4),
    meal("Eggs (2)", 140.0, 12.0, 1.0, 10.0),
    meal("Greek Yogurt", 130.0, 11.0, 9.0, 5.0),
];

/// Looks a quick meal up by name, ignoring case.
/// # Errors
/// Returns `InputError::UnknownMeal` if there is no such meal.
pub fn find_quick_meal(name: &str) -> Result<&'static QuickMeal, InputError> {
    QUICK_MEALS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| InputError::UnknownMeal(name.to_string()))
}

fn check_macro(macro_: Macro, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidMacroValue {
            macro_name: macro_,
            value,
        })
    }
}

/// Every macro must be a finite, non-negative number.
/// # Errors
/// Returns `InputError::InvalidMacroValue` for the first macro that is not.
pub fn check_macros(macros: &NutritionData) -> Result<(), InputError> {
    Macro::iter().try_for_each(|m| check_macro(m, macros.get(m)))
}

/// Adds a meal's macros to the totals for `date`.
/// # Errors
/// Returns `InputError::InvalidMacroValue` if any macro is negative or non-finite.
pub fn add_meal(
    log: &mut NutritionHistory,
    date: NaiveDate,
    macros: NutritionData,
) -> Result<NutritionData, InputError> {
    check_macros(&macros)?;
    let entry = log.entry(date).or_default();
    *entry = *entry + macros;
    Ok(*entry)
}

/// Overwrites one macro for `date`.
/// # Errors
/// Returns `InputError::InvalidMacroValue` for negative or non-finite values.
pub fn set_macro(
    log: &mut NutritionHistory,
    date: NaiveDate,
    macro_: Macro,
    value: f64,
) -> Result<NutritionData, InputError> {
    check_macro(macro_, value)?;
    let entry = log.entry(date).or_default();
    entry.set(macro_, value);
    Ok(*entry)
}

/// Zeroes the totals for `date`.
pub fn reset_day(log: &mut NutritionHistory, date: NaiveDate) {
    log.insert(date, NutritionData::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn meals_accumulate_per_day() {
        let mut log = NutritionHistory::new();
        let shake = find_quick_meal("protein shake").unwrap();
        add_meal(&mut log, today(), shake.macros).unwrap();
        let totals = add_meal(&mut log, today(), shake.macros).unwrap();

        assert_eq!(totals.calories, 240.0);
        assert_eq!(totals.protein, 50.0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn set_macro_overwrites_and_rejects_negatives() {
        let mut log = NutritionHistory::new();
        add_meal(&mut log, today(), QUICK_MEALS[1].macros).unwrap();

        let totals = set_macro(&mut log, today(), Macro::Calories, 1800.0).unwrap();
        assert_eq!(totals.calories, 1800.0);
        assert_eq!(totals.protein, 43.0);

        assert!(set_macro(&mut log, today(), Macro::Fats, -1.0).is_err());
        assert!(set_macro(&mut log, today(), Macro::Fats, f64::NAN).is_err());
        assert_eq!(log[&today()].fats, 5.0);
    }

    #[test]
    fn reset_day_zeroes_only_that_day() {
        let mut log = NutritionHistory::new();
        let yesterday = today().pred_opt().unwrap();
        add_meal(&mut log, yesterday, QUICK_MEALS[0].macros).unwrap();
        add_meal(&mut log, today(), QUICK_MEALS[0].macros).unwrap();

        reset_day(&mut log, today());
        assert_eq!(log[&today()], NutritionData::default());
        assert_eq!(log[&yesterday].calories, 120.0);
    }

    #[test]
    fn add_meal_rejects_negative_and_nan_macros() {
        let mut log = NutritionHistory::new();
        let bad = NutritionData {
            calories: -500.0,
            protein: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            add_meal(&mut log, today(), bad),
            Err(InputError::InvalidMacroValue {
                macro_name: Macro::Calories,
                value: -500.0
            })
        );
        let nan_protein = NutritionData {
            protein: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            add_meal(&mut log, today(), nan_protein),
            Err(InputError::InvalidMacroValue {
                macro_name: Macro::Protein,
                ..
            })
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn unknown_meal_is_an_error() {
        assert_eq!(
            find_quick_meal("Pizza"),
            Err(InputError::UnknownMeal("Pizza".into()))
        );
    }
}
