use log::{info, warn};

use crate::errors::{MealError, MealResult};
use crate::models::meal::Meal;
use crate::repository::database::Database;
use crate::repository::meal_repository;

pub const MAX_COMBATANTS: usize = 2;

/// The meals currently entered into the arena.
#[derive(Debug, Default)]
pub struct BattleModel {
    combatants: Vec<Meal>,
}

impl BattleModel {
    pub fn new() -> Self {
        Self {
            combatants: Vec::with_capacity(MAX_COMBATANTS),
        }
    }

    pub fn prep_combatant(&mut self, combatant: Meal) -> MealResult<()> {
        if self.combatants.len() >= MAX_COMBATANTS {
            warn!(
                "Attempted to add combatant '{}' but combatants list is full",
                combatant.meal
            );
            return MealError::conflict("Combatant list is full, cannot add more combatants.");
        }
        if self.combatants.iter().any(|entered| entered.id == combatant.id) {
            warn!("Meal '{}' is already a combatant", combatant.meal);
            return MealError::conflict(format!(
                "Meal '{}' is already a combatant.",
                combatant.meal
            ));
        }
        info!("Adding combatant '{}' to combatants list", combatant.meal);
        self.combatants.push(combatant);
        Ok(())
    }

    pub fn clear_combatants(&mut self) {
        if self.combatants.is_empty() {
            warn!("Attempted to clear an empty combatants list");
        }
        info!("Clearing the combatants list");
        self.combatants.clear();
    }

    pub fn get_combatants(&self) -> &[Meal] {
        &self.combatants
    }

    pub fn get_battle_score(combatant: &Meal) -> f64 {
        let score = combatant.price * combatant.difficulty.weight();
        info!("Battle score for '{}': {:.3}", combatant.meal, score);
        score
    }

    /// Settles a battle between the two prepped combatants and returns the
    /// winner's name.
    ///
    /// The first combatant wins when `random_number` falls below its share of
    /// the combined score. Both meals are re-read from the catalog before any
    /// stats change, so a combatant deleted after being prepped aborts the
    /// battle. Winner and loser stats are written in one transaction. The
    /// loser leaves the combatants list.
    pub fn battle(&mut self, db: &Database, random_number: f64) -> MealResult<String> {
        if self.combatants.len() < MAX_COMBATANTS {
            warn!("Not enough combatants to start a battle");
            return MealError::validation("Two combatants must be prepped for a battle.");
        }

        let first = meal_repository::get_meal_by_id(db, self.combatants[0].id)?;
        let second = meal_repository::get_meal_by_id(db, self.combatants[1].id)?;
        info!("Two meals enter, one meal leaves: {} vs {}", first.meal, second.meal);

        let first_score = Self::get_battle_score(&first);
        let second_score = Self::get_battle_score(&second);
        let first_share = first_score / (first_score + second_score);
        info!(
            "Share of '{}' is {:.3}, random number is {:.3}",
            first.meal, first_share, random_number
        );

        let (winner, loser, loser_index) = if random_number < first_share {
            (first, second, 1)
        } else {
            (second, first, 0)
        };
        meal_repository::record_battle(db, winner.id, loser.id)?;

        self.combatants.remove(loser_index);
        info!("The winner is: {}", winner.meal);
        Ok(winner.meal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::meal::Difficulty;
    use crate::utils::test_utils::init_test_meals;

    fn sample_meal(id: i32, name: &str, price: f64, difficulty: Difficulty) -> Meal {
        Meal {
            id,
            meal: name.to_string(),
            cuisine: "testCuisine".to_string(),
            price,
            difficulty,
            battles: 0,
            wins: 0,
            deleted: false,
        }
    }

    #[test]
    fn test_should_prep_up_to_two_combatants() {
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(sample_meal(1, "a", 0.5, Difficulty::Low)).unwrap();
        battle_model.prep_combatant(sample_meal(2, "b", 1.5, Difficulty::High)).unwrap();

        let err = battle_model
            .prep_combatant(sample_meal(3, "c", 2.0, Difficulty::Med))
            .unwrap_err();

        assert!(matches!(err, MealError::Conflict(_)));
        assert_eq!(err.to_string(), "Combatant list is full, cannot add more combatants.");
        let names: Vec<&str> = battle_model
            .get_combatants()
            .iter()
            .map(|m| m.meal.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_should_clear_combatants() {
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(sample_meal(1, "a", 0.5, Difficulty::Low)).unwrap();
        assert_eq!(battle_model.get_combatants().len(), 1);

        battle_model.clear_combatants();
        assert!(battle_model.get_combatants().is_empty());
    }

    #[test]
    fn test_should_clear_empty_combatants_without_error() {
        let mut battle_model = BattleModel::new();
        battle_model.clear_combatants();
        assert!(battle_model.get_combatants().is_empty());
    }

    #[test]
    fn test_should_weight_battle_score_by_difficulty() {
        let score =
            |difficulty| BattleModel::get_battle_score(&sample_meal(1, "a", 4.0, difficulty));
        assert_eq!(score(Difficulty::Low), 4.0);
        assert_eq!(score(Difficulty::Med), 8.0);
        assert_eq!(score(Difficulty::High), 12.0);
    }

    #[test]
    fn test_should_refuse_the_same_meal_twice() {
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(sample_meal(1, "a", 0.5, Difficulty::Low)).unwrap();

        let err = battle_model
            .prep_combatant(sample_meal(1, "a", 0.5, Difficulty::Low))
            .unwrap_err();

        assert!(matches!(err, MealError::Conflict(_)));
        assert_eq!(err.to_string(), "Meal 'a' is already a combatant.");
        assert_eq!(battle_model.get_combatants().len(), 1);
    }

    #[test]
    fn test_should_refuse_battle_with_fewer_than_two_combatants() {
        let db = Database::in_memory().unwrap();
        let test_meals = init_test_meals(&db);
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(test_meals[0].clone()).unwrap();

        let err = battle_model.battle(&db, 0.5).unwrap_err();
        assert!(matches!(err, MealError::Validation(_)));
        assert_eq!(battle_model.get_combatants().len(), 1);
    }

    #[test]
    fn test_should_let_first_combatant_win_when_random_is_below_its_share() {
        let db = Database::in_memory().unwrap();
        let test_meals = init_test_meals(&db);
        let mut battle_model = BattleModel::new();
        // Spaghetti scores 25.0, Tacos 6.0: share is about 0.806.
        battle_model.prep_combatant(test_meals[0].clone()).unwrap();
        battle_model.prep_combatant(test_meals[2].clone()).unwrap();

        let winner = battle_model.battle(&db, 0.5).unwrap();

        assert_eq!(winner, "Spaghetti");
        assert_eq!(battle_model.get_combatants(), &[test_meals[0].clone()]);
        let winner = meal_repository::get_meal_by_id(&db, test_meals[0].id).unwrap();
        let loser = meal_repository::get_meal_by_id(&db, test_meals[2].id).unwrap();
        assert_eq!((winner.battles, winner.wins), (1, 1));
        assert_eq!((loser.battles, loser.wins), (1, 0));
    }

    #[test]
    fn test_should_let_second_combatant_win_when_random_is_above_share() {
        let db = Database::in_memory().unwrap();
        let test_meals = init_test_meals(&db);
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(test_meals[0].clone()).unwrap();
        battle_model.prep_combatant(test_meals[2].clone()).unwrap();

        let winner = battle_model.battle(&db, 0.9).unwrap();

        assert_eq!(winner, "Tacos");
        assert_eq!(battle_model.get_combatants(), &[test_meals[2].clone()]);
    }

    #[test]
    fn test_should_abort_battle_when_a_combatant_was_deleted() {
        let db = Database::in_memory().unwrap();
        let test_meals = init_test_meals(&db);
        let mut battle_model = BattleModel::new();
        battle_model.prep_combatant(test_meals[0].clone()).unwrap();
        battle_model.prep_combatant(test_meals[1].clone()).unwrap();
        meal_repository::delete_meal(&db, test_meals[1].id).unwrap();

        let err = battle_model.battle(&db, 0.1).unwrap_err();

        assert!(matches!(err, MealError::NotFound(_)));
        assert_eq!(battle_model.get_combatants().len(), 2);
        let untouched = meal_repository::get_meal_by_id(&db, test_meals[0].id).unwrap();
        assert_eq!(untouched.battles, 0);
    }
}
