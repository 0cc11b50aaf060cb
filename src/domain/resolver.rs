//! Recipe resolution: total cook time and flattened base ingredients.
//!
//! A recipe's required items may themselves be recipes, to any depth. The
//! [`Resolver`] walks that tree depth first, multiplying quantities along the
//! way, and merges base ingredients that turn up on several branches into one
//! line with the summed quantity.

use std::{collections::HashMap, num::NonZeroU64};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::domain::{
    cookbook::Cookbook,
    entry::{Entry, Recipe, RequiredItem},
};

/// Errors that can occur while resolving a recipe.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No entry has the requested name.
    #[error("Cookbook has no entry with name {0}")]
    NotFound(String),

    /// The requested entry is an ingredient, and only recipes can be
    /// summarized.
    #[error("{0} is an ingredient, not a recipe")]
    NotARecipe(String),

    /// A recipe in the expansion requires an entry that does not exist.
    #[error("Recipe '{recipe}' requires '{item}', which is not in the cookbook")]
    BrokenReference {
        /// The recipe holding the reference.
        recipe: String,
        /// The missing entry name.
        item: String,
    },

    /// A recipe requires itself, directly or through other recipes.
    #[error("Recipe '{recipe}' requires itself: {}", .path.join(" -> "))]
    CyclicReference {
        /// The recipe that was reached again.
        recipe: String,
        /// The expansion path that closes the loop, starting and ending with
        /// `recipe`.
        path: Vec<String>,
    },

    /// A scaled quantity or cook time does not fit in 64 bits.
    #[error("Quantities needed for '{0}' are too large")]
    QuantityOverflow(String),
}

/// One line of a flattened ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientQuantity {
    /// Name of the base ingredient.
    pub name: String,
    /// Total units needed.
    pub quantity: u64,
}

impl IngredientQuantity {
    /// Creates a line of an ingredient list.
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// The resolved view of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Name of the recipe.
    pub name: String,
    /// Total cook time of the recipe and everything it requires.
    pub cook_time: u64,
    /// Base ingredients, merged by name, in the order first encountered.
    pub ingredients: Vec<IngredientQuantity>,
}

/// Resolves recipes against a borrowed [`Cookbook`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    cookbook: &'a Cookbook,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given cookbook.
    #[must_use]
    pub const fn new(cookbook: &'a Cookbook) -> Self {
        Self { cookbook }
    }

    /// Summarizes a recipe: its total cook time and flattened ingredients.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if there is no entry called `name`
    /// - [`ResolveError::NotARecipe`] if the entry is an ingredient
    /// - [`ResolveError::BrokenReference`] for the first missing item found,
    ///   depth first
    /// - [`ResolveError::CyclicReference`] if the recipe requires itself
    /// - [`ResolveError::QuantityOverflow`] if a total does not fit in 64 bits
    #[instrument(level = "debug", skip(self))]
    pub fn summarize(&self, name: &str) -> Result<Summary, ResolveError> {
        let Entry::Recipe(recipe) = self.entry(name)? else {
            return Err(ResolveError::NotARecipe(name.to_string()));
        };

        let cook_time = self.cook_time(name)?;
        let ingredients = self.flatten(name, NonZeroU64::MIN)?;

        debug!(cook_time, ingredients = ingredients.len(), "resolved recipe");

        Ok(Summary {
            name: recipe.name().to_string(),
            cook_time,
            ingredients,
        })
    }

    /// The total cook time of an entry.
    ///
    /// An ingredient's cook time is its own. A recipe's is the sum, over its
    /// required items, of the item's cook time times its quantity. An item
    /// reached along several branches is counted once per branch.
    ///
    /// # Errors
    ///
    /// As for [`Resolver::summarize`], except that ingredients are accepted.
    pub fn cook_time(&self, name: &str) -> Result<u64, ResolveError> {
        let entry = self.entry(name)?;
        self.cook_time_of(entry, &mut ExpansionPath::default())
    }

    /// The base ingredients an entry expands to, each scaled by `multiplier`.
    ///
    /// An ingredient expands to itself. A recipe expands each required item in
    /// turn, scaled by the item's quantity, into a shared list where a repeated
    /// ingredient has its quantity added to the existing line.
    ///
    /// # Errors
    ///
    /// As for [`Resolver::summarize`], except that ingredients are accepted.
    pub fn flatten(
        &self,
        name: &str,
        multiplier: NonZeroU64,
    ) -> Result<Vec<IngredientQuantity>, ResolveError> {
        let entry = self.entry(name)?;
        let mut ingredients = Accumulator::default();
        self.flatten_into(
            entry,
            multiplier.get(),
            &mut ingredients,
            &mut ExpansionPath::default(),
        )?;
        Ok(ingredients.into_lines())
    }
}

impl<'a> Resolver<'a> {
    fn entry(&self, name: &str) -> Result<&'a Entry, ResolveError> {
        self.cookbook
            .lookup(name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }

    fn required_entry(&self, recipe: &Recipe, item: &RequiredItem) -> Result<&'a Entry, ResolveError> {
        self.cookbook
            .lookup(item.name())
            .ok_or_else(|| ResolveError::BrokenReference {
                recipe: recipe.name().to_string(),
                item: item.name().to_string(),
            })
    }

    fn cook_time_of(
        &self,
        entry: &'a Entry,
        path: &mut ExpansionPath<'a>,
    ) -> Result<u64, ResolveError> {
        let recipe = match entry {
            Entry::Ingredient(ingredient) => return Ok(ingredient.cook_time()),
            Entry::Recipe(recipe) => recipe,
        };

        path.enter(recipe.name())?;

        let mut total: u64 = 0;
        for item in recipe.required_items() {
            let required = self.required_entry(recipe, item)?;
            let item_time = self.cook_time_of(required, path)?;
            total = item_time
                .checked_mul(item.quantity().get())
                .and_then(|scaled| total.checked_add(scaled))
                .ok_or_else(|| ResolveError::QuantityOverflow(recipe.name().to_string()))?;
        }

        path.leave();
        Ok(total)
    }

    fn flatten_into(
        &self,
        entry: &'a Entry,
        multiplier: u64,
        ingredients: &mut Accumulator<'a>,
        path: &mut ExpansionPath<'a>,
    ) -> Result<(), ResolveError> {
        let recipe = match entry {
            Entry::Ingredient(ingredient) => return ingredients.add(ingredient.name(), multiplier),
            Entry::Recipe(recipe) => recipe,
        };

        path.enter(recipe.name())?;

        for item in recipe.required_items() {
            let required = self.required_entry(recipe, item)?;
            let scaled = item
                .quantity()
                .get()
                .checked_mul(multiplier)
                .ok_or_else(|| ResolveError::QuantityOverflow(recipe.name().to_string()))?;
            self.flatten_into(required, scaled, ingredients, path)?;
        }

        path.leave();
        Ok(())
    }
}

/// The chain of recipes currently being expanded, outermost first.
#[derive(Debug, Default)]
struct ExpansionPath<'a>(Vec<&'a str>);

impl<'a> ExpansionPath<'a> {
    fn enter(&mut self, recipe: &'a str) -> Result<(), ResolveError> {
        if let Some(start) = self.0.iter().position(|&name| name == recipe) {
            let mut path: Vec<String> = self.0[start..].iter().map(ToString::to_string).collect();
            path.push(recipe.to_string());
            return Err(ResolveError::CyclicReference {
                recipe: recipe.to_string(),
                path,
            });
        }

        trace!(recipe, depth = self.0.len(), "expanding");
        self.0.push(recipe);
        Ok(())
    }

    fn leave(&mut self) {
        self.0.pop();
    }
}

/// Ingredient lines in first-seen order, with an index for merging.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    lines: Vec<IngredientQuantity>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, name: &'a str, quantity: u64) -> Result<(), ResolveError> {
        if let Some(&position) = self.positions.get(name) {
            let line = &mut self.lines[position];
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| ResolveError::QuantityOverflow(name.to_string()))?;
        } else {
            self.positions.insert(name, self.lines.len());
            self.lines.push(IngredientQuantity::new(name, quantity));
        }
        Ok(())
    }

    fn into_lines(self) -> Vec<IngredientQuantity> {
        self.lines
    }
}

impl Cookbook {
    /// A [`Resolver`] over this cookbook.
    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// Summarizes the named recipe. See [`Resolver::summarize`].
    ///
    /// # Errors
    ///
    /// See [`Resolver::summarize`].
    pub fn summarize(&self, name: &str) -> Result<Summary, ResolveError> {
        self.resolver().summarize(name)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::entry::{NewEntry, RawRequiredItem};

    fn ingredient(cookbook: &mut Cookbook, name: &str, cook_time: i64) {
        cookbook
            .create(NewEntry::ingredient(name, cook_time))
            .unwrap();
    }

    fn recipe(cookbook: &mut Cookbook, name: &str, items: &[(&str, i64)]) {
        let items: Vec<_> = items
            .iter()
            .map(|&(item, quantity)| RawRequiredItem::new(item, quantity))
            .collect();
        cookbook.create(NewEntry::recipe(name, items)).unwrap();
    }

    /// Cake = 1 Batter + 2 Frosting, Batter = 3 Eggs, Frosting = 1 Eggs.
    fn cake() -> Cookbook {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Eggs", 1);
        recipe(&mut cookbook, "Batter", &[("Eggs", 3)]);
        recipe(&mut cookbook, "Frosting", &[("Eggs", 1)]);
        recipe(&mut cookbook, "Cake", &[("Batter", 1), ("Frosting", 2)]);
        cookbook
    }

    fn spaghetti() -> Cookbook {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Beef", 5);
        ingredient(&mut cookbook, "Egg", 3);
        ingredient(&mut cookbook, "Flour", 0);
        ingredient(&mut cookbook, "Tomato", 2);
        recipe(&mut cookbook, "Meatball", &[("Beef", 2), ("Egg", 1)]);
        recipe(&mut cookbook, "Pasta", &[("Flour", 3), ("Egg", 1)]);
        recipe(
            &mut cookbook,
            "Skibidi Spaghetti",
            &[("Meatball", 3), ("Pasta", 1), ("Tomato", 2)],
        );
        cookbook
    }

    fn lines(pairs: &[(&str, u64)]) -> Vec<IngredientQuantity> {
        pairs
            .iter()
            .map(|&(name, quantity)| IngredientQuantity::new(name, quantity))
            .collect()
    }

    #[test_case("Batter", 3; "batter")]
    #[test_case("Frosting", 1; "frosting")]
    #[test_case("Cake", 5; "cake")]
    #[test_case("Eggs", 1; "ingredient")]
    fn cook_time(name: &str, expected: u64) {
        assert_eq!(cake().resolver().cook_time(name).unwrap(), expected);
    }

    #[test]
    fn merges_ingredients_across_branches() {
        let flattened = cake().resolver().flatten("Cake", NonZeroU64::MIN).unwrap();

        assert_eq!(flattened, lines(&[("Eggs", 5)]));
    }

    #[test]
    fn flat_recipe_scales_by_multiplier() {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Bread", 2);
        ingredient(&mut cookbook, "Butter", 1);
        recipe(&mut cookbook, "Toast", &[("Butter", 2), ("Bread", 1)]);

        let flattened = cookbook
            .resolver()
            .flatten("Toast", NonZeroU64::new(3).unwrap())
            .unwrap();

        assert_eq!(flattened, lines(&[("Butter", 6), ("Bread", 3)]));
    }

    #[test]
    fn ingredient_flattens_to_itself() {
        let flattened = cake()
            .resolver()
            .flatten("Eggs", NonZeroU64::new(4).unwrap())
            .unwrap();

        assert_eq!(flattened, lines(&[("Eggs", 4)]));
    }

    #[test]
    fn summarizes_nested_recipe() {
        let summary = spaghetti().summarize("Skibidi Spaghetti").unwrap();

        assert_eq!(
            summary,
            Summary {
                name: "Skibidi Spaghetti".to_string(),
                cook_time: 46,
                ingredients: lines(&[("Beef", 6), ("Egg", 4), ("Flour", 3), ("Tomato", 2)]),
            }
        );
    }

    #[test]
    fn empty_recipe_summarizes_to_nothing() {
        let mut cookbook = Cookbook::new();
        recipe(&mut cookbook, "Air", &[]);

        let summary = cookbook.summarize("Air").unwrap();

        assert_eq!(summary.cook_time, 0);
        assert!(summary.ingredients.is_empty());
    }

    #[test]
    fn summarizing_ingredient_fails() {
        assert_eq!(
            cake().summarize("Eggs"),
            Err(ResolveError::NotARecipe("Eggs".to_string()))
        );
    }

    #[test]
    fn summarizing_unknown_name_fails() {
        assert_eq!(
            cake().summarize("Pie"),
            Err(ResolveError::NotFound("Pie".to_string()))
        );
    }

    #[test]
    fn reports_first_broken_reference_depth_first() {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Flour", 1);
        recipe(&mut cookbook, "Dough", &[("Flour", 1), ("Yeast", 1)]);
        recipe(&mut cookbook, "Pizza", &[("Dough", 1), ("Cheese", 2)]);

        assert_eq!(
            cookbook.summarize("Pizza"),
            Err(ResolveError::BrokenReference {
                recipe: "Dough".to_string(),
                item: "Yeast".to_string(),
            })
        );
    }

    #[test]
    fn detects_self_reference() {
        let mut cookbook = Cookbook::new();
        recipe(&mut cookbook, "Sourdough", &[("Sourdough", 1)]);

        assert_eq!(
            cookbook.summarize("Sourdough"),
            Err(ResolveError::CyclicReference {
                recipe: "Sourdough".to_string(),
                path: vec!["Sourdough".to_string(), "Sourdough".to_string()],
            })
        );
    }

    #[test]
    fn detects_indirect_cycle() {
        let mut cookbook = Cookbook::new();
        recipe(&mut cookbook, "Meal", &[("Chicken", 1)]);
        recipe(&mut cookbook, "Chicken", &[("Egg", 1)]);
        recipe(&mut cookbook, "Egg", &[("Chicken", 1)]);

        let error = cookbook.summarize("Meal").unwrap_err();

        assert_eq!(
            error,
            ResolveError::CyclicReference {
                recipe: "Chicken".to_string(),
                path: vec![
                    "Chicken".to_string(),
                    "Egg".to_string(),
                    "Chicken".to_string()
                ],
            }
        );
        assert_eq!(
            error.to_string(),
            "Recipe 'Chicken' requires itself: Chicken -> Egg -> Chicken"
        );
    }

    #[test]
    fn flatten_detects_cycle() {
        let mut cookbook = Cookbook::new();
        recipe(&mut cookbook, "Chicken", &[("Egg", 1)]);
        recipe(&mut cookbook, "Egg", &[("Chicken", 1)]);

        assert_eq!(
            cookbook.resolver().flatten("Chicken", NonZeroU64::MIN),
            Err(ResolveError::CyclicReference {
                recipe: "Chicken".to_string(),
                path: vec![
                    "Chicken".to_string(),
                    "Egg".to_string(),
                    "Chicken".to_string()
                ],
            })
        );
    }

    #[test]
    fn flatten_reports_broken_reference() {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Bread", 2);
        recipe(&mut cookbook, "Sandwich", &[("Bread", 2), ("Toast", 1)]);
        recipe(&mut cookbook, "Toast", &[("Butter", 1)]);

        assert_eq!(
            cookbook.resolver().flatten("Sandwich", NonZeroU64::MIN),
            Err(ResolveError::BrokenReference {
                recipe: "Toast".to_string(),
                item: "Butter".to_string(),
            })
        );
    }

    #[test]
    fn shared_subrecipe_is_not_a_cycle() {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Milk", 1);
        recipe(&mut cookbook, "Cream", &[("Milk", 2)]);
        recipe(&mut cookbook, "Butter", &[("Cream", 2)]);
        recipe(&mut cookbook, "Scone", &[("Cream", 1), ("Butter", 1)]);

        let summary = cookbook.summarize("Scone").unwrap();

        assert_eq!(summary.ingredients, lines(&[("Milk", 6)]));
        assert_eq!(summary.cook_time, 6);
    }

    #[test]
    fn reports_overflow() {
        let mut cookbook = Cookbook::new();
        ingredient(&mut cookbook, "Grain", 1);
        recipe(&mut cookbook, "Sack", &[("Grain", i64::MAX)]);
        recipe(&mut cookbook, "Silo", &[("Sack", i64::MAX)]);

        assert!(matches!(
            cookbook.summarize("Silo"),
            Err(ResolveError::QuantityOverflow(_))
        ));
    }

    #[test]
    fn summary_serializes_with_camel_case() {
        let summary = cake().summarize("Cake").unwrap();

        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            serde_json::json!({
                "name": "Cake",
                "cookTime": 5,
                "ingredients": [{ "name": "Eggs", "quantity": 5 }],
            })
        );
    }
}
