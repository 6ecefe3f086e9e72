/*
 * Responsibility
 * - Drinks の request/response DTO
 * - recipe は単一オブジェクトでも配列でも受け付け、常に配列へ正規化する
 * - short (公開用: 分量を伏せる) / long (権限保持者向け) の 2 つの表現
 */
use serde::{Deserialize, Serialize};

use crate::repos::{Drink, Ingredient, NewDrink};

// Matches the `drinks.title` column width.
const TITLE_MAX_CHARS: usize = 80;

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title cannot be empty");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("title must be at most 80 characters");
    }
    Ok(())
}

/// A recipe as sent by clients: one ingredient or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(v) => v,
            RecipeInput::One(i) => vec![i],
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        let ingredients = match self {
            RecipeInput::Many(v) => v.as_slice(),
            RecipeInput::One(i) => std::slice::from_ref(i),
        };

        if ingredients.is_empty() {
            return Err("recipe must contain at least one ingredient");
        }
        if ingredients
            .iter()
            .any(|i| !i.parts.is_finite() || i.parts < 0.0)
        {
            return Err("recipe parts must be a non-negative number");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title(self.title.as_deref().ok_or("title is required")?)?;

        self.recipe
            .as_ref()
            .ok_or("recipe is required")?
            .validate()
    }

    /// Call after `validate()`.
    pub fn into_new_drink(self) -> NewDrink {
        NewDrink {
            title: self.title.unwrap_or_default(),
            recipe: self.recipe.map(RecipeInput::into_vec).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    // None: field missing (do not update)
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &self.recipe {
            recipe.validate()?;
        }

        Ok(())
    }

    /// Overwrite only the fields present in the request.
    pub fn apply(self, drink: &mut Drink) {
        if let Some(title) = self.title {
            drink.title = title;
        }
        if let Some(recipe) = self.recipe {
            drink.recipe = recipe.into_vec();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientShort {
    pub name: String,
    pub color: String,
}

/// Public projection: ingredient quantities are redacted.
#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl From<Drink> for DrinkShort {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .into_iter()
                .map(|i| IngredientShort {
                    name: i.name,
                    color: i.color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for DrinkLong {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn ok(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}
