pub mod drink_repo;
pub mod error;
pub mod memory_drink_repo;
pub mod pg_drink_repo;

pub use drink_repo::{Drink, DrinkRepo, Ingredient, NewDrink, reset_with_sample};
pub use error::RepoError;
pub use memory_drink_repo::MemoryDrinkRepo;
pub use pg_drink_repo::PgDrinkRepo;
