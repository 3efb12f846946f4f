//! Business logic services
//!
//! Services validate requests, call the shared nutrition engine and
//! coordinate repositories.

pub mod foods;
pub mod goals;
pub mod nutrition;

pub use foods::FoodService;
pub use goals::GoalService;
pub use nutrition::NutritionService;
