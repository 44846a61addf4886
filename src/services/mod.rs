// Business logic services

pub mod category_service;
pub mod llm;
pub mod meal_service;
pub mod nutrition;
pub mod settings_service;
pub mod summary_service;
pub mod template_service;
pub mod workout_service;

pub use category_service::CategoryService;
pub use llm::{LlmConfig, NutritionEstimator, OpenAiEstimator};
pub use meal_service::MealService;
pub use nutrition::{IngredientInfo, NutritionClient, NutritionConfig};
pub use settings_service::SettingsService;
pub use summary_service::SummaryService;
pub use template_service::TemplateService;
pub use workout_service::WorkoutService;
