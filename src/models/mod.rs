// Data models and request/response types

pub mod category;
pub mod meal;
pub mod settings;
pub mod summary;
pub mod workout;

pub use category::*;
pub use meal::*;
pub use settings::*;
pub use summary::*;
pub use workout::*;
