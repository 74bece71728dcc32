//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod floor_plan_repo;
pub mod furniture_repo;
pub mod taste_repo;

pub use floor_plan_repo::FloorPlanRepo;
pub use furniture_repo::FurnitureRepo;
pub use taste_repo::TasteRepo;
