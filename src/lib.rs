// Domain layer - Core colony rules and the transition engine
pub mod domain;

// Application layer - The state store and its commands
pub mod application;

// Infrastructure layer - Persistence and configuration
pub mod persistence;
pub mod config;

// Re-exports for convenience
pub use domain::{Algorithm, Cell, Grid, LevelConfig, Resources, Status, StructureKind, Weather};
pub use application::{AdvanceRejected, GameState, GenerationReport, PlacementRejected};
pub use config::GameConfig;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, SaveSlot};
