//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```ignore
//! use crate::common::{AnimalId, MatingId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let animal_id: AnimalId = AnimalId::new();
//! let mating_id: MatingId = MatingId::new();
//!
//! // This would be a compile error:
//! // let wrong: MatingId = animal_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Member entities (platform users).
pub struct Member;

/// Marker type for Animal entities.
pub struct Animal;

/// Marker type for Mating entities (breeding attempts).
pub struct Mating;

/// Marker type for Diagnosis entities (pregnancy-test outcomes).
pub struct Diagnosis;

/// Marker type for Birth entities (delivery events).
pub struct Birth;

/// Marker type for EventType reference rows (birth event kinds).
pub struct EventType;

/// Marker type for StockItem entities (consumable inventory).
pub struct StockItem;

/// Marker type for Feeding entities.
pub struct Feeding;

/// Marker type for HealthEvent entities.
pub struct HealthEvent;

/// Marker type for Notification entities.
pub struct Notification;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Member entities.
pub type MemberId = Id<Member>;

/// Typed ID for Animal entities.
pub type AnimalId = Id<Animal>;

/// Typed ID for Mating entities.
pub type MatingId = Id<Mating>;

/// Typed ID for Diagnosis entities.
pub type DiagnosisId = Id<Diagnosis>;

/// Typed ID for Birth entities.
pub type BirthId = Id<Birth>;

/// Typed ID for EventType reference rows.
pub type EventTypeId = Id<EventType>;

/// Typed ID for StockItem entities.
pub type StockItemId = Id<StockItem>;

/// Typed ID for Feeding entities.
pub type FeedingId = Id<Feeding>;

/// Typed ID for HealthEvent entities.
pub type HealthEventId = Id<HealthEvent>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;
