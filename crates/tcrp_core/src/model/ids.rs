//! Identifiers for ensemble entities
//!
//! Storm ids are only unique within one ensemble member and year (track
//! files may restart the numbering every season); use [`StormKey`] when
//! storms are pooled together.

use serde::{Deserialize, Serialize};

/// Position of a member within the ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberIndex(pub usize);

/// Identifier of a storm within its ensemble member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StormId(pub u32);

/// Ensemble-wide storm identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StormKey {
    pub member: MemberIndex,
    pub year: i16,
    pub storm: StormId,
}
