use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of one open registration dialog.
///
/// Every dialog owns exactly one wizard state; the id is the key the
/// orchestrator stores it under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(String);

impl_id!(DialogId);
