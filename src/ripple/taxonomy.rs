//! Static taxonomy tables: reaction types and interest categories.
//!
//! Both catalogs are hard-coded and immutable at runtime. Derived id maps are
//! built once on first access; lookups after that are O(1).

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// An entry in the fixed reaction-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionType {
    pub id: i64,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub is_positive: bool,
}

/// An interest-tag category a profile can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// The fixed set of reaction types. Never created or destroyed at runtime.
pub const REACTION_TYPES: [ReactionType; 19] = [
    ReactionType { id: 1, name: "like", icon: "thumbs-up", color: "#4A90D9", is_positive: true },
    ReactionType { id: 2, name: "love", icon: "heart", color: "#E0245E", is_positive: true },
    ReactionType { id: 3, name: "laugh", icon: "face-laugh", color: "#F5A623", is_positive: true },
    ReactionType { id: 4, name: "wow", icon: "face-surprise", color: "#F8C51C", is_positive: true },
    ReactionType { id: 5, name: "clap", icon: "hands-clapping", color: "#7ED321", is_positive: true },
    ReactionType { id: 6, name: "fire", icon: "fire", color: "#FF6B35", is_positive: true },
    ReactionType { id: 7, name: "hug", icon: "hands-holding", color: "#BD10E0", is_positive: true },
    ReactionType { id: 8, name: "star", icon: "star", color: "#FFD700", is_positive: true },
    ReactionType { id: 9, name: "cool", icon: "face-sunglasses", color: "#50E3C2", is_positive: true },
    ReactionType { id: 10, name: "party", icon: "party-horn", color: "#FF8CC6", is_positive: true },
    ReactionType { id: 11, name: "sparkle", icon: "sparkles", color: "#9B59B6", is_positive: true },
    ReactionType { id: 12, name: "muscle", icon: "arm-flex", color: "#D0885F", is_positive: true },
    ReactionType { id: 13, name: "salute", icon: "face-salute", color: "#417505", is_positive: true },
    ReactionType { id: 14, name: "sad", icon: "face-frown", color: "#5B7C99", is_positive: false },
    ReactionType { id: 15, name: "angry", icon: "face-angry", color: "#D0021B", is_positive: false },
    ReactionType { id: 16, name: "eye-roll", icon: "face-rolling-eyes", color: "#8B8B8B", is_positive: false },
    ReactionType { id: 17, name: "yawn", icon: "face-yawn", color: "#A0A4A8", is_positive: false },
    ReactionType { id: 18, name: "thumbs-down", icon: "thumbs-down", color: "#6D6D6D", is_positive: false },
    ReactionType { id: 19, name: "skull", icon: "skull", color: "#3C3C3C", is_positive: false },
];

/// Default interest-category catalog, used to seed the persisted catalog and
/// as the fallback when the persisted copy is stale.
pub fn default_categories() -> Vec<Category> {
    [
        (1, "music"),
        (2, "gaming"),
        (3, "sports"),
        (4, "food"),
        (5, "travel"),
        (6, "movies"),
        (7, "books"),
        (8, "art"),
        (9, "tech"),
        (10, "fashion"),
        (11, "fitness"),
        (12, "pets"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id,
        name: name.to_string(),
    })
    .collect()
}

fn reaction_type_map() -> &'static HashMap<i64, &'static ReactionType> {
    static MAP: OnceLock<HashMap<i64, &'static ReactionType>> = OnceLock::new();
    MAP.get_or_init(|| REACTION_TYPES.iter().map(|rt| (rt.id, rt)).collect())
}

/// O(1) lookup of a reaction type by id.
pub fn reaction_type_by_id(id: i64) -> Option<&'static ReactionType> {
    reaction_type_map().get(&id).copied()
}

/// True if `id` belongs to the static reaction-type catalog.
pub fn is_valid_reaction_type(id: i64) -> bool {
    reaction_type_map().contains_key(&id)
}
