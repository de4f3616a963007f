//! Gems, cores, and solver results.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two disjoint gem categories.
///
/// Gems and cores only interact within the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GemCategory {
    Order,
    Chaos,
}

impl GemCategory {
    /// Both categories, in the order partitions are solved.
    pub const ALL: [GemCategory; 2] = [GemCategory::Order, GemCategory::Chaos];
}

/// The six core kinds. Each kind belongs to exactly one [`GemCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoreKind {
    #[cfg_attr(feature = "serde", serde(rename = "Order of the Sun"))]
    OrderOfTheSun,
    #[cfg_attr(feature = "serde", serde(rename = "Order of the Moon"))]
    OrderOfTheMoon,
    #[cfg_attr(feature = "serde", serde(rename = "Order of the Star"))]
    OrderOfTheStar,
    #[cfg_attr(feature = "serde", serde(rename = "Chaos of the Sun"))]
    ChaosOfTheSun,
    #[cfg_attr(feature = "serde", serde(rename = "Chaos of the Moon"))]
    ChaosOfTheMoon,
    #[cfg_attr(feature = "serde", serde(rename = "Chaos of the Star"))]
    ChaosOfTheStar,
}

impl CoreKind {
    /// The category of gems this kind of core accepts.
    pub fn category(self) -> GemCategory {
        match self {
            CoreKind::OrderOfTheSun | CoreKind::OrderOfTheMoon | CoreKind::OrderOfTheStar => {
                GemCategory::Order
            }
            CoreKind::ChaosOfTheSun | CoreKind::ChaosOfTheMoon | CoreKind::ChaosOfTheStar => {
                GemCategory::Chaos
            }
        }
    }

    /// Display name as shown in game.
    pub fn name(self) -> &'static str {
        match self {
            CoreKind::OrderOfTheSun => "Order of the Sun",
            CoreKind::OrderOfTheMoon => "Order of the Moon",
            CoreKind::OrderOfTheStar => "Order of the Star",
            CoreKind::ChaosOfTheSun => "Chaos of the Sun",
            CoreKind::ChaosOfTheMoon => "Chaos of the Moon",
            CoreKind::ChaosOfTheStar => "Chaos of the Star",
        }
    }
}

impl std::fmt::Display for CoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Core rarity tier. Variants are declared in ascending order, so the
/// derived `Ord` sorts cheaper tiers first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rarity {
    Epic,
    Legendary,
    Relic,
    Ancient,
}

impl Rarity {
    /// All tiers in ascending order.
    pub const ALL: [Rarity; 4] = [Rarity::Epic, Rarity::Legendary, Rarity::Relic, Rarity::Ancient];
}

/// A gem that can be slotted into at most one core.
///
/// `willpower` is the weight counted against a core's capacity, `points`
/// the value counted towards its breakpoints. Missing values count as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Gem {
    /// Unique identifier within one solve call.
    pub id: String,
    /// Display name; carried through to results untouched.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub category: GemCategory,
    pub willpower: Option<u32>,
    pub points: Option<u32>,
    /// Replication count as entered by the user. The solver expects
    /// gems to be expanded into singletons beforehand.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub quantity: Option<u32>,
}

impl Gem {
    /// Creates a singleton gem.
    pub fn new(id: impl Into<String>, category: GemCategory, willpower: u32, points: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category,
            willpower: Some(willpower),
            points: Some(points),
            quantity: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Willpower cost, treating a missing value as zero.
    #[inline]
    pub fn willpower(&self) -> u32 {
        self.willpower.unwrap_or(0)
    }

    /// Point value, treating a missing value as zero.
    #[inline]
    pub fn points(&self) -> u32 {
        self.points.unwrap_or(0)
    }
}

/// An assignment target. Capacity and breakpoints derive from `rarity`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Core {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: CoreKind,
    pub rarity: Rarity,
}

impl Core {
    pub fn new(id: impl Into<String>, kind: CoreKind, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            kind,
            rarity,
        }
    }

    #[inline]
    pub fn category(&self) -> GemCategory {
        self.kind.category()
    }

    /// Maximum total willpower this core accepts.
    #[inline]
    pub fn capacity(&self) -> u32 {
        super::scoring::capacity(self.rarity)
    }
}

/// The outcome for one core: its gems and the values derived from them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CoreResult {
    pub core_id: String,
    #[cfg_attr(feature = "serde", serde(rename = "astrogems"))]
    pub gems: Vec<Gem>,
    pub total_points: u32,
    pub total_willpower: u32,
    pub breakpoints_hit: Vec<u32>,
    pub score: f64,
}

impl CoreResult {
    /// Builds the result for `core` holding `gems`, deriving every total
    /// from the scoring model.
    pub fn new(core: &Core, gems: Vec<Gem>) -> Self {
        let total_points = super::scoring::total_points(&gems);
        let total_willpower = super::scoring::total_willpower(&gems);
        Self {
            core_id: core.id.clone(),
            breakpoints_hit: super::scoring::breakpoints_hit(total_points, core.rarity),
            score: super::scoring::score(total_points, core.rarity),
            gems,
            total_points,
            total_willpower,
        }
    }

    /// An empty result for a core that received no gems.
    pub fn empty(core: &Core) -> Self {
        Self::new(core, Vec::new())
    }
}
