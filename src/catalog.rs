//! Built-in equipment catalog.
//!
//! Definitions are immutable and loaded once. Lookup is by id, by category
//! (most popular first), or by free-text search.

use crate::error::{LayoutError, LayoutResult};
use crate::types::{Clearance, EquipmentDefinition, Footprint, SizeClass};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sidebar category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// A set of equipment definitions with unique ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub categories: Vec<Category>,
    pub definitions: Vec<EquipmentDefinition>,
}

static BUILTIN: Lazy<EquipmentCatalog> = Lazy::new(builtin_catalog);

/// The built-in catalog.
pub fn catalog() -> &'static EquipmentCatalog {
    &BUILTIN
}

impl EquipmentCatalog {
    /// Build a catalog, rejecting duplicate ids and invalid footprints.
    pub fn new(categories: Vec<Category>, definitions: Vec<EquipmentDefinition>) -> LayoutResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.id.as_str()) {
                return Err(LayoutError::DuplicateId(def.id.clone()));
            }
            if !def.footprint.is_valid() {
                return Err(LayoutError::InvalidDimension {
                    field: "footprint",
                    value: def.footprint.extent().width.min(def.footprint.extent().height),
                });
            }
        }
        Ok(Self { categories, definitions })
    }

    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let raw: EquipmentCatalog = serde_json::from_str(json)?;
        Self::new(raw.categories, raw.definitions)
    }

    pub fn by_id(&self, id: &str) -> Option<&EquipmentDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Definitions in `category`, most popular first.
    pub fn by_category(&self, category: &str) -> Vec<&EquipmentDefinition> {
        let mut items: Vec<_> = self
            .definitions
            .iter()
            .filter(|d| d.category == category)
            .collect();
        items.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        items
    }

    /// Case-insensitive search over name, description, and category.
    pub fn search(&self, query: &str) -> Vec<&EquipmentDefinition> {
        let term = query.trim().to_lowercase();
        let mut items: Vec<_> = self
            .definitions
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&term)
                    || d.description.to_lowercase().contains(&term)
                    || d.category.to_lowercase().contains(&term)
            })
            .collect();
        items.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        items
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Round rides are placed as circles; everything else is a rectangle.
pub fn determine_footprint(name: &str, width_ft: f64, length_ft: f64) -> Footprint {
    let lower = name.to_lowercase();
    if ["ferris", "carousel", "wheel"].iter().any(|k| lower.contains(k)) {
        Footprint::Circle {
            radius: width_ft.min(length_ft) / 2.0,
        }
    } else {
        Footprint::Rectangle {
            width: width_ft,
            length: length_ft,
        }
    }
}

/// Default safety clearance in feet for a category.
pub fn default_clearance(category: &str, footprint: &Footprint) -> Clearance {
    match (category.to_lowercase().as_str(), footprint) {
        ("rides", Footprint::Circle { radius }) => Clearance::Circle { radius: radius + 10.0 },
        ("rides", Footprint::Rectangle { .. }) => Clearance::uniform(10.0),
        ("games", _) => Clearance::Rectangle { top: 5.0, right: 3.0, bottom: 8.0, left: 3.0 },
        ("food", _) => Clearance::Rectangle { top: 3.0, right: 5.0, bottom: 15.0, left: 5.0 },
        _ => Clearance::uniform(2.0),
    }
}

fn category(name: &str, icon: &str, description: &str) -> Category {
    Category {
        name: name.into(),
        icon: icon.into(),
        description: description.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    category: &str,
    size: SizeClass,
    (width, length, height): (f64, f64, f64),
    description: &str,
    thumbnail: &str,
    color: &str,
    popularity: u8,
) -> EquipmentDefinition {
    EquipmentDefinition {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        size,
        footprint: determine_footprint(name, width, length),
        height_ft: Some(height),
        description: description.into(),
        thumbnail: thumbnail.into(),
        color: color.into(),
        popularity,
        clearance: None,
    }
}

fn builtin_catalog() -> EquipmentCatalog {
    use SizeClass::*;

    let categories = vec![
        category("Rides", "🎠", "Carnival rides and attractions"),
        category("Games", "🎯", "Midway games and skill challenges"),
        category("Food", "🍿", "Food stands and concessions"),
        category("Utilities", "⚡", "Power, water, and utility equipment"),
        category("Structures", "🏗️", "Tents, stages, and temporary structures"),
        category("Services", "🚻", "Restrooms, first aid, and services"),
    ];

    let definitions = vec![
        entry("ride-001", "Ferris Wheel", "Rides", ExtraLarge, (80.0, 80.0, 100.0),
            "Classic 100ft Ferris wheel with 24 gondolas, LED lighting package", "🎡", "#FF6B6B", 10),
        entry("ride-002", "Carousel", "Rides", Large, (50.0, 50.0, 20.0),
            "Traditional carousel with 36 hand-carved horses, organ music", "🎠", "#FFD93D", 9),
        entry("ride-003", "Bumper Cars", "Rides", Large, (60.0, 40.0, 12.0),
            "Electric bumper car arena with 20 cars, padded barriers", "🚗", "#4ECDC4", 8),
        entry("ride-004", "Tilt-a-Whirl", "Rides", Medium, (40.0, 40.0, 15.0),
            "Spinning ride with 7 cars, each seating 3 passengers", "🌪️", "#45B7D1", 7),
        entry("ride-005", "Zipper", "Rides", Large, (25.0, 80.0, 60.0),
            "High-thrill ride with rotating cars on an oval track", "⚡", "#E74C3C", 6),
        entry("game-001", "Ring Toss", "Games", Small, (8.0, 12.0, 8.0),
            "Classic ring toss game with milk bottles and prizes", "🎯", "#F39C12", 8),
        entry("game-002", "Duck Pond", "Games", Small, (6.0, 8.0, 4.0),
            "Pick-a-duck game with floating ducks and prizes", "🦆", "#3498DB", 9),
        entry("game-003", "Basketball Shootout", "Games", Medium, (12.0, 20.0, 12.0),
            "Multi-hoop basketball game with automatic ball return", "🏀", "#E67E22", 7),
        entry("game-004", "Strongman Test", "Games", Medium, (8.0, 8.0, 20.0),
            "High striker game with bell and hammer", "💪", "#8E44AD", 6),
        entry("food-001", "Food Truck", "Food", Large, (8.0, 24.0, 10.0),
            "Mobile kitchen with full cooking equipment and serving window", "🚚", "#27AE60", 9),
        entry("food-002", "Cotton Candy Stand", "Food", Small, (6.0, 8.0, 8.0),
            "Cotton candy machine with display case and supplies", "🍭", "#FF69B4", 10),
        entry("food-003", "Popcorn Stand", "Food", Small, (6.0, 6.0, 8.0),
            "Popcorn machine with warmer and serving counter", "🍿", "#F1C40F", 8),
        entry("food-004", "Funnel Cake Trailer", "Food", Medium, (8.0, 16.0, 9.0),
            "Funnel cake fryer with prep area and serving window", "🧇", "#D35400", 7),
        entry("util-001", "Generator 100kW", "Utilities", Large, (8.0, 20.0, 8.0),
            "100kW diesel generator with automatic transfer switch", "⚡", "#7F8C8D", 5),
        entry("util-002", "Water Tank", "Utilities", Medium, (8.0, 8.0, 12.0),
            "5000 gallon water storage tank with pump system", "💧", "#3498DB", 4),
        entry("util-003", "Electrical Panel", "Utilities", Small, (4.0, 6.0, 8.0),
            "Main electrical distribution panel with breakers", "🔌", "#34495E", 3),
        entry("struct-001", "Main Stage", "Structures", ExtraLarge, (40.0, 60.0, 25.0),
            "Large outdoor stage with sound system and lighting", "🎭", "#9B59B6", 6),
        entry("struct-002", "Merchandise Tent", "Structures", Medium, (20.0, 30.0, 12.0),
            "20x30 tent with tables and display racks", "⛺", "#16A085", 5),
        entry("service-001", "Restroom Trailer", "Services", Large, (8.0, 32.0, 9.0),
            "8-stall restroom trailer with hand washing stations", "🚻", "#2ECC71", 8),
        entry("service-002", "First Aid Station", "Services", Small, (8.0, 12.0, 8.0),
            "Medical station with supplies and EMT equipment", "🏥", "#E74C3C", 7),
        entry("service-003", "Security Office", "Services", Small, (8.0, 10.0, 8.0),
            "Security command center with communications equipment", "👮", "#34495E", 4),
    ];

    EquipmentCatalog { categories, definitions }
}
