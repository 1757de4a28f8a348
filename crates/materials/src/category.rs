use serde::{Deserialize, Serialize};

/// Fixed material category enumeration.
///
/// Categories are grouped into fabric, towel, manufacturing and other
/// families; the grouping drives the category-group filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CottonFabric,
    SilkFabric,
    LinenFabric,
    PolyesterFabric,
    WoolFabric,
    BathTowel,
    HandTowel,
    FaceTowel,
    KitchenTowel,
    BeachTowel,
    Dye,
    Thread,
    Yarn,
    Chemical,
    MachineSpare,
    Packaging,
    Accessory,
    Other,
}

impl Category {
    /// Human-facing label (also the lexicographic sort key for category sorts).
    pub fn label(&self) -> &'static str {
        match self {
            Category::CottonFabric => "Cotton Fabric",
            Category::SilkFabric => "Silk Fabric",
            Category::LinenFabric => "Linen Fabric",
            Category::PolyesterFabric => "Polyester Fabric",
            Category::WoolFabric => "Wool Fabric",
            Category::BathTowel => "Bath Towel",
            Category::HandTowel => "Hand Towel",
            Category::FaceTowel => "Face Towel",
            Category::KitchenTowel => "Kitchen Towel",
            Category::BeachTowel => "Beach Towel",
            Category::Dye => "Dye",
            Category::Thread => "Thread",
            Category::Yarn => "Yarn",
            Category::Chemical => "Chemical",
            Category::MachineSpare => "Machine Spare",
            Category::Packaging => "Packaging",
            Category::Accessory => "Accessory",
            Category::Other => "Other",
        }
    }

    /// Fixed category -> group mapping.
    pub fn group(&self) -> CategoryGroup {
        match self {
            Category::CottonFabric
            | Category::SilkFabric
            | Category::LinenFabric
            | Category::PolyesterFabric
            | Category::WoolFabric => CategoryGroup::Fabric,
            Category::BathTowel
            | Category::HandTowel
            | Category::FaceTowel
            | Category::KitchenTowel
            | Category::BeachTowel => CategoryGroup::Towel,
            Category::Dye
            | Category::Thread
            | Category::Yarn
            | Category::Chemical
            | Category::MachineSpare => CategoryGroup::Manufacturing,
            Category::Packaging | Category::Accessory | Category::Other => CategoryGroup::Other,
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category family used by the group filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Fabric,
    Towel,
    Manufacturing,
    Other,
}

impl core::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            CategoryGroup::Fabric => "fabric",
            CategoryGroup::Towel => "towel",
            CategoryGroup::Manufacturing => "manufacturing",
            CategoryGroup::Other => "other",
        };
        f.write_str(s)
    }
}

/// Unit of measure for stock quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Meters,
    Rolls,
    Boxes,
    Liters,
    Pieces,
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Unit::Kg => "kg",
            Unit::Meters => "meters",
            Unit::Rolls => "rolls",
            Unit::Boxes => "boxes",
            Unit::Liters => "liters",
            Unit::Pieces => "pieces",
        };
        f.write_str(s)
    }
}
