pub mod item;
pub mod item_type;
pub mod modifier;
pub mod poe_item;

pub use item::{
    DpsEstimate,
    ItemDetails,
    ItemPrice,
    ItemVerdict,
    PotentialDps,
    Recommendation,
    RowTag,
};

pub use item_type::{
    ItemRarity,
    WeaponClass,
};

pub use modifier::{
    ModScope,
    ModStatus,
    ModifierAnalysis,
    Potential,
    Severity,
    SkipReason,
    SkippedStat,
};

pub use poe_item::{
    ExtendedData,
    HashData,
    HashEntry,
    ItemData,
    ItemResponse,
    ListingData,
    Magnitude,
    ModData,
    ModInfo,
    Property,
};
