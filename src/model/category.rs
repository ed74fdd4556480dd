use serde::{Deserialize, Serialize};

/// The purpose of an expense. This is a closed set; the text form (e.g. `Food`) is what is stored
/// in the `category` column of the `expenses` table.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Category {
    #[default]
    Food,
    Transport,
    Rent,
    Electricity,
    Water,
    Others,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// All categories in the order they are offered to the user.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Rent,
        Category::Electricity,
        Category::Water,
        Category::Others,
    ];
}
