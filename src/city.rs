//! City codes the model was trained with.

use crate::error::Error;

pub const DEFAULT: &str = "Shoreline";

/// Names ordered by their codes.
const NAMES: [&str; 44] = [
    "Shoreline",
    "Kent",
    "Bellevue",
    "Redmond",
    "Seattle",
    "Maple Valley",
    "North Bend",
    "Lake Forest Park",
    "Sammamish",
    "Auburn",
    "Des Moines",
    "Bothell",
    "Federal Way",
    "Kirkland",
    "Issaquah",
    "Woodinville",
    "Normandy Park",
    "Fall City",
    "Renton",
    "Carnation",
    "Snoqualmie",
    "Duvall",
    "Burien",
    "Covington",
    "Inglewood-Finn Hill",
    "Kenmore",
    "Newcastle",
    "Black Diamond",
    "Ravensdale",
    "Clyde Hill",
    "Algona",
    "Mercer Island",
    "Skykomish",
    "Tukwila",
    "Vashon",
    "SeaTac",
    "Enumclaw",
    "Snoqualmie Pass",
    "Pacific",
    "Beaux Arts Village",
    "Preston",
    "Milton",
    "Yarrow Point",
    "Medina",
];

static CODES: phf::Map<&'static str, u8> = phf::phf_map! {
    "Shoreline" => 1,
    "Kent" => 2,
    "Bellevue" => 3,
    "Redmond" => 4,
    "Seattle" => 5,
    "Maple Valley" => 6,
    "North Bend" => 7,
    "Lake Forest Park" => 8,
    "Sammamish" => 9,
    "Auburn" => 10,
    "Des Moines" => 11,
    "Bothell" => 12,
    "Federal Way" => 13,
    "Kirkland" => 14,
    "Issaquah" => 15,
    "Woodinville" => 16,
    "Normandy Park" => 17,
    "Fall City" => 18,
    "Renton" => 19,
    "Carnation" => 20,
    "Snoqualmie" => 21,
    "Duvall" => 22,
    "Burien" => 23,
    "Covington" => 24,
    "Inglewood-Finn Hill" => 25,
    "Kenmore" => 26,
    "Newcastle" => 27,
    "Black Diamond" => 28,
    "Ravensdale" => 29,
    "Clyde Hill" => 30,
    "Algona" => 31,
    "Mercer Island" => 32,
    "Skykomish" => 33,
    "Tukwila" => 34,
    "Vashon" => 35,
    "SeaTac" => 36,
    "Enumclaw" => 37,
    "Snoqualmie Pass" => 38,
    "Pacific" => 39,
    "Beaux Arts Village" => 40,
    "Preston" => 41,
    "Milton" => 42,
    "Yarrow Point" => 43,
    "Medina" => 44,
};

/// Resolves the city name by exact match.
pub fn code(name: &str) -> Result<u8, Error> {
    CODES
        .get(name)
        .copied()
        .ok_or_else(|| Error::InvalidCity(name.to_string()))
}

/// Inverse of [`code`].
pub fn name(code: u8) -> Option<&'static str> {
    NAMES.get(usize::from(code).checked_sub(1)?).copied()
}

/// All the names in the code order, as they are offered in the form.
pub fn names() -> impl Iterator<Item = &'static str> {
    (1..=u8::MAX).map_while(name)
}
