//! Column names of the event dataset
//!
//! Canonical names follow the snake_case header of the published CSV. The
//! alias table maps the camelCase spellings used by JSON exports (and a few
//! common variants) onto them.

use phf::phf_map;

pub mod column {
    pub const ID: &str = "id";
    pub const YEAR: &str = "year";
    pub const DATE_START: &str = "date_start";
    pub const COUNTRY: &str = "country";
    pub const REGION: &str = "region";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const TYPE_OF_VIOLENCE: &str = "type_of_violence";
    pub const SIDE_A: &str = "side_a";
    pub const SIDE_B: &str = "side_b";
    pub const DYAD_NAME: &str = "dyad_name";
    pub const BEST: &str = "best";
    pub const LOW: &str = "low";
    pub const HIGH: &str = "high";
    pub const DEATHS_A: &str = "deaths_a";
    pub const DEATHS_B: &str = "deaths_b";
    pub const DEATHS_CIVILIANS: &str = "deaths_civilians";
    pub const DEATHS_UNKNOWN: &str = "deaths_unknown";
    pub const WHERE_DESCRIPTION: &str = "where_description";
    pub const SOURCE_ARTICLE: &str = "source_article";
    pub const SOURCE_HEADLINE: &str = "source_headline";
}

static ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "dateStart" => column::DATE_START,
    "date" => column::DATE_START,
    "lat" => column::LATITUDE,
    "lon" => column::LONGITUDE,
    "lng" => column::LONGITUDE,
    "typeOfViolence" => column::TYPE_OF_VIOLENCE,
    "violenceType" => column::TYPE_OF_VIOLENCE,
    "violenceTypeCode" => column::TYPE_OF_VIOLENCE,
    "sideA" => column::SIDE_A,
    "sideB" => column::SIDE_B,
    "dyadName" => column::DYAD_NAME,
    "best_est" => column::BEST,
    "deathsA" => column::DEATHS_A,
    "deathsB" => column::DEATHS_B,
    "deathsCivilians" => column::DEATHS_CIVILIANS,
    "deathsUnknown" => column::DEATHS_UNKNOWN,
    "whereDescription" => column::WHERE_DESCRIPTION,
    "sourceArticle" => column::SOURCE_ARTICLE,
    "sourceHeadline" => column::SOURCE_HEADLINE,
};

/// Canonical name for a header. Unknown headers pass through unchanged.
pub fn canonical_name(header: &str) -> &str {
    let header = header.trim();
    ALIASES.get(header).copied().unwrap_or(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(canonical_name("sideA"), column::SIDE_A);
        assert_eq!(canonical_name(" dateStart "), column::DATE_START);
        assert_eq!(canonical_name("best"), column::BEST);
        assert_eq!(canonical_name("gwnoa"), "gwnoa");
    }
}
