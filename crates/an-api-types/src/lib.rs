use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Icon payload attached to a catalog entry: inline SVG markup, or a
/// reference to an image that is fetched only when the card is revealed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IconSource {
    Inline(String),
    Lazy { src: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeRecord {
    pub name: String,
    pub description: String,
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconSource>,
    #[serde(default)]
    pub first_release_date: Option<String>,
    #[serde(default)]
    pub latest_release_date: Option<String>,
    #[serde(default, rename = "fromAPI")]
    pub from_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cards: Option<u32>,
}

impl ArchetypeRecord {
    pub fn new(name: &str, description: &str, filepath: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            filepath: filepath.to_owned(),
            icon: None,
            first_release_date: None,
            latest_release_date: None,
            from_api: false,
            total_cards: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchetypeDates {
    pub earliest: String,
    pub latest: String,
    #[serde(default)]
    pub card_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BanStatus {
    Forbidden,
    Limited,
    #[serde(rename = "Semi-Limited")]
    SemiLimited,
}

impl BanStatus {
    /// Maps the card database's `ban_*` strings onto restriction tiers.
    pub fn from_api(status: &str) -> Option<Self> {
        match status {
            "Banned" | "Forbidden" => Some(Self::Forbidden),
            "Limited" => Some(Self::Limited),
            "Semi-Limited" => Some(Self::SemiLimited),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Forbidden => "Forbidden",
            Self::Limited => "Limited",
            Self::SemiLimited => "Semi-Limited",
        }
    }

    pub fn copies(&self) -> u8 {
        match self {
            Self::Forbidden => 0,
            Self::Limited => 1,
            Self::SemiLimited => 2,
        }
    }
}

pub type BanlistMap = HashMap<String, BanStatus>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BanlistFormat {
    #[default]
    Tcg,
    Ocg,
    Goat,
}

impl BanlistFormat {
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Tcg => "tcg",
            Self::Ocg => "ocg",
            Self::Goat => "goat",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tcg => "TCG",
            Self::Ocg => "OCG",
            Self::Goat => "GOAT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    pub name: String,
    pub id: u64,
    #[serde(rename = "type")]
    pub card_type: String,
    pub race: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atk: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkval: Option<u32>,
    pub desc: String,
    pub image_url: String,
}

impl CardRecord {
    pub fn from_api(card: &ApiCard, image_url: String) -> Self {
        Self {
            name: card.name.clone(),
            id: card.id,
            card_type: card.card_type.clone(),
            race: card.race.clone(),
            atk: card.atk,
            def: card.def,
            linkval: card.linkval,
            desc: card.desc.clone(),
            image_url,
        }
    }

    pub fn is_monster(&self) -> bool {
        self.card_type.contains("Monster")
    }
}

// ── Card database payloads ──

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardInfoResponse {
    #[serde(default)]
    pub data: Vec<ApiCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiCard {
    pub id: u64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub atk: Option<i32>,
    #[serde(default)]
    pub def: Option<i32>,
    #[serde(default)]
    pub linkval: Option<u32>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub card_sets: Vec<CardSetRef>,
    #[serde(default)]
    pub banlist_info: Option<BanlistInfo>,
}

impl ApiCard {
    pub fn ban_status(&self, format: BanlistFormat) -> Option<BanStatus> {
        let info = self.banlist_info.as_ref()?;
        let raw = match format {
            BanlistFormat::Tcg => info.ban_tcg.as_deref(),
            BanlistFormat::Ocg => info.ban_ocg.as_deref(),
            BanlistFormat::Goat => info.ban_goat.as_deref(),
        }?;
        BanStatus::from_api(raw)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSetRef {
    pub set_name: String,
    #[serde(default)]
    pub set_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanlistInfo {
    #[serde(default)]
    pub ban_tcg: Option<String>,
    #[serde(default)]
    pub ban_ocg: Option<String>,
    #[serde(default)]
    pub ban_goat: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSetInfo {
    pub set_name: String,
    #[serde(default)]
    pub set_code: Option<String>,
    #[serde(default)]
    pub tcg_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archetype_record_reads_site_json() {
        let raw = r#"{
            "name": "D.D.",
            "description": "Banish-themed series.",
            "filepath": "D.D. Deck Analysis.html",
            "icon": "<svg></svg>",
            "firstReleaseDate": null
        }"#;
        let record: ArchetypeRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name, "D.D.");
        assert_eq!(record.icon, Some(IconSource::Inline("<svg></svg>".into())));
        assert!(record.first_release_date.is_none());
        assert!(!record.from_api);

        let lazy: ArchetypeRecord = serde_json::from_str(
            r#"{"name":"D/D","description":"","filepath":"x.html","icon":{"src":"icons/dd.svg"}}"#,
        )
        .unwrap();
        assert_eq!(
            lazy.icon,
            Some(IconSource::Lazy {
                src: "icons/dd.svg".into()
            })
        );
    }

    #[test]
    fn from_api_flag_keeps_its_site_spelling() {
        let mut record = ArchetypeRecord::new("Eldlich", "", "Eldlich.html");
        record.from_api = true;
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fromAPI"], serde_json::Value::Bool(true));
        assert!(json.get("totalCards").is_none());
    }

    #[test]
    fn ban_status_maps_database_wording() {
        assert_eq!(BanStatus::from_api("Banned"), Some(BanStatus::Forbidden));
        assert_eq!(BanStatus::from_api("Limited"), Some(BanStatus::Limited));
        assert_eq!(BanStatus::from_api("Semi-Limited"), Some(BanStatus::SemiLimited));
        assert_eq!(BanStatus::from_api("Unlimited"), None);
        assert_eq!(BanStatus::SemiLimited.copies(), 2);
    }

    #[test]
    fn api_card_reads_format_specific_status() {
        let raw = r#"{
            "id": 44519536,
            "name": "Left Leg of the Forbidden One",
            "type": "Normal Monster",
            "race": "Spellcaster",
            "atk": 200,
            "def": 300,
            "desc": "A forbidden left leg.",
            "banlist_info": {"ban_ocg": "Limited", "ban_goat": "Limited"}
        }"#;
        let card: ApiCard = serde_json::from_str(raw).unwrap();
        assert_eq!(card.ban_status(BanlistFormat::Tcg), None);
        assert_eq!(card.ban_status(BanlistFormat::Ocg), Some(BanStatus::Limited));
        assert!(card.card_sets.is_empty());
    }
}
