//! Banlist classification and report prose.

use an_api_types::{BanStatus, BanlistFormat, BanlistMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub forbidden: Vec<String>,
    pub limited: Vec<String>,
    pub semi_limited: Vec<String>,
    pub unrestricted: Vec<String>,
}

impl Partition {
    /// Sorts `names` into restriction tiers. Names missing from `banlist`
    /// are unrestricted. Input order is kept within each tier.
    pub fn of<'a>(names: impl IntoIterator<Item = &'a str>, banlist: &BanlistMap) -> Self {
        let mut partition = Self::default();
        for name in names {
            let tier = match banlist.get(name) {
                Some(BanStatus::Forbidden) => &mut partition.forbidden,
                Some(BanStatus::Limited) => &mut partition.limited,
                Some(BanStatus::SemiLimited) => &mut partition.semi_limited,
                None => &mut partition.unrestricted,
            };
            tier.push(name.to_owned());
        }
        partition
    }

    pub fn has_restrictions(&self) -> bool {
        !(self.forbidden.is_empty() && self.limited.is_empty() && self.semi_limited.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Low,
    Moderate,
    Significant,
    High,
}

impl ImpactLevel {
    /// Computed from the primary cards only. A forbidden card always
    /// outweighs any number of limited ones.
    pub fn of(primary: &Partition) -> Self {
        match (primary.forbidden.len(), primary.limited.len()) {
            (f, _) if f >= 2 => Self::High,
            (1, _) => Self::Significant,
            (0, l) if l >= 2 => Self::Moderate,
            (0, 1) => Self::Low,
            _ if !primary.semi_limited.is_empty() => Self::Low,
            _ => Self::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "NO IMPACT",
            Self::Low => "LOW IMPACT",
            Self::Moderate => "MODERATE IMPACT",
            Self::Significant => "SIGNIFICANT IMPACT",
            Self::High => "HIGH IMPACT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    /// Nothing restricted anywhere.
    Unrestricted,
    /// Core cards are clean but related cards are hit.
    RelatedOnly,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanlistReport {
    pub primary: Partition,
    pub related: Partition,
    pub impact: ImpactLevel,
    pub kind: ReportKind,
}

impl BanlistReport {
    pub fn classify(primary: &[String], related: &[String], banlist: &BanlistMap) -> Self {
        let primary = Partition::of(primary.iter().map(String::as_str), banlist);
        let related = Partition::of(related.iter().map(String::as_str), banlist);
        let kind = match (primary.has_restrictions(), related.has_restrictions()) {
            (true, _) => ReportKind::Restricted,
            (false, true) => ReportKind::RelatedOnly,
            (false, false) => ReportKind::Unrestricted,
        };
        Self {
            impact: ImpactLevel::of(&primary),
            primary,
            related,
            kind,
        }
    }
}

/// Optional per-archetype flavour supplied by a page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeTraits {
    pub core_mechanic: Option<String>,
    pub support_reliance: Option<String>,
    pub key_loss: Option<String>,
    pub adaptability: Option<String>,
    pub resilience: Option<String>,
    pub alternative_strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMessages {
    pub intro: Option<String>,
    pub meta_implications: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    pub archetype_name: String,
    #[serde(default)]
    pub related_cards: Vec<String>,
    #[serde(default)]
    pub archetype_traits: ArchetypeTraits,
    #[serde(default)]
    pub custom_messages: CustomMessages,
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Opening sentence of the report.
pub fn intro(report: &BanlistReport, options: &ReportOptions, format: BanlistFormat) -> String {
    let name = &options.archetype_name;
    let list = format.display_name();
    let traits = &options.archetype_traits;
    let forbidden = &report.primary.forbidden;

    match report.kind {
        ReportKind::Unrestricted => match &traits.core_mechanic {
            Some(mechanic) => format!(
                "The {name} archetype, with its {mechanic}, operates at full power with no restrictions on the current {list} banlist."
            ),
            None => format!(
                "As of the current {list} format, the {name} archetype is entirely unrestricted, allowing it to operate at full capacity."
            ),
        },
        ReportKind::RelatedOnly => match &traits.support_reliance {
            Some(reliance) => format!(
                "While the {name} core remains untouched, the archetype's {reliance} means restrictions on generic support cards do have an impact."
            ),
            None => format!(
                "The {name} archetype itself is largely untouched by the {list} banlist, but key synergistic cards it relies on are affected."
            ),
        },
        ReportKind::Restricted => {
            if let Some(intro) = &options.custom_messages.intro {
                return intro.clone();
            }
            match (&traits.key_loss, forbidden.as_slice()) {
                (Some(loss), [first, rest @ ..]) => {
                    let others = match rest.len() {
                        0 => String::new(),
                        n => format!(" and {n} other card{}", plural(n)),
                    };
                    format!("The loss of {first}{others} directly impacts the archetype's {loss}.")
                }
                (_, []) => {
                    let limited = report.primary.limited.len();
                    format!(
                        "The {name} archetype has been moderately restricted by the {list} banlist, with {limited} card{} limited.",
                        plural(limited)
                    )
                }
                (_, [_]) => format!(
                    "The {name} archetype has been impacted by the {list} banlist, with one card forbidden."
                ),
                (_, many) => format!(
                    "The {name} archetype has been significantly impacted by the {list} banlist, with {} cards forbidden.",
                    many.len()
                ),
            }
        }
    }
}

/// Closing "meta implications" note, when there is something to say.
pub fn meta_implications(report: &BanlistReport, options: &ReportOptions) -> Option<String> {
    if let Some(custom) = &options.custom_messages.meta_implications {
        return Some(custom.clone());
    }
    let name = &options.archetype_name;
    let traits = &options.archetype_traits;
    let forbidden = &report.primary.forbidden;

    match report.kind {
        ReportKind::Unrestricted => None,
        ReportKind::RelatedOnly => traits.adaptability.as_ref().map(|adaptability| {
            format!(
                "Despite restrictions on support cards, {name}'s {adaptability} allows it to remain competitive with adjusted builds."
            )
        }),
        ReportKind::Restricted => {
            if let (Some(resilience), true) = (&traits.resilience, forbidden.is_empty()) {
                let limited = report.primary.limited.len();
                return Some(format!(
                    "Thanks to its {resilience}, {name} remains competitive despite the limitation{}.",
                    if limited > 1 { "s" } else { "" }
                ));
            }
            if let (Some(strategy), false) = (&traits.alternative_strategy, forbidden.is_empty()) {
                return Some(format!(
                    "While the loss of key cards is significant, {name} players can adapt by {strategy}."
                ));
            }
            (!forbidden.is_empty()).then(|| {
                format!(
                    "The loss of {} significantly impacts the archetype's power level and consistency. Players will need to adapt their strategies accordingly.",
                    forbidden.join(", ")
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banlist(entries: &[(&str, BanStatus)]) -> BanlistMap {
        entries
            .iter()
            .map(|(name, status)| ((*name).to_owned(), *status))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn primary_and_related_sets_classify_separately() {
        let map = banlist(&[
            ("A", BanStatus::Forbidden),
            ("B", BanStatus::Limited),
            ("C", BanStatus::SemiLimited),
        ]);
        let report = BanlistReport::classify(&names(&["A", "B"]), &names(&["C"]), &map);

        assert_eq!(report.primary.forbidden, vec!["A"]);
        assert_eq!(report.primary.limited, vec!["B"]);
        assert!(report.primary.semi_limited.is_empty());
        assert_eq!(report.related.semi_limited, vec!["C"]);
        assert_eq!(report.impact, ImpactLevel::Significant);
        assert_eq!(report.kind, ReportKind::Restricted);
    }

    #[test]
    fn impact_level_weights_forbidden_over_limited() {
        let level = |forbidden: usize, limited: usize, semi: usize| {
            let partition = Partition {
                forbidden: vec!["f".into(); forbidden],
                limited: vec!["l".into(); limited],
                semi_limited: vec!["s".into(); semi],
                unrestricted: Vec::new(),
            };
            ImpactLevel::of(&partition)
        };
        assert_eq!(level(2, 0, 0), ImpactLevel::High);
        assert_eq!(level(1, 5, 0), ImpactLevel::Significant);
        assert_eq!(level(0, 2, 0), ImpactLevel::Moderate);
        assert_eq!(level(0, 1, 3), ImpactLevel::Low);
        assert_eq!(level(0, 0, 1), ImpactLevel::Low);
        assert_eq!(level(0, 0, 0), ImpactLevel::None);
    }

    #[test]
    fn related_restrictions_do_not_raise_primary_impact() {
        let map = banlist(&[("Pot of Greed", BanStatus::Forbidden)]);
        let report = BanlistReport::classify(&names(&["Eldlich"]), &names(&["Pot of Greed"]), &map);
        assert_eq!(report.kind, ReportKind::RelatedOnly);
        assert_eq!(report.impact, ImpactLevel::None);
        assert_eq!(report.related.forbidden, vec!["Pot of Greed"]);
    }

    #[test]
    fn intro_follows_report_kind_and_traits() {
        let options = ReportOptions {
            archetype_name: "Eldlich".into(),
            ..ReportOptions::default()
        };
        let clean = BanlistReport::classify(&names(&["Eldlich"]), &[], &BanlistMap::new());
        assert_eq!(
            intro(&clean, &options, BanlistFormat::Tcg),
            "As of the current TCG format, the Eldlich archetype is entirely unrestricted, allowing it to operate at full capacity."
        );
        assert_eq!(meta_implications(&clean, &options), None);

        let map = banlist(&[("X", BanStatus::Forbidden), ("Y", BanStatus::Forbidden), ("Z", BanStatus::Forbidden)]);
        let hit = BanlistReport::classify(&names(&["X", "Y", "Z"]), &[], &map);
        let with_loss = ReportOptions {
            archetype_traits: ArchetypeTraits {
                key_loss: Some("extender package".into()),
                ..ArchetypeTraits::default()
            },
            ..options.clone()
        };
        assert_eq!(
            intro(&hit, &with_loss, BanlistFormat::Tcg),
            "The loss of X and 2 other cards directly impacts the archetype's extender package."
        );
        assert_eq!(
            intro(&hit, &options, BanlistFormat::Ocg),
            "The Eldlich archetype has been significantly impacted by the OCG banlist, with 3 cards forbidden."
        );
        assert!(meta_implications(&hit, &options).unwrap().starts_with("The loss of X, Y, Z"));
    }

    #[test]
    fn limited_only_intro_counts_cards() {
        let map = banlist(&[("L", BanStatus::Limited)]);
        let report = BanlistReport::classify(&names(&["L", "M"]), &[], &map);
        let options = ReportOptions {
            archetype_name: "Tenpai".into(),
            ..ReportOptions::default()
        };
        assert_eq!(
            intro(&report, &options, BanlistFormat::Tcg),
            "The Tenpai archetype has been moderately restricted by the TCG banlist, with 1 card limited."
        );
    }
}
