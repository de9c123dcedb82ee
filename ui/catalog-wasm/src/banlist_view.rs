//! HTML for the per-archetype banlist section.
//!
//! Pure string building so it can be tested off the browser; the caller
//! assigns the result to the container's `innerHTML`. Every card name and
//! page-supplied message is escaped.

use an_api_types::BanlistFormat;
use an_card_lookup::banlist::{self, BanlistReport, ReportKind, ReportOptions};

pub const LOADING_HTML: &str = r#"<div class="card p-6 bg-gray-800"><p class="text-center text-gray-400"><i class="fas fa-spinner fa-spin mr-2"></i>Loading banlist data...</p></div>"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

struct Tier<'a> {
    names: &'a [String],
    color: &'static str,
    heading: &'static str,
    icon: &'static str,
}

fn primary_tiers(report: &BanlistReport) -> [Tier<'_>; 3] {
    let p = &report.primary;
    [
        Tier { names: &p.forbidden, color: "red", heading: "Forbidden (0 copies)", icon: "fa-ban" },
        Tier { names: &p.limited, color: "yellow", heading: "Limited (1 copy)", icon: "fa-exclamation-triangle" },
        Tier { names: &p.semi_limited, color: "orange", heading: "Semi-Limited (2 copies)", icon: "fa-exclamation-circle" },
    ]
}

fn related_tiers(report: &BanlistReport) -> [Tier<'_>; 3] {
    let r = &report.related;
    [
        Tier { names: &r.forbidden, color: "red", heading: "Forbidden", icon: "" },
        Tier { names: &r.limited, color: "yellow", heading: "Limited", icon: "" },
        Tier { names: &r.semi_limited, color: "orange", heading: "Semi-Limited", icon: "" },
    ]
}

fn primary_block(report: &BanlistReport) -> String {
    let mut html = String::from(
        r#"<div class="mb-4"><h3 class="text-lg font-semibold text-white mb-3"><i class="fas fa-layer-group mr-2"></i>Archetype Cards</h3><div class="grid grid-cols-1 md:grid-cols-2 gap-4">"#,
    );
    for tier in primary_tiers(report).iter().filter(|t| !t.names.is_empty()) {
        let items: String = tier
            .names
            .iter()
            .map(|n| format!(r#"<li><strong class="text-{}-400">{}</strong></li>"#, tier.color, escape_html(n)))
            .collect();
        html.push_str(&format!(
            r#"<div class="card combo-step-card p-4 bg-gray-900"><h4 class="text-lg font-bold text-{c}-500 mb-2"><i class="fas {icon} mr-2"></i>{h}</h4><ul class="list-disc list-inside space-y-1 text-sm text-gray-300">{items}</ul></div>"#,
            c = tier.color,
            icon = tier.icon,
            h = tier.heading,
        ));
    }
    html.push_str("</div></div>");
    html
}

fn related_block(report: &BanlistReport, title: &str, centered: bool) -> String {
    let align = if centered { " text-center" } else { "" };
    let wrapper = if centered { "<div>" } else { r#"<div class="mt-4">"# };
    let mut html = format!(
        r#"{wrapper}<h3 class="text-lg font-semibold text-white mb-3{align}"><i class="fas fa-link mr-2"></i>{title}</h3><div class="grid grid-cols-1 md:grid-cols-2 gap-4">"#
    );
    for tier in related_tiers(report).iter().filter(|t| !t.names.is_empty()) {
        let items: String = tier
            .names
            .iter()
            .map(|n| format!(r#"<li class="text-{}-400">{}</li>"#, tier.color, escape_html(n)))
            .collect();
        html.push_str(&format!(
            r#"<div class="card combo-step-card p-4 border-l-4 border-{c}-500 bg-gray-900"><h4 class="text-md font-bold text-{c}-500 mb-2">{h}</h4><ul class="list-disc list-inside space-y-1 text-xs text-gray-300">{items}</ul></div>"#,
            c = tier.color,
            h = tier.heading,
        ));
    }
    html.push_str("</div></div>");
    html
}

fn meta_note(text: &str, tone: &str) -> String {
    format!(
        r#"<div class="mt-4 p-3 bg-{tone}-900 bg-opacity-30 rounded border-l-4 border-{tone}-500"><p class="text-sm text-gray-300"><strong>Meta Implications:</strong> {}</p></div>"#,
        escape_html(text)
    )
}

/// Blue for trait-driven reassurance, yellow for losses and page overrides.
fn meta_tone(report: &BanlistReport, options: &ReportOptions) -> &'static str {
    if options.custom_messages.meta_implications.is_some() {
        return "yellow";
    }
    let traits = &options.archetype_traits;
    match report.kind {
        ReportKind::RelatedOnly => "blue",
        _ if traits.resilience.is_some() && report.primary.forbidden.is_empty() => "blue",
        _ => "yellow",
    }
}

pub fn render(report: &BanlistReport, options: &ReportOptions, format: BanlistFormat) -> String {
    let name = escape_html(&options.archetype_name);
    let intro = escape_html(&banlist::intro(report, options, format));
    let meta = banlist::meta_implications(report, options)
        .map(|text| meta_note(&text, meta_tone(report, options)))
        .unwrap_or_default();

    match report.kind {
        ReportKind::Unrestricted => format!(
            r#"<div class="card p-6 bg-gray-800"><p class="text-center text-lg mb-4 text-gray-300">{intro}</p><div class="mt-4 p-3 bg-green-900 bg-opacity-50 rounded border-l-4 border-green-500"><p class="text-sm text-green-200"><strong class="font-bold">Fully Unrestricted:</strong> All core "{name}" cards are currently at 3 copies per deck, allowing for maximum consistency and power.</p></div></div>"#
        ),
        ReportKind::RelatedOnly => format!(
            r#"<div class="card p-6 bg-gray-800"><p class="text-gray-300 mb-4 text-center">{intro}</p>{}{meta}</div>"#,
            related_block(report, "Affected Synergistic Cards", true)
        ),
        ReportKind::Restricted => {
            let color = if report.primary.forbidden.is_empty() { "yellow" } else { "red" };
            let related = if report.related.has_restrictions() {
                related_block(report, "Synergistic Cards", false)
            } else {
                String::new()
            };
            format!(
                r#"<div class="card p-6 bg-gray-800"><p class="text-gray-300 mb-4 text-center"><strong class="text-{color}-500 font-bold">{}:</strong> {intro}</p>{}{related}{meta}</div>"#,
                report.impact.label(),
                primary_block(report)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use an_api_types::{BanStatus, BanlistMap};

    fn options(name: &str) -> ReportOptions {
        ReportOptions {
            archetype_name: name.to_owned(),
            ..ReportOptions::default()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn escapes_markup_in_card_names() {
        assert_eq!(escape_html(r#"<Tom & "Jerry">"#), "&lt;Tom &amp; &quot;Jerry&quot;&gt;");
    }

    #[test]
    fn unrestricted_section_says_so() {
        let report = BanlistReport::classify(&names(&["A"]), &[], &BanlistMap::new());
        let html = render(&report, &options("Eldlich"), BanlistFormat::Tcg);
        assert!(html.contains("Fully Unrestricted"));
        assert!(html.contains("All core \"Eldlich\" cards"));
        assert!(!html.contains("Meta Implications"));
    }

    #[test]
    fn restricted_section_lists_tiers_with_impact() {
        let map: BanlistMap = [
            ("A".to_owned(), BanStatus::Forbidden),
            ("B".to_owned(), BanStatus::Limited),
            ("X".to_owned(), BanStatus::SemiLimited),
        ]
        .into_iter()
        .collect();
        let report = BanlistReport::classify(&names(&["A", "B", "C"]), &names(&["X"]), &map);
        let html = render(&report, &options("Dark World"), BanlistFormat::Tcg);

        assert!(html.contains("SIGNIFICANT IMPACT:"));
        assert!(html.contains("text-red-500 font-bold"));
        assert!(html.contains("Forbidden (0 copies)"));
        assert!(html.contains("Limited (1 copy)"));
        assert!(!html.contains("Semi-Limited (2 copies)"));
        assert!(html.contains("Synergistic Cards"));
        assert!(html.contains(r#"<li class="text-orange-400">X</li>"#));
        assert!(html.contains("The loss of A significantly impacts"));
    }

    #[test]
    fn related_only_section_shows_affected_support() {
        let map: BanlistMap = [("Generic".to_owned(), BanStatus::Limited)].into_iter().collect();
        let report = BanlistReport::classify(&names(&["A"]), &names(&["Generic"]), &map);
        let html = render(&report, &options("D/D"), BanlistFormat::Tcg);
        assert!(html.contains("Affected Synergistic Cards"));
        assert!(!html.contains("Archetype Cards"));
        assert!(html.contains("D/D archetype itself is largely untouched"));
    }
}
