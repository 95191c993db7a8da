//! Plain-text rendering of the page sections.
//!
//! Layout and styling belong to the web front end; this gives the preview
//! binary (and anyone grepping for copy) the same words in reading order.

use std::fmt::Write;

use crate::resources::sitecontent::{Section, SiteContent};

/// Render every section as Markdown-flavoured text.
pub fn render_page(content: &SiteContent) -> String {
    let mut out = String::new();
    for (i, section) in content.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_section(&mut out, section);
    }
    out
}

fn render_section(out: &mut String, section: &Section) {
    match section {
        Section::Hero { heading, body } => {
            writeln!(out, "# {heading}\n\n{body}").unwrap();
        }
        Section::Card {
            heading,
            body,
            items,
            groups,
        } => {
            writeln!(out, "## {heading}").unwrap();
            if let Some(body) = body {
                writeln!(out, "\n{body}").unwrap();
            }
            if !items.is_empty() {
                out.push('\n');
                for item in items {
                    writeln!(out, "- {item}").unwrap();
                }
            }
            for group in groups {
                writeln!(out, "\n### {}\n", group.heading).unwrap();
                for item in &group.items {
                    writeln!(out, "- {item}").unwrap();
                }
            }
        }
        Section::Contact {
            heading,
            lines,
            email,
        } => {
            writeln!(out, "## {heading}\n").unwrap();
            for line in lines {
                writeln!(out, "{line}").unwrap();
            }
            writeln!(out, "{email}").unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::geoposition::Coordinate;
    use crate::resources::sitecontent::{ListGroup, Viewport};

    fn content(sections: Vec<Section>) -> SiteContent {
        SiteContent {
            title: "t".to_owned(),
            viewport: Viewport {
                center: Coordinate::default(),
                zoom: 13,
                tile_url: String::new(),
            },
            facilities: Vec::new(),
            routes: Vec::new(),
            sections,
        }
    }

    #[test]
    fn test_empty_content_renders_nothing() {
        assert_eq!(render_page(&content(Vec::new())), "");
    }

    #[test]
    fn test_hero_and_card_layout() {
        let text = render_page(&content(vec![
            Section::Hero {
                heading: "Biochar".to_owned(),
                body: "Carbon-rich.".to_owned(),
            },
            Section::Card {
                heading: "Benefits".to_owned(),
                body: None,
                items: vec!["Fertility".to_owned()],
                groups: vec![ListGroup {
                    heading: "Economic".to_owned(),
                    items: vec!["Lower costs".to_owned()],
                }],
            },
        ]));
        assert_eq!(
            text,
            "# Biochar\n\nCarbon-rich.\n\n## Benefits\n\n- Fertility\n\n### Economic\n\n- Lower costs\n"
        );
    }

    #[test]
    fn test_biochar_page_mentions_contact_email() {
        let text = render_page(&SiteContent::biochar());
        assert!(text.starts_with("# Biochar: Transforming Soil & Climate\n"));
        assert!(text.contains("## How Biochar Is Made\n\n- Biomass feedstock preparation\n"));
        assert!(text.contains("### Environmental\n"));
        assert!(text.trim_end().ends_with("info@biochar.com"));
    }
}
