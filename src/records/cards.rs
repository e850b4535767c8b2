//! Card and panel rendering for assignment lists and staff bios

use super::ContentRecord;
use crate::config::SiteConfig;
use crate::helpers::{link_to, url_for, TrustedHtml};

const PANEL_ITEM_CLASS: &str = "panel-block list-group-item is-primary";

/// Render a panel of assignment links, one entry per record in order.
///
/// Reads `title`, `link` and `download`. An item without a link is still
/// listed, as a plain entry.
pub fn render_panel(config: &SiteConfig, items: &[ContentRecord]) -> TrustedHtml {
    let entries: TrustedHtml = items
        .iter()
        .map(|item| {
            let title = TrustedHtml::escape(item.get("title").unwrap_or_default());
            match item.get_non_empty("link") {
                Some(link) => {
                    let href = url_for(config, link);
                    let mut attrs = vec![("class", PANEL_ITEM_CLASS), ("href", href.as_str())];
                    if item.flag("download") {
                        attrs.push(("download", ""));
                    }
                    TrustedHtml::element("a", &attrs, &title)
                }
                None => TrustedHtml::element("a", &[("class", PANEL_ITEM_CLASS)], &title),
            }
        })
        .collect();

    TrustedHtml::element("div", &[("class", "panel list-group")], &entries)
}

/// Render one card per staff member, in order.
///
/// Reads `name`, `role`, `photo`, `email`, `office_hours` and `bio`; absent
/// fields are left out of the card.
pub fn render_staff_cards(config: &SiteConfig, members: &[ContentRecord]) -> TrustedHtml {
    let cards: TrustedHtml = members
        .iter()
        .map(|member| staff_card(config, member))
        .collect();
    TrustedHtml::element("div", &[("class", "staff-list")], &cards)
}

fn staff_card(config: &SiteConfig, member: &ContentRecord) -> TrustedHtml {
    let name = member.get("name").unwrap_or_default();

    let mut media = TrustedHtml::new();
    if let Some(photo) = member.get_non_empty("photo") {
        let src = url_for(config, photo);
        let img = TrustedHtml::void_element("img", &[("src", &src), ("alt", name)]);
        media.push(&TrustedHtml::element(
            "figure",
            &[("class", "media-left image is-64x64")],
            &img,
        ));
    }

    let mut heading = TrustedHtml::element(
        "p",
        &[("class", "title is-5")],
        &TrustedHtml::escape(name),
    );
    if let Some(role) = member.get_non_empty("role") {
        heading.push(&TrustedHtml::element(
            "p",
            &[("class", "subtitle is-6")],
            &TrustedHtml::escape(role),
        ));
    }
    media.push(&TrustedHtml::element(
        "div",
        &[("class", "media-content")],
        &heading,
    ));

    let mut content = TrustedHtml::new();
    if let Some(bio) = member.get_non_empty("bio") {
        content.push(&TrustedHtml::element("p", &[], &TrustedHtml::escape(bio)));
    }
    if let Some(hours) = member.get_non_empty("office_hours") {
        let mut line = TrustedHtml::element(
            "strong",
            &[],
            &TrustedHtml::from_static("Office Hours: "),
        );
        line.push(&TrustedHtml::escape(hours));
        content.push(&TrustedHtml::element("p", &[], &line));
    }
    if let Some(email) = member.get_non_empty("email") {
        let mailto = format!("mailto:{}", email);
        content.push(&TrustedHtml::element(
            "p",
            &[],
            &link_to(config, &mailto, &TrustedHtml::escape(email)),
        ));
    }

    let mut inner = TrustedHtml::element("div", &[("class", "media")], &media);
    if !content.is_empty() {
        inner.push(&TrustedHtml::element("div", &[("class", "content")], &content));
    }
    let inner = TrustedHtml::element("div", &[("class", "card-content")], &inner);
    TrustedHtml::element("div", &[("class", "card staff-card")], &inner)
}

/// Link targets used by panel items and staff cards
pub fn card_links<'a>(records: &'a [ContentRecord]) -> impl Iterator<Item = &'a str> + 'a {
    records.iter().flat_map(|record| {
        ["link", "photo"]
            .into_iter()
            .filter_map(move |field| record.get_non_empty(field))
    })
}
