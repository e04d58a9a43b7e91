use cdp_topology::topology::Node;
use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::app::render_utils::role_color;

use super::super::ViewModel;

const MAX_SEARCH_ROWS: usize = 40;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best score over the fields a user is likely to type: name, management address, id.
fn device_score(matcher: &SkimMatcherV2, node: &Node, query: &str) -> Option<i64> {
    [
        Some(node.label.as_str()),
        node.mgmt_ip.as_deref(),
        Some(node.id.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|text| fuzzy_match_score(matcher, text, query))
    .max()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Devices");
        ui.add_space(4.0);

        ui.label("Search (name, address or id)")
            .on_hover_text("Fuzzy-highlight matching devices on the canvas.");
        let response = ui.text_edit_singleline(&mut self.search);
        if response.changed() {
            self.refresh_search_matches();
        }

        let query = self.search.trim();
        if query.is_empty() {
            return;
        }

        let ranked = self.ranked_matches(query);
        if ranked.is_empty() {
            ui.label("No devices match.");
            return;
        }

        ui.add_space(4.0);
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("device_search_scroll")
            .max_height(220.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (node, _score) in ranked.iter().take(MAX_SEARCH_ROWS) {
                    let is_selected = self.selected.as_deref() == Some(node.id.as_str());
                    let mut text = RichText::new(format!("{}  {}", node.label, node.display_address()));
                    if let Some(role) = node.role {
                        text = text.color(role_color(role));
                    }
                    if ui
                        .selectable_label(is_selected, text)
                        .on_hover_text(node.id.as_str())
                        .clicked()
                    {
                        clicked = Some(node.id.clone());
                    }
                }
            });
        if ranked.len() > MAX_SEARCH_ROWS {
            ui.small(format!("(+{} more)", ranked.len() - MAX_SEARCH_ROWS));
        }

        if let Some(id) = clicked {
            self.selected = Some(id);
        }
    }

    fn ranked_matches(&self, query: &str) -> Vec<(&Node, i64)> {
        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .session
            .graph()
            .nodes()
            .iter()
            .filter_map(|node| device_score(&matcher, node, query).map(|score| (node, score)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub(in crate::app) fn refresh_search_matches(&mut self) {
        let query = self.search.trim().to_owned();
        self.search_matches = if query.is_empty() {
            Default::default()
        } else {
            self.ranked_matches(&query)
                .into_iter()
                .map(|(node, _)| node.id.clone())
                .collect()
        };
    }
}
