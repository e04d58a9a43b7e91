use eframe::egui::{self, RichText, Ui};

use crate::app::render_utils::role_color;

use super::super::ViewModel;

const MAX_ARP_ROWS: usize = 5;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Device Details");
        ui.add_space(6.0);

        let Some(device_id) = self.selected.clone().or_else(|| self.hovered.clone()) else {
            ui.label("Click a device on the canvas or in the search results.");
            return;
        };

        let graph = self.session.graph();
        let Some(node) = graph.node(&device_id) else {
            ui.label("Selected device is no longer part of the topology.");
            return;
        };

        ui.label(RichText::new(node.label.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Address: {}", node.display_address()));
        ui.label(format!("Type: {}", node.device_type()));
        if let Some(role) = node.role {
            ui.label(RichText::new(format!("Role: {}", role.label())).color(role_color(role)));
        }
        if !node.chips.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for chip in &node.chips {
                    ui.small(format!("[{chip}]"));
                }
            });
        }
        if let Some(position) = self.session.position(&node.id) {
            ui.small(format!("Position: ({:.0}, {:.0})", position.x, position.y));
        }

        ui.separator();
        ui.label(RichText::new("Links").strong());
        let mut jump_to = None;
        let mut link_count = 0;
        for end in graph.links_of(&node.id) {
            link_count += 1;
            let peer_label = graph
                .node(end.peer)
                .map_or(end.peer, |peer| peer.label.as_str());
            let text = format!(
                "{} -> {} {}",
                end.local_interface.unwrap_or("?"),
                peer_label,
                end.peer_interface.unwrap_or("?")
            );
            let response = ui.link(text);
            let response = match end.link.link_type.as_deref() {
                Some(link_type) => response.on_hover_text(link_type),
                None => response,
            };
            if response.clicked() {
                jump_to = Some(end.peer.to_owned());
            }
        }
        if link_count == 0 {
            ui.label("No discovered neighbours.");
        }

        ui.separator();
        ui.label(RichText::new("ARP").strong());
        if node.arp.is_empty() {
            ui.label("No ARP entries.");
        } else {
            egui::Grid::new("arp_entries").striped(true).show(ui, |ui| {
                for entry in node.arp.iter().take(MAX_ARP_ROWS) {
                    ui.label(entry.ip.as_str());
                    ui.label(entry.mac.as_deref().unwrap_or("-"));
                    ui.label(entry.interface().unwrap_or("-"));
                    ui.end_row();
                }
            });
            if node.arp.len() > MAX_ARP_ROWS {
                ui.small(format!("(+{} more)", node.arp.len() - MAX_ARP_ROWS));
            }
        }

        if let Some(peer) = jump_to {
            self.selected = Some(peer);
        }
    }
}
