//! egui painting of the title overlay.

use egui::text::LayoutJob;
use egui::{Color32, FontId, Pos2, Shape, Stroke, TextFormat, Vec2};
use globeview_common::{Rgb, Rgba};
use globeview_scene::Overlay;
use globeview_scene::overlay::{GLOW_COLOR, GLOW_RADIUS, ICON_COLOR, TEXT_COLOR};
use std::f32::consts::TAU;

/// Directions sampled around each glyph to fake the text glow.
const GLOW_DIRECTIONS: usize = 8;
const GLOW_RINGS: usize = 3;
/// Opacity of each glow copy; copies overlap near the glyphs.
const GLOW_PASS_WEIGHT: f32 = 0.15;

/// Paint the overlay in a foreground area that never takes input.
pub fn draw(ctx: &egui::Context, overlay: &Overlay, elapsed: f32) {
    egui::Area::new(egui::Id::new("globe_overlay"))
        .order(egui::Order::Foreground)
        .interactable(overlay.is_interactive())
        .fixed_pos(Pos2::new(overlay.padding, overlay.padding))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = overlay.gap;

                let (icon_rect, _) = ui.allocate_exact_size(
                    Vec2::splat(overlay.icon_size),
                    egui::Sense::hover(),
                );
                let icon_color = color32(ICON_COLOR, overlay.pulse_opacity(elapsed));
                for shape in globe_icon(icon_rect.center(), overlay.icon_size / 2.0, icon_color) {
                    ui.painter().add(shape);
                }

                let galley = ui.fonts(|fonts| fonts.layout_job(title_job(overlay)));
                let (title_rect, _) =
                    ui.allocate_exact_size(galley.size(), egui::Sense::hover());
                let glow = rgba32(GLOW_COLOR).gamma_multiply(GLOW_PASS_WEIGHT);
                for offset in glow_offsets() {
                    ui.painter().galley_with_override_text_color(
                        title_rect.min + offset,
                        galley.clone(),
                        glow,
                    );
                }
                ui.painter()
                    .galley(title_rect.min, galley, color32(TEXT_COLOR, 1.0));
            });
        });
}

/// Title as one section per glyph so each carries its own gradient color.
fn title_job(overlay: &Overlay) -> LayoutJob {
    let mut job = LayoutJob::default();
    for (glyph, color) in overlay.glyph_colors() {
        job.append(
            glyph.encode_utf8(&mut [0; 4]),
            0.0,
            TextFormat {
                font_id: FontId::monospace(overlay.title_size),
                color: color32(color, 1.0),
                extra_letter_spacing: overlay.letter_spacing(),
                ..Default::default()
            },
        );
    }
    job
}

fn glow_offsets() -> impl Iterator<Item = Vec2> {
    (1..=GLOW_RINGS).flat_map(|ring| {
        let radius = GLOW_RADIUS * ring as f32 / GLOW_RINGS as f32;
        (0..GLOW_DIRECTIONS).map(move |i| {
            let angle = TAU * i as f32 / GLOW_DIRECTIONS as f32;
            Vec2::angled(angle) * radius
        })
    })
}

/// Outline globe: rim, equator and one meridian.
fn globe_icon(center: Pos2, radius: f32, color: Color32) -> Vec<Shape> {
    let stroke = Stroke::new((radius / 8.0).max(1.0), color);
    let r = radius - stroke.width / 2.0;
    let meridian: Vec<Pos2> = (0..48)
        .map(|i| {
            let t = TAU * i as f32 / 48.0;
            center + Vec2::new(0.45 * r * t.cos(), r * t.sin())
        })
        .collect();
    vec![
        Shape::circle_stroke(center, r, stroke),
        Shape::line_segment([center - Vec2::X * r, center + Vec2::X * r], stroke),
        Shape::closed_line(meridian, stroke),
    ]
}

fn color32(color: Rgb, alpha: f32) -> Color32 {
    let [r, g, b] = color.to_rgb8();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn rgba32(color: Rgba) -> Color32 {
    color32(color.rgb(), color.a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_job_has_one_section_per_glyph() {
        let overlay = Overlay::STANDARD;
        let job = title_job(&overlay);
        assert_eq!(job.text, "GLOBAL RISK MONITOR");
        assert_eq!(job.sections.len(), overlay.title.chars().count());
        assert_eq!(job.sections[0].format.font_id, FontId::monospace(36.0));
        assert_ne!(
            job.sections[0].format.color,
            job.sections.last().map(|s| s.format.color).unwrap_or_default()
        );
    }

    #[test]
    fn icon_alpha_follows_pulse() {
        let overlay = Overlay::STANDARD;
        assert_eq!(color32(ICON_COLOR, overlay.pulse_opacity(0.0)).a(), 255);
        let dimmed = color32(ICON_COLOR, overlay.pulse_opacity(1.0)).a();
        assert!((127..=128).contains(&dimmed));
    }

    #[test]
    fn glow_stays_within_radius() {
        let offsets: Vec<Vec2> = glow_offsets().collect();
        assert_eq!(offsets.len(), GLOW_DIRECTIONS * GLOW_RINGS);
        assert!(offsets.iter().all(|o| o.length() <= GLOW_RADIUS + 1e-4));
    }
}
