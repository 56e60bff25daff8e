//! Low-level drawing helpers shared by the field renderers.

use embedded_graphics::pixelcolor::Rgb565;

use crate::draw::DrawingPort;
use crate::fonts::{Font, char_height, text_width};
use crate::layout::{Area, Border, Coord};

/// Thickness of a [`Border::FAT`] bottom edge.
const FAT_BORDER: Coord = 3;

/// Height of the selection marker bar.
const MARKER_HEIGHT: Coord = 8;

/// Draw `text` horizontally centered in the span `[x, x + width)`.
pub fn put_string_centered(
    port: &mut dyn DrawingPort,
    x: Coord,
    width: Coord,
    y: Coord,
    font: Font,
    text: &str,
) {
    port.select_font(font);
    let offset = (width - text_width(font, text)).max(0) / 2;
    port.put_string(x + offset, y, text);
}

/// Draw `text` so that it ends just left of `right`.
pub fn put_string_right(
    port: &mut dyn DrawingPort,
    right: Coord,
    y: Coord,
    font: Font,
    text: &str,
) {
    port.select_font(font);
    port.put_string(right - text_width(font, text), y, text);
}

/// Fill the area with its background, then center `text` in it.
///
/// The glyphs are drawn transparent over the fresh background with one
/// column of left padding.
pub fn draw_text_box(
    port: &mut dyn DrawingPort,
    area: &Area,
    text: &str,
) {
    let font = area.require_font();
    port.fill_rect(area.x, area.y, area.width, area.height, area.color.background());

    port.set_foreground(area.color.foreground());
    port.set_background(None);
    let y = area.y + (area.height - char_height(font)).max(0) / 2;
    put_string_centered(port, area.x + 1, area.width - 1, y, font, text);
    port.set_background(Some(area.color.background()));
}

/// Draw every other pixel of the area in the foreground color.
///
/// The checkerboard is laid down as 45 degree diagonals, one port call per
/// diagonal.
pub fn draw_mesh(
    port: &mut dyn DrawingPort,
    area: &Area,
) {
    if area.width <= 0 || area.height <= 0 {
        return;
    }
    let color = area.color.foreground();
    // Diagonal `c` holds the pixels with column - row == c; even ones are set
    let mut c = -(area.height - 1);
    if c % 2 != 0 {
        c += 1;
    }
    while c < area.width {
        let row = (-c).max(0);
        let col = row + c;
        let len = (area.width - col).min(area.height - row);
        port.draw_line(
            area.x + col,
            area.y + row,
            area.x + col + len - 1,
            area.y + row + len - 1,
            color,
        );
        c += 2;
    }
}

/// Draw the border lines configured on the area.
pub fn draw_border(
    port: &mut dyn DrawingPort,
    area: &Area,
) {
    if area.border.is_empty() || area.width <= 0 || area.height <= 0 {
        return;
    }
    let color = area.color.foreground();
    let right = area.right() - 1;
    let bottom = area.bottom() - 1;

    if area.border.contains(Border::TOP) {
        port.draw_line(area.x, area.y, right, area.y, color);
    }
    if area.border.contains(Border::BOTTOM) {
        if area.border.contains(Border::FAT) {
            let thickness = FAT_BORDER.min(area.height);
            port.fill_rect(area.x, area.bottom() - thickness, area.width, thickness, color);
        } else {
            port.draw_line(area.x, bottom, right, bottom, color);
        }
    }
    if area.border.contains(Border::LEFT) {
        port.draw_line(area.x, area.y, area.x, bottom, color);
    }
    if area.border.contains(Border::RIGHT) {
        port.draw_line(right, area.y, right, bottom, color);
    }
}

/// Small bar at the right edge of the area, vertically centered.
pub fn draw_selection_marker(
    port: &mut dyn DrawingPort,
    area: &Area,
    width: Coord,
    color: Rgb565,
) {
    let height = MARKER_HEIGHT.min(area.height);
    let y = area.y + (area.height - height) / 2;
    port.fill_rect(area.right() - width, y, width, height, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::SMALL_FONT;
    use crate::layout::ColorMode;
    use crate::testing::{Op, RecordingPort};

    fn area(border: Border) -> Area {
        Area {
            x: 10,
            y: 20,
            width: 60,
            height: 12,
            font: Some(SMALL_FONT),
            color: ColorMode::Normal,
            border,
            modifier: crate::layout::Modifier::None,
        }
    }

    #[test]
    fn test_centered_text_offset() {
        let mut port = RecordingPort::new();
        put_string_centered(&mut port, 0, 60, 5, SMALL_FONT, "abcd");
        // 4 glyphs of 6 px in a 60 px span
        assert_eq!(port.texts(), [(18, 5, "abcd")]);
    }

    #[test]
    fn test_right_aligned_text_ends_at_edge() {
        let mut port = RecordingPort::new();
        put_string_right(&mut port, 100, 0, SMALL_FONT, "12");
        assert_eq!(port.texts(), [(88, 0, "12")]);
    }

    #[test]
    fn test_text_box_clears_background_first() {
        let mut port = RecordingPort::new();
        draw_text_box(&mut port, &area(Border::empty()), "hi");
        assert!(matches!(port.ops[0], Op::Fill { x: 10, y: 20, w: 60, h: 12, .. }));
        assert_eq!(port.texts().len(), 1);
    }

    #[test]
    fn test_fat_border_is_filled() {
        let mut port = RecordingPort::new();
        draw_border(&mut port, &area(Border::BOTTOM | Border::FAT));
        assert!(matches!(port.ops[..], [Op::Fill { y: 29, h: 3, .. }]));
    }

    #[test]
    fn test_mesh_covers_checkerboard_with_diagonals() {
        let mut port = RecordingPort::new();
        let area = area(Border::empty());
        draw_mesh(&mut port, &area);

        let mut pixels = std::collections::BTreeSet::new();
        for op in &port.ops {
            let Op::Line { x0, y0, x1, y1, .. } = *op else {
                panic!("mesh should only draw lines, got {op:?}");
            };
            assert_eq!(x1 - x0, y1 - y0);
            for i in 0..=(x1 - x0) {
                pixels.insert((x0 + i, y0 + i));
            }
        }

        let expected: std::collections::BTreeSet<_> = (0..area.height)
            .flat_map(|row| ((row & 1)..area.width).step_by(2).map(move |col| (area.x + col, area.y + row)))
            .collect();
        assert_eq!(pixels, expected);
        // One call per diagonal of a 60x12 area
        assert_eq!(port.draw_count(), 35);
    }

    #[test]
    fn test_box_border_draws_four_lines() {
        let mut port = RecordingPort::new();
        draw_border(&mut port, &area(Border::BOX));
        assert_eq!(port.draw_count(), 4);
    }
}
