//! Drawing helpers and reusable custom renderers.
//!
//! Everything draws through [`crate::draw::DrawingPort`] so widgets stay
//! independent of the panel driver.

mod primitives;
mod warning;

pub use primitives::{
    draw_border,
    draw_mesh,
    draw_selection_marker,
    draw_text_box,
    put_string_centered,
    put_string_right,
};
pub use warning::WarningText;
