pub mod connections;
pub mod hit;
pub mod svg;

pub use connections::{ConnectionLine, ConnectionSet, compute_connections};
pub use hit::{Hit, HitPart, handle_rect, hit_test};
pub use svg::{SvgTheme, render_svg};
