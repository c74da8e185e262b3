pub mod hit;
pub mod paint;
pub mod wire;

pub use hit::{Hit, hit_test, port_anchor, port_rect};
pub use paint::{PaintCommand, Painter, PendingWire, paint_graph};
pub use wire::WireStyle;
