pub mod debug_panel;
pub mod overlay;
pub mod painter;
pub mod textures;

pub use debug_panel::{DebugActions, DebugStats};
pub use overlay::{PreparedFrame, RangeOverlay};
pub use textures::TextureCache;
