//! The five application scenes.

mod game;
mod game_over;
mod intro;
mod weapon_detail;
mod weapon_gallery;

pub use game::GameScene;
pub use game_over::GameOverScene;
pub use intro::{IntroScene, SITE_URL};
pub use weapon_detail::WeaponDetailScene;
pub use weapon_gallery::WeaponGalleryScene;

/// Resource key of the brand logo shown on most screens.
pub const LOGO_RESOURCE: &str = "logo_primary";
