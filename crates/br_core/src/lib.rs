pub mod input;
pub mod resources;
pub mod time;
pub mod view;
pub mod viewport;
