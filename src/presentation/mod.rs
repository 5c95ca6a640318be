mod badge;
mod components;
mod view;

pub use badge::{Badge, badge_for};
pub use components::RowHits;
pub use view::{UiContext, draw};
