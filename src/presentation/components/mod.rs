mod footer;
mod row;

pub use footer::render_footer;
pub use row::{RowHits, render_card_row};
