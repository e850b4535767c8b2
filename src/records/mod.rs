//! Record rendering - tables, panels and cards built from ordered records

mod cards;
mod record;
mod table;

pub use cards::{card_links, render_panel, render_staff_cards};
pub use record::ContentRecord;
pub use table::{render_rows, render_table, table_links, Cell, Column, Row};
