mod click;

pub use click::{ClickRecord, ClickStats, NewClick};
