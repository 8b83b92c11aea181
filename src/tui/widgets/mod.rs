// Widget rendering for the screener dashboard.

pub mod documents;
pub mod result_panel;
pub mod status_bar;
