pub mod insider;
pub mod options;
pub mod portfolio_risk;
pub mod sector_heatmap;
