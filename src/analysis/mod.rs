pub mod category_counts;
pub mod cog_catalog;
pub mod profile_plots;
pub mod proportions;
pub mod term_counts;
pub mod write_results;
