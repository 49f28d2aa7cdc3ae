//! Functional-annotation profiling for eggNOG-mapper output tables.
//!
//! Two pipelines share this library:
//!
//! - `cog-compare` merges the COG category column of several samples into a
//!   category x sample count table and renders a stacked proportion chart.
//! - `annotation-panels` tabulates the top categories, KEGG orthologs, KEGG
//!   pathways and Pfam domains of each sample and renders a 2x2 bar panel.

pub mod analysis;
pub mod error;
pub mod parsers;
