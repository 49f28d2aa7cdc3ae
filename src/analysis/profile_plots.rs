use std::error::Error;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use plotly::{
    color::NamedColor,
    common::{Font, Marker, Orientation, Title},
    layout::{Annotation, Axis, BarMode, GridPattern, Layout, LayoutGrid, Margin},
    Bar, ImageFormat, Plot,
};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use textwrap::wrap;

use crate::analysis::category_counts::{CategoryCounts, SampleCountTable};
use crate::analysis::cog_catalog;
use crate::analysis::proportions::ProportionTable;
use crate::analysis::term_counts::{Term, TermCounts};
use crate::parsers::annotation_parser::AnnotationRecord;

/// Entries shown per panel of the per-sample figure.
pub const PANEL_TOP_N: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotOutput {
    /// Static images via kaleido (PNG, plus PDF and SVG for the comparison
    /// chart).
    Static,
    /// Interactive HTML.
    Interactive,
    /// Skip rendering.
    None,
}

/// The three multi-valued annotation columns rendered as term panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum TermField {
    KeggOrthologs,
    KeggPathways,
    PfamDomains,
}

impl TermField {
    pub fn title(&self) -> &'static str {
        match self {
            TermField::KeggOrthologs => "Top 15 KEGG Orthologs (KO)",
            TermField::KeggPathways => "Top 15 KEGG Pathways",
            TermField::PfamDomains => "Top 15 Pfam Domains",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            TermField::KeggOrthologs => "kegg_orthologs",
            TermField::KeggPathways => "kegg_pathways",
            TermField::PfamDomains => "pfam_domains",
        }
    }

    fn color(&self) -> NamedColor {
        match self {
            TermField::KeggOrthologs => NamedColor::LightGreen,
            TermField::KeggPathways => NamedColor::Salmon,
            TermField::PfamDomains => NamedColor::Plum,
        }
    }

    pub fn cell<'r>(&self, record: &'r AnnotationRecord) -> &'r str {
        match self {
            TermField::KeggOrthologs => &record.kegg_orthologs,
            TermField::KeggPathways => &record.kegg_pathways,
            TermField::PfamDomains => &record.pfam_domains,
        }
    }
}

/// One category's trace of the stacked comparison chart.
#[derive(Debug, Clone, Default)]
pub struct StackedSeries {
    pub label: String,
    pub proportions: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct StackedProfileData {
    pub samples: Vec<String>,
    pub series: Vec<StackedSeries>,
}

/// One horizontal-bar panel of the per-sample figure.
#[derive(Debug, Clone)]
pub struct PanelData {
    pub title: String,
    pub slug: &'static str,
    /// (value, count) pairs, count-descending, ties in first-seen order.
    pub entries: Vec<(Term, u64)>,
    /// Display labels aligned with `entries`.
    pub labels: Vec<String>,
    color: NamedColor,
}

fn wrap_text(text: &str, width: usize) -> String {
    wrap(text, width).join("<br>")
}

fn sanitize_sample(sample: &str) -> String {
    sample.replace(' ', "_")
}

/// Top-N proportion series for the stacked comparison chart.
///
/// Normalization runs over all categories before the top-N restriction, so
/// the stacks show each category's share of the whole sample.
pub fn prepare_stacked_data(table: &SampleCountTable, top_n: usize) -> StackedProfileData {
    let top = table.top_categories(top_n);
    let proportions = ProportionTable::from_counts(table).restrict_to(&top);

    let series = top
        .iter()
        .filter_map(|category| {
            proportions.row(category).map(|row| StackedSeries {
                label: wrap_text(&cog_catalog::label(category), 40),
                proportions: row.to_vec(),
            })
        })
        .collect();

    StackedProfileData {
        samples: table.samples().to_vec(),
        series,
    }
}

/// The four panels of one sample: COG categories plus the three term fields.
pub fn prepare_panel_data(records: &[AnnotationRecord]) -> Vec<PanelData> {
    let mut panels = Vec::with_capacity(4);

    let categories = CategoryCounts::tabulate(records.iter().map(|r| r.category.as_str()));
    let entries = categories.top_n(PANEL_TOP_N);
    panels.push(PanelData {
        title: format!("Top {} COG Categories", PANEL_TOP_N),
        slug: "cog_categories",
        labels: entries
            .iter()
            .map(|(code, _)| wrap_text(&cog_catalog::label(code), 45))
            .collect(),
        entries,
        color: NamedColor::SteelBlue,
    });

    for field in TermField::iter() {
        let terms = TermCounts::tabulate(records.iter().map(|r| field.cell(r)));
        let entries = terms.top_n(PANEL_TOP_N);
        panels.push(PanelData {
            title: field.title().to_string(),
            slug: field.slug(),
            labels: entries.iter().map(|(term, _)| term.to_string()).collect(),
            entries,
            color: field.color(),
        });
    }

    panels
}

/// Render the stacked proportion chart of the comparison pipeline.
///
/// Static output writes PNG, PDF and SVG next to each other; interactive
/// output writes a single HTML file.
pub fn stacked_profile_plot(
    data: &StackedProfileData,
    title: &str,
    prefix: &str,
    plots_dir: &Path,
    output: PlotOutput,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if output == PlotOutput::None || data.series.is_empty() {
        return Ok(());
    }
    fs::create_dir_all(plots_dir)?;

    let mut plot = Plot::new();
    for series in &data.series {
        plot.add_trace(
            Bar::new(data.samples.clone(), series.proportions.clone())
                .name(series.label.as_str()),
        );
    }

    let layout = Layout::new()
        .title(Title::with_text(title.to_string()).font(Font::new().size(16)))
        .width(1600)
        .height(960)
        .bar_mode(BarMode::Stack)
        .margin(Margin::new().left(70).right(40).top(70).bottom(60))
        .x_axis(
            Axis::new()
                .title(Title::with_text("Sample").font(Font::new().size(12)))
                .tick_font(Font::new().size(11))
                .show_line(true)
                .line_color(NamedColor::Black)
                .auto_margin(true),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text("Proportion").font(Font::new().size(12)))
                .tick_font(Font::new().size(10))
                .show_line(true)
                .line_color(NamedColor::Black)
                .show_grid(true)
                .grid_color("rgba(0,0,0,0.05)")
                .auto_margin(true),
        );
    plot.set_layout(layout);

    match output {
        PlotOutput::Static => {
            let base = plots_dir.join(prefix);
            for format in [ImageFormat::PNG, ImageFormat::PDF, ImageFormat::SVG] {
                plot.write_image(&base, format, 1600, 960, 1.0);
            }
        }
        PlotOutput::Interactive => {
            plot.write_html(plots_dir.join(format!("{}.html", prefix)));
        }
        PlotOutput::None => {}
    }

    Ok(())
}

/// Render one sample's 2x2 panel figure.
pub fn panel_plot(
    panels: &[PanelData],
    sample: &str,
    plots_dir: &Path,
    output: PlotOutput,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if output == PlotOutput::None || panels.iter().all(|panel| panel.entries.is_empty()) {
        return Ok(());
    }
    fs::create_dir_all(plots_dir)?;

    // Paper-coordinate anchors of the panel titles, row-major.
    let anchors = [(0.0, 1.02), (0.58, 1.02), (0.0, 0.46), (0.58, 0.46)];

    let mut plot = Plot::new();
    let mut annotations = Vec::with_capacity(panels.len());

    for (index, panel) in panels.iter().enumerate().take(anchors.len()) {
        let suffix = if index == 0 {
            String::new()
        } else {
            (index + 1).to_string()
        };
        let x_name = format!("x{}", suffix);
        let y_name = format!("y{}", suffix);

        // Horizontal bars draw bottom-up, so reverse to put the largest on
        // top.
        let counts: Vec<u64> = panel.entries.iter().rev().map(|(_, count)| *count).collect();
        let labels: Vec<String> = panel.labels.iter().rev().cloned().collect();

        plot.add_trace(
            Bar::new(counts, labels)
                .orientation(Orientation::Horizontal)
                .marker(Marker::new().color(panel.color))
                .x_axis(x_name.as_str())
                .y_axis(y_name.as_str())
                .show_legend(false),
        );

        let (x, y) = anchors[index];
        annotations.push(
            Annotation::new()
                .text(panel.title.as_str())
                .x_ref("paper")
                .y_ref("paper")
                .x(x)
                .y(y)
                .show_arrow(false)
                .font(Font::new().size(13)),
        );
    }

    let count_axis = Axis::new()
        .title(Title::with_text("Count").font(Font::new().size(11)))
        .tick_font(Font::new().size(9))
        .auto_margin(true);
    let label_axis = Axis::new().tick_font(Font::new().size(9)).auto_margin(true);

    let layout = Layout::new()
        .title(
            Title::with_text(format!("Functional Profile of Sample {}", sample))
                .font(Font::new().size(16)),
        )
        .width(1440)
        .height(1150)
        .margin(Margin::new().left(40).right(40).top(90).bottom(40))
        .grid(
            LayoutGrid::new()
                .rows(2)
                .columns(2)
                .pattern(GridPattern::Independent),
        )
        .annotations(annotations)
        .x_axis(count_axis.clone())
        .x_axis2(count_axis.clone())
        .x_axis3(count_axis.clone())
        .x_axis4(count_axis)
        .y_axis(label_axis.clone())
        .y_axis2(label_axis.clone())
        .y_axis3(label_axis.clone())
        .y_axis4(label_axis);
    plot.set_layout(layout);

    let file_stem = format!("Functional_Profile_{}_MultiPanel", sanitize_sample(sample));
    match output {
        PlotOutput::Static => {
            plot.write_image(plots_dir.join(&file_stem), ImageFormat::PNG, 1440, 1150, 1.0);
        }
        PlotOutput::Interactive => {
            plot.write_html(plots_dir.join(format!("{}.html", file_stem)));
        }
        PlotOutput::None => {}
    }

    Ok(())
}

/// File stem shared by a sample's figure and its top-term tables.
pub fn sample_file_stem(sample: &str) -> String {
    sanitize_sample(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::category_counts::CategoryCounts;
    use compact_str::CompactString;

    fn record(category: &str, ko: &str, pathway: &str, pfam: &str) -> AnnotationRecord {
        AnnotationRecord {
            category: CompactString::new(category),
            kegg_orthologs: ko.to_string(),
            kegg_pathways: pathway.to_string(),
            pfam_domains: pfam.to_string(),
        }
    }

    #[test]
    fn stacked_data_has_one_series_per_top_category() {
        let mut table = SampleCountTable::new();
        table.insert_sample("A", &CategoryCounts::tabulate(["C", "C", "K", "E"]));
        table.insert_sample("B", &CategoryCounts::tabulate(["K", "K", "K"]));

        let data = prepare_stacked_data(&table, 2);
        assert_eq!(data.samples, vec!["A", "B"]);
        assert_eq!(data.series.len(), 2);
        assert!(data.series[0].label.starts_with("K: Transcription"));
        assert_eq!(data.series[0].proportions.len(), 2);
    }

    #[test]
    fn stacked_labels_carry_catalog_descriptions() {
        let mut table = SampleCountTable::new();
        table.insert_sample("A", &CategoryCounts::tabulate(["EGP"]));

        let data = prepare_stacked_data(&table, 5);
        assert_eq!(data.series[0].label, "EGP: Multiple");
    }

    #[test]
    fn panel_data_covers_all_four_panels() {
        let records = vec![
            record("C", "ko:K1,ko:K2", "map1", "PF1"),
            record("C", "ko:K1", "-", "PF1, PF2"),
            record("K", "-", "map1,map2", "-"),
        ];

        let panels = prepare_panel_data(&records);
        assert_eq!(panels.len(), 4);

        assert_eq!(panels[0].entries[0], (Term::new("C"), 2));
        assert_eq!(panels[1].entries[0], (Term::new("ko:K1"), 2));
        assert_eq!(panels[2].entries[0], (Term::new("map1"), 2));
        assert_eq!(panels[3].entries[0], (Term::new("PF1"), 2));
        for panel in &panels {
            assert!(panel.entries.len() <= PANEL_TOP_N);
            assert_eq!(panel.entries.len(), panel.labels.len());
        }
    }

    #[test]
    fn panel_entries_are_count_descending() {
        let records = vec![
            record("C", "-", "-", "-"),
            record("C", "-", "-", "-"),
            record("K", "-", "-", "-"),
        ];

        let panels = prepare_panel_data(&records);
        let counts: Vec<u64> = panels[0].entries.iter().map(|(_, count)| *count).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn empty_records_yield_empty_panels() {
        let panels = prepare_panel_data(&[]);
        assert_eq!(panels.len(), 4);
        assert!(panels.iter().all(|panel| panel.entries.is_empty()));
    }

    #[test]
    fn sample_names_sanitize_for_filenames() {
        assert_eq!(sample_file_stem("Well 1"), "Well_1");
    }
}
