use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

use funcprof::analysis::profile_plots::{
    panel_plot, prepare_panel_data, sample_file_stem, PlotOutput,
};
use funcprof::analysis::write_results::write_top_terms;
use funcprof::parsers::annotation_parser::{read_annotations, AnnotationSchema};
use funcprof::parsers::manifest_parser::read_manifest;

#[derive(Parser, Debug)]
#[command(
    name = "annotation-panels",
    about = "Per-sample panels of top functional annotations",
    version
)]
struct CliArgs {
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Tab-separated manifest with a `file` and a `sample` column, one annotation table per row.",
        required = true
    )]
    manifest: PathBuf,

    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIRECTORY",
        help = "Directory to write the figures and tables.",
        default_value = "figures"
    )]
    output_dir: PathBuf,

    #[arg(
        long = "category-column",
        value_name = "INDEX",
        help = "Zero-based index of the category column.",
        default_value_t = 6
    )]
    category_column: usize,

    #[arg(
        long = "ko-column",
        value_name = "INDEX",
        help = "Zero-based index of the KEGG ortholog column.",
        default_value_t = 11
    )]
    ko_column: usize,

    #[arg(
        long = "pathway-column",
        value_name = "INDEX",
        help = "Zero-based index of the KEGG pathway column.",
        default_value_t = 12
    )]
    pathway_column: usize,

    #[arg(
        long = "pfam-column",
        value_name = "INDEX",
        help = "Zero-based index of the Pfam domain column.",
        default_value_t = 20
    )]
    pfam_column: usize,

    #[arg(
        long = "skip-tables",
        help = "Do not write the top-term tables next to the figures."
    )]
    skip_tables: bool,

    #[arg(
        long = "save-plots",
        value_enum,
        help = "How to save the panel figures.",
        default_value_t = PlotOutput::Static
    )]
    save_plots: PlotOutput,

    #[arg(
        long = "cores",
        value_name = "NUMBER",
        help = "Number of cores used to process samples. Uses all available by default.",
        default_value_t = num_cpus::get()
    )]
    num_cores: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli_args = CliArgs::parse();

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(cli_args.num_cores)
        .build_global()
    {
        eprintln!("Failed to initialize Rayon global thread pool: {:?}", e);
    }

    let manifest = match read_manifest(&cli_args.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("\nError reading manifest '{}':", cli_args.manifest.display());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let schema = AnnotationSchema {
        category: cli_args.category_column,
        kegg_orthologs: cli_args.ko_column,
        kegg_pathways: cli_args.pathway_column,
        pfam_domains: cli_args.pfam_column,
    };

    println!("\nRendering annotation panels for {} sample(s)", manifest.len());

    let outcome = manifest.par_iter().try_for_each(|entry| -> Result<(), String> {
        let records = read_annotations(&entry.file, &schema).map_err(|e| {
            format!(
                "Error reading annotation table '{}': {}",
                entry.file.display(),
                e
            )
        })?;

        if records.is_empty() {
            println!("Sample {} has no annotation rows; skipping", entry.sample);
            return Ok(());
        }

        let panels = prepare_panel_data(&records);

        if !cli_args.skip_tables {
            for panel in &panels {
                let file_stem = format!("{}_{}", sample_file_stem(&entry.sample), panel.slug);
                write_top_terms(&panel.entries, &cli_args.output_dir, &file_stem).map_err(|e| {
                    format!(
                        "Error writing top-term table for sample {}: {}",
                        entry.sample, e
                    )
                })?;
            }
        }

        if cli_args.save_plots != PlotOutput::None {
            panel_plot(&panels, &entry.sample, &cli_args.output_dir, cli_args.save_plots)
                .map_err(|e| {
                    format!("Error rendering panels for sample {}: {}", entry.sample, e)
                })?;
            println!("Saved panels for sample {}", entry.sample);
        }

        Ok(())
    });

    match outcome {
        Ok(()) => {
            println!("Finished annotation panels\n");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("\n{}", message);
            ExitCode::FAILURE
        }
    }
}
