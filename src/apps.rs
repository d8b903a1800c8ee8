use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::BenchmarkConfig;
use crate::report::{PotemkinReport, ReportView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Domain,
    Model,
    Task,
    Conditioned,
    Overall,
    Counts,
    All,
}

impl ViewArg {
    fn views(self) -> Vec<ReportView> {
        match self {
            ViewArg::Domain => vec![ReportView::Domain],
            ViewArg::Model => vec![ReportView::Model],
            ViewArg::Task => vec![ReportView::Task],
            ViewArg::Conditioned => vec![ReportView::Conditioned],
            ViewArg::Overall => vec![ReportView::Overall],
            ViewArg::Counts => vec![ReportView::Counts],
            ViewArg::All => vec![
                ReportView::Counts,
                ReportView::Domain,
                ReportView::Model,
                ReportView::Task,
                ReportView::Conditioned,
                ReportView::Overall,
            ],
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "potemkin_rates",
    disable_help_subcommand = true,
    about = "Potemkin rates over a benchmark result tree",
    long_about = "Read Define, Classify, Generate and Edit results from a benchmark tree and print grouped and keystone-conditioned rates.",
    after_help = "Label sets and model aliases come from --config when given, otherwise the built-in catalog is used."
)]
struct ReportCli {
    #[arg(long, value_name = "PATH", help = "Benchmark tree root (overrides the config root)")]
    root: Option<PathBuf>,
    #[arg(long, value_name = "JSON", help = "Optional JSON config with layout and catalog overrides")]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "all", help = "Report view to print")]
    view: ViewArg,
}

/// Parse `args_iter` (without the program name), run the report, print it.
pub fn run_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<ReportCli, _>(std::iter::once("potemkin_rates".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let output = render_report(&cli)?;
    print!("{output}");
    Ok(())
}

fn load_config(cli: &ReportCli) -> Result<BenchmarkConfig, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => BenchmarkConfig::from_json_path(path)?,
        None => BenchmarkConfig::default(),
    };
    Ok(match &cli.root {
        Some(root) => config.with_root(root),
        None => config,
    })
}

fn render_report(cli: &ReportCli) -> Result<String, Box<dyn Error>> {
    let config = load_config(cli)?;
    let report = PotemkinReport::from_config(&config);
    let mut out = String::new();
    for view in cli.view.views() {
        report.render_view(view, &mut out)?;
    }
    Ok(out)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
