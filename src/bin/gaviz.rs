use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gaviz::{
    compose::DEFAULT_GOAL,
    pipeline::{
        self, RunOptions, DEFAULT_FUNCTION_INPUT, DEFAULT_RESULTS_INPUT, DEFAULT_TRAJECTORY_INPUT,
    },
};

/// Offline comparison plots for function-approximation and trajectory output
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the PNG files are written to
    #[clap(long, global = true, default_value = ".")]
    output_dir: PathBuf,

    /// Field delimiter of the input table
    #[clap(long, global = true, default_value_t = ',')]
    delimiter: char,

    #[command(subcommand)]
    cmd: ArgCmd,
}

#[derive(Parser, Debug)]
struct CompareCmd {
    /// Table with columns X, Y_target, Y_approx
    #[clap(long, default_value = DEFAULT_FUNCTION_INPUT)]
    input: PathBuf,

    /// Legend label of the target curve
    #[clap(long, default_value = "Target: sin(x) + cos(2.5x)")]
    target_label: String,
}

#[derive(Parser, Debug)]
struct ResultsCmd {
    /// Table with columns x, target, nop_output, error
    #[clap(long, default_value = DEFAULT_RESULTS_INPUT)]
    input: PathBuf,

    /// Legend label of the target curve
    #[clap(long, default_value = "Target Function: sin(x) + 2.5*cos(x)")]
    target_label: String,

    /// Only write the results plot, not the error analysis
    #[clap(long)]
    skip_analysis: bool,
}

#[derive(Parser, Debug)]
struct TrajectoriesCmd {
    /// Table with columns Trajectory, Time, X, Y, Theta
    #[clap(long, default_value = DEFAULT_TRAJECTORY_INPUT)]
    input: PathBuf,

    /// Goal x coordinate
    #[clap(long, default_value_t = DEFAULT_GOAL.0, allow_hyphen_values = true)]
    goal_x: f64,

    /// Goal y coordinate
    #[clap(long, default_value_t = DEFAULT_GOAL.1, allow_hyphen_values = true)]
    goal_y: f64,
}

#[derive(Subcommand, Debug)]
enum ArgCmd {
    /// Plot a target function against its approximation
    Compare(CompareCmd),

    /// Report error metrics and plot optimiser results
    Results(ResultsCmd),

    /// Plot robot trajectories heading for a goal
    Trajectories(TrajectoriesCmd),
}

fn cmd_compare(opt: &CompareCmd, run: &RunOptions) -> gaviz::Result<()> {
    let path = pipeline::function_comparison(&opt.input, &opt.target_label, run)?;
    println!("Plot saved as {}", path.display());
    Ok(())
}

fn cmd_results(opt: &ResultsCmd, run: &RunOptions) -> gaviz::Result<()> {
    let report = pipeline::results(&opt.input, &opt.target_label, !opt.skip_analysis, run)?;

    println!("Data loaded successfully!");
    println!("Shape: ({}, {})", report.rows, report.columns.len());
    println!("Columns: {:?}", report.columns);
    println!();
    println!("=== METRICS ===");
    println!("{}", report.metrics);
    println!();
    for path in &report.outputs {
        println!("Plot saved to {}", path.display());
    }
    Ok(())
}

fn cmd_trajectories(opt: &TrajectoriesCmd, run: &RunOptions) -> gaviz::Result<()> {
    let path = pipeline::trajectories(&opt.input, (opt.goal_x, opt.goal_y), run)?;
    println!("Plot saved as {}", path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = gaviz::logging::init() {
        eprintln!("Logging disabled: {e}");
    }

    let Ok(delimiter) = u8::try_from(args.delimiter) else {
        eprintln!("Error: delimiter must be a single-byte character");
        std::process::exit(1);
    };
    let run = RunOptions {
        output_dir: args.output_dir,
        delimiter,
    };

    let result = match &args.cmd {
        ArgCmd::Compare(opt) => cmd_compare(opt, &run),
        ArgCmd::Results(opt) => cmd_results(opt, &run),
        ArgCmd::Trajectories(opt) => cmd_trajectories(opt, &run),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
