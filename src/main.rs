use bondtent::api::{
    ScenarioArgs, YearRange, build_compare_response, build_scenario, build_sweep_response,
    run_http_server,
};
use bondtent::logging::init_logging;
use bondtent::report::{bar_chart, window_summary};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bondtent",
    about = "Historical backtest of a bond tent against a fixed stock/bond allocation"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level used when RUST_LOG is unset"
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise every notable historical window
    Report {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Summarise a custom range of retirement start years
    Window {
        #[arg(long)]
        from: u32,
        #[arg(long)]
        to: u32,
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Count bond tent wins against every fixed stock percentage in a range
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, default_value_t = 10)]
        min_stocks: u32,
        #[arg(long, default_value_t = 100)]
        max_stocks: u32,
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON API and chart page
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, help = "Draw a terminal bar chart for each window")]
    chart: bool,
    #[arg(long, default_value_t = 60)]
    chart_width: usize,
    #[arg(long, help = "Print the full comparison as JSON")]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Report { scenario, output } => print_windows(&scenario, None, &output),
        Command::Window {
            from,
            to,
            scenario,
            output,
        } => print_windows(
            &scenario,
            Some(YearRange {
                min_year: from,
                max_year: to,
            }),
            &output,
        ),
        Command::Sweep {
            scenario,
            min_stocks,
            max_stocks,
            json,
        } => print_sweep(&scenario, min_stocks, max_stocks, json),
        Command::Serve { port } => run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_windows(
    args: &ScenarioArgs,
    window: Option<YearRange>,
    output: &OutputArgs,
) -> Result<(), String> {
    let scenario = build_scenario(args)?;
    if let Some(range) = window {
        if range.min_year > range.max_year {
            return Err("--from must be <= --to".to_string());
        }
    }

    let response = build_compare_response(&scenario, window)?;
    if output.json {
        let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", response.headline());
    for report in response.window_reports() {
        println!();
        print!("{}", window_summary(&scenario, report));
        if output.chart {
            println!();
            print!("{}", bar_chart(&scenario, report, output.chart_width));
        }
    }
    Ok(())
}

fn print_sweep(
    args: &ScenarioArgs,
    min_stocks: u32,
    max_stocks: u32,
    json: bool,
) -> Result<(), String> {
    let scenario = build_scenario(args)?;
    let response = build_sweep_response(&scenario, min_stocks, max_stocks)?;
    if json {
        let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }
    for line in response.lines() {
        println!("{line}");
    }
    Ok(())
}
