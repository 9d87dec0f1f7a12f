use anyhow::Context;
use clap::Parser;
use gr_common::db::core::{CapacityGrid, NetList, RouteSolution};
use gr_common::db::parser::{cap, net, route};
use gr_common::util::config::Config;
use gr_common::util::logger;
use gr_common::util::profiler::ScopedTimer;
use gr_evaluator::{Analysis, report, run_checks};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Scores a 2-layer global routing solution against its capacity grid.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Request congestion renders.
    #[arg(long)]
    plot: bool,

    /// Capacity grid (.cap)
    cap: PathBuf,

    /// Net list (.net)
    net: PathBuf,

    /// Routing solution (.route)
    route: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    for path in [&args.cap, &args.net, &args.route] {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
    }

    let config = load_config(&args.config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_banner(&mut out, &args)?;

    writeln!(out, "[1/5] Parsing input files...")?;
    let (grid, nets, routes) = parse_inputs(&args)?;
    writeln!(
        out,
        "  Grid: {} x {}, {} layers (via cost {})",
        grid.x_size,
        grid.y_size,
        grid.num_layers(),
        grid.unit_via_cost
    )?;
    for layer in &grid.layers {
        writeln!(out, "    Layer {} ({}): {}", layer.index.index(), layer.name, layer.direction)?;
    }
    writeln!(out, "  Nets: {}", nets.num_nets())?;
    writeln!(
        out,
        "  Routed nets: {} ({} segments)",
        routes.nets.len(),
        routes.total_segments()
    )?;
    writeln!(out)?;

    let analysis = {
        let _timer = ScopedTimer::new("Checks and evaluation");
        run_checks(&grid, &nets, &routes, &config)
    };

    print_analysis(&mut out, &analysis, &config, args.plot)?;
    out.flush()?;

    if !analysis.passed() {
        log::error!("\x1b[31mFAIL\x1b[0m: routing solution rejected");
        std::process::exit(1);
    }
    log::info!("\x1b[32mPASS\x1b[0m: routing solution accepted");
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        log::warn!("Configuration file {:?} not found. Using internal defaults.", path);
        return Ok(Config::default());
    }
    log::info!("Loading configuration from {:?}", path);
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config TOML {:?}", path))
}

fn parse_inputs(args: &Args) -> anyhow::Result<(CapacityGrid, NetList, RouteSolution)> {
    let _timer = ScopedTimer::new("Parsing");

    log::info!("Parsing capacity grid: {:?}", args.cap);
    let grid = cap::parse(&args.cap)
        .with_context(|| format!("Invalid .cap syntax in {:?}", args.cap))?;

    log::info!("Parsing net list: {:?}", args.net);
    let nets = net::parse(&args.net)
        .with_context(|| format!("Invalid .net syntax in {:?}", args.net))?;

    log::info!("Parsing routing solution: {:?}", args.route);
    let routes = route::parse(&args.route)
        .with_context(|| format!("Invalid .route syntax in {:?}", args.route))?;

    Ok((grid, nets, routes))
}

fn print_banner<W: Write>(out: &mut W, args: &Args) -> io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "{}", rule)?;
    writeln!(out, "Global Routing Evaluation")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Capacity: {}", args.cap.display())?;
    writeln!(out, "Nets:     {}", args.net.display())?;
    writeln!(out, "Route:    {}", args.route.display())?;
    writeln!(out)
}

fn print_analysis<W: Write>(
    out: &mut W,
    analysis: &Analysis,
    config: &Config,
    plot: bool,
) -> io::Result<()> {
    writeln!(out, "[2/5] Checking route validity...")?;
    report::write_validity(out, &analysis.validity, config.report.max_errors_per_net)?;
    writeln!(out)?;

    writeln!(out, "[3/5] Checking connectivity...")?;
    report::write_connectivity(out, &analysis.connectivity)?;
    writeln!(out)?;

    writeln!(out, "[4/5] Evaluating routing quality...")?;
    report::write_evaluation(out, &analysis.evaluation, config.report.layer_breakdown)?;
    writeln!(out)?;

    writeln!(out, "[5/5] Rendering congestion maps...")?;
    if plot {
        writeln!(out, "  Renders skipped: no renderer is available in this build.")?;
    } else {
        writeln!(out, "  Renders skipped (pass --plot to request them).")?;
    }
    writeln!(out)?;

    let verdict = if analysis.passed() { "PASSED" } else { "FAILED" };
    writeln!(out, "Result: {}", verdict)
}
