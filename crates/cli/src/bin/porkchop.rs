use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use slingshot::export::porkchop::{GridWriter, Record};
use slingshot::export::writer_for_path;
use slingshot::transfer::{DetailLevel, TransferRequest};
use slingshot_cli::epoch::{format_mjd2000, parse_epoch};
use slingshot_cli::{build_evaluator, init_tracing, load_catalog, load_solver, resolve_body};
use tracing::info;

/// Sweep departure epoch and both legs' times of flight, writing one CSV row per cell.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Gravity-assist porkchop CSV generator (powered flyby, patched conics)"
)]
struct Cli {
    /// Departure body name or id
    #[arg(long)]
    from: String,

    /// Flyby body name or id
    #[arg(long)]
    via: String,

    /// Arrival body name or id
    #[arg(long)]
    to: String,

    /// Departure window start (MJD2000 days or YYYY-MM-DD)
    #[arg(long)]
    depart_start: String,

    /// Departure window end (MJD2000 days or YYYY-MM-DD)
    #[arg(long)]
    depart_end: String,

    /// Departure grid step in days
    #[arg(long, default_value_t = 10.0)]
    step_days: f64,

    #[arg(long, default_value_t = 100.0)]
    tof1_min: f64,
    #[arg(long, default_value_t = 400.0)]
    tof1_max: f64,
    #[arg(long, default_value_t = 20.0)]
    tof1_step: f64,

    #[arg(long, default_value_t = 300.0)]
    tof2_min: f64,
    #[arg(long, default_value_t = 1500.0)]
    tof2_max: f64,
    #[arg(long, default_value_t = 50.0)]
    tof2_step: f64,

    /// Minimum flyby altitude in km (defaults to the catalog value, or 0 without a catalog)
    #[arg(long)]
    min_altitude: Option<f64>,

    /// Body catalog (TOML directory or YAML file)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Solver settings (TOML or YAML)
    #[arg(long)]
    solver_config: Option<PathBuf>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/porkchop.csv")]
    output: PathBuf,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = load_catalog(cli.catalog.as_deref())?;
    let solver = load_solver(cli.solver_config.as_deref())?;
    let origin = resolve_body(catalog.as_deref(), &cli.from)?;
    let flyby = resolve_body(catalog.as_deref(), &cli.via)?;
    let destination = resolve_body(catalog.as_deref(), &cli.to)?;

    let min_radius = flyby.min_radius_km(cli.min_altitude, catalog.is_some());

    let depart_start = parse_epoch(&cli.depart_start)?;
    let depart_end = parse_epoch(&cli.depart_end)?;
    if depart_end < depart_start {
        bail!("departure window end must not precede start");
    }
    let departures = day_range(depart_start, depart_end, cli.step_days)?;
    let tof1s = day_range(cli.tof1_min, cli.tof1_max, cli.tof1_step)?;
    let tof2s = day_range(cli.tof2_min, cli.tof2_max, cli.tof2_step)?;

    let evaluator = build_evaluator(&solver);
    let mut base = TransferRequest::new(
        [origin.body, flyby.body, destination.body],
        [depart_start, depart_start, depart_start],
        DetailLevel::Full,
    )
    .with_min_radius(min_radius);
    base.flyby_mu_km3_s2 = flyby.mu_km3_s2;
    base.central_mu_km3_s2 = solver.central_mu_km3_s2;

    info!(
        cells = departures.len() * tof1s.len() * tof2s.len(),
        min_radius_km = min_radius,
        "starting sweep"
    );

    let mut writer = GridWriter::new(writer_for_path(&cli.output)?);
    let mut best: Option<(f64, TransferRequest)> = None;
    let mut feasible = 0usize;
    let mut total = 0usize;

    for &depart in &departures {
        for &tof1 in &tof1s {
            for &tof2 in &tof2s {
                let request = base.with_epochs([depart, depart + tof1, depart + tof1 + tof2]);
                let report = evaluator.evaluate(&request);
                writer.write(&Record::from_report(&request, &report))?;
                total += 1;
                if let Some(dv) = report.total_delta_v_km_s {
                    feasible += 1;
                    if best.as_ref().map(|(b, _)| dv < *b).unwrap_or(true) {
                        best = Some((dv, request));
                    }
                }
            }
        }
    }
    writer.finish()?;

    eprintln!("{feasible}/{total} cells feasible");
    match best {
        Some((dv, request)) => eprintln!(
            "best: {dv:.4} km/s  depart {}  flyby {}  arrive {}",
            format_mjd2000(request.departure_epoch_mjd2000),
            format_mjd2000(request.flyby_epoch_mjd2000),
            format_mjd2000(request.arrival_epoch_mjd2000),
        ),
        None => eprintln!("no feasible transfer in the grid"),
    }

    Ok(())
}

/// Inclusive grid from `start` to `end`; a zero-width range yields one sample.
fn day_range(start: f64, end: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    if !(step > 0.0) || !start.is_finite() || !end.is_finite() {
        return Err(anyhow!("invalid grid {start}..{end} step {step}"));
    }
    if end < start {
        bail!("grid end {end} precedes start {start}");
    }
    let count = ((end - start) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
