use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use slingshot::export::report::write_json;
use slingshot::export::writer_for_path;
use slingshot::transfer::{DetailLevel, TransferCostReport, TransferRequest};
use slingshot_cli::epoch::{format_mjd2000, parse_epoch};
use slingshot_cli::{build_evaluator, init_tracing, load_catalog, load_solver, resolve_body};

/// Evaluate a single departure → flyby → arrival transfer and print its cost breakdown.
#[derive(Parser, Debug)]
#[command(author, version, about = "Powered gravity-assist transfer cost")]
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

    /// Departure epoch (MJD2000 days or YYYY-MM-DD[THH:MM:SS])
    #[arg(long)]
    depart: String,

    /// Flyby epoch
    #[arg(long)]
    flyby: String,

    /// Arrival epoch
    #[arg(long)]
    arrive: String,

    /// Minimum flyby altitude in km (defaults to the catalog value, or 0 without a catalog)
    #[arg(long)]
    min_altitude: Option<f64>,

    /// Body catalog (TOML directory or YAML file)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Solver settings (TOML or YAML)
    #[arg(long)]
    solver_config: Option<PathBuf>,

    /// Also write the full report as JSON (use '-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

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

    let epochs = [
        parse_epoch(&cli.depart)?,
        parse_epoch(&cli.flyby)?,
        parse_epoch(&cli.arrive)?,
    ];
    let mut request = TransferRequest::new(
        [origin.body, flyby.body, destination.body],
        epochs,
        DetailLevel::Full,
    )
    .with_min_radius(min_radius);
    request.flyby_mu_km3_s2 = flyby.mu_km3_s2;
    request.central_mu_km3_s2 = solver.central_mu_km3_s2;

    let evaluator = build_evaluator(&solver);
    let report = match evaluator.try_evaluate(&request) {
        Ok(report) => {
            print_breakdown(&request, &report);
            report
        }
        Err(err) => {
            println!(
                "{} -> {} -> {}: infeasible ({err})",
                request.departure_body, request.flyby_body, request.arrival_body
            );
            TransferCostReport::infeasible()
        }
    };

    if let Some(path) = cli.json.as_ref() {
        let mut writer = writer_for_path(path)?;
        write_json(&mut writer, &request, &report)?;
        writeln!(writer)?;
        writer.flush()?;
    }

    Ok(())
}

fn print_breakdown(request: &TransferRequest, report: &TransferCostReport) {
    println!("{} -> {} -> {}", request.departure_body, request.flyby_body, request.arrival_body);
    println!(
        "  depart {}  flyby {}  arrive {}",
        format_mjd2000(request.departure_epoch_mjd2000),
        format_mjd2000(request.flyby_epoch_mjd2000),
        format_mjd2000(request.arrival_epoch_mjd2000),
    );
    if let Some(diag) = report.diagnostics.as_ref() {
        let dv = &diag.delta_v;
        println!("  departure dv      {:>10.4} km/s", dv.departure_km_s);
        println!("  arrival dv        {:>10.4} km/s", dv.arrival_km_s);
        println!("  powered flyby dv  {:>10.4} km/s", dv.powered_flyby_km_s);
        println!("  unpowered dv-inf  {:>10.4} km/s", dv.unpowered_flyby_km_s);
        println!("  turn angle        {:>10.4} deg", diag.turn_angle_rad.to_degrees());
        println!("  pericenter        {:>10.1} km", diag.flyby.pericenter_radius_km);
        println!(
            "  flyby plane i/Ω/ω {:.3}/{:.3}/{:.3} deg",
            diag.flyby.plane.inclination_rad.to_degrees(),
            diag.flyby.plane.raan_rad.to_degrees(),
            diag.flyby.plane.arg_periapsis_rad.to_degrees(),
        );
    }
    println!("  total             {:>10.4} km/s", report.total_or_nan());
}
