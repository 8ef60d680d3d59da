//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod porkchop {
    use std::io::Write;

    use serde::Serialize;
    use slingshot_transfer::{TransferCostReport, TransferRequest};

    /// CSV row emitted for every grid cell. Infeasible cells carry NaN costs.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct Record {
        pub depart_mjd2000: f64,
        pub flyby_mjd2000: f64,
        pub arrive_mjd2000: f64,
        pub tof1_days: f64,
        pub tof2_days: f64,
        pub dv_total_km_s: f64,
        pub dv_depart_km_s: f64,
        pub dv_arrive_km_s: f64,
        pub dv_flyby_powered_km_s: f64,
        pub dv_flyby_unpowered_km_s: f64,
        pub turn_angle_deg: f64,
        pub rp_km: f64,
        pub feasible: bool,
        pub origin_body: &'static str,
        pub flyby_body: &'static str,
        pub dest_body: &'static str,
    }

    impl Record {
        /// Flatten a request/report pair into a row.
        pub fn from_report(request: &TransferRequest, report: &TransferCostReport) -> Self {
            let nan = f64::NAN;
            let (dv_depart, dv_arrive, powered, unpowered, turn_deg, rp_km) =
                match report.diagnostics.as_ref() {
                    Some(d) => (
                        d.delta_v.departure_km_s,
                        d.delta_v.arrival_km_s,
                        d.delta_v.powered_flyby_km_s,
                        d.delta_v.unpowered_flyby_km_s,
                        d.turn_angle_rad.to_degrees(),
                        d.flyby.pericenter_radius_km,
                    ),
                    None => (nan, nan, nan, nan, nan, nan),
                };
            Self {
                depart_mjd2000: request.departure_epoch_mjd2000,
                flyby_mjd2000: request.flyby_epoch_mjd2000,
                arrive_mjd2000: request.arrival_epoch_mjd2000,
                tof1_days: request.flyby_epoch_mjd2000 - request.departure_epoch_mjd2000,
                tof2_days: request.arrival_epoch_mjd2000 - request.flyby_epoch_mjd2000,
                dv_total_km_s: report.total_or_nan(),
                dv_depart_km_s: dv_depart,
                dv_arrive_km_s: dv_arrive,
                dv_flyby_powered_km_s: powered,
                dv_flyby_unpowered_km_s: unpowered,
                turn_angle_deg: turn_deg,
                rp_km,
                feasible: report.is_feasible(),
                origin_body: request.departure_body.name(),
                flyby_body: request.flyby_body.name(),
                dest_body: request.arrival_body.name(),
            }
        }
    }

    /// Streaming CSV writer; the header is emitted with the first record.
    pub struct GridWriter<W: Write> {
        inner: csv::Writer<W>,
    }

    impl<W: Write> GridWriter<W> {
        pub fn new(writer: W) -> Self {
            Self {
                inner: csv::Writer::from_writer(writer),
            }
        }

        pub fn write(&mut self, record: &Record) -> csv::Result<()> {
            self.inner.serialize(record)
        }

        pub fn finish(mut self) -> csv::Result<()> {
            self.inner.flush()?;
            Ok(())
        }
    }
}

pub mod report {
    use std::io::Write;

    use serde::Serialize;
    use slingshot_transfer::{TransferCostReport, TransferRequest};

    #[derive(Serialize)]
    struct ReportSidecar<'a> {
        request: &'a TransferRequest,
        feasible: bool,
        report: &'a TransferCostReport,
    }

    /// Write a pretty-printed JSON document pairing a request with its report.
    pub fn write_json<W: Write>(
        writer: W,
        request: &TransferRequest,
        report: &TransferCostReport,
    ) -> serde_json::Result<()> {
        let sidecar = ReportSidecar {
            request,
            feasible: report.is_feasible(),
            report,
        };
        serde_json::to_writer_pretty(writer, &sidecar)
    }
}
