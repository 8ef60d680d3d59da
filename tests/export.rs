use slingshot::ephem::Body;
use slingshot::export::porkchop::{GridWriter, Record};
use slingshot::export::report::write_json;
use slingshot::transfer::{DetailLevel, TransferCostEvaluator, TransferCostReport, TransferRequest};

fn request(epochs: [f64; 3]) -> TransferRequest {
    TransferRequest::new([Body::Earth, Body::Mars, Body::Jupiter], epochs, DetailLevel::Full)
}

#[test]
fn infeasible_rows_carry_nan_costs() {
    let req = request([1_500.0, 1_400.0, 2_000.0]);
    let record = Record::from_report(&req, &TransferCostReport::infeasible());
    assert!(!record.feasible);
    assert!(record.dv_total_km_s.is_nan());
    assert!(record.rp_km.is_nan());
    assert!((record.tof1_days + 100.0).abs() < 1e-12);
    assert_eq!(record.flyby_body, "MARS");
}

#[test]
fn grid_writer_emits_header_and_rows() {
    let evaluator = TransferCostEvaluator::default();
    let mut buffer = Vec::new();
    {
        let mut writer = GridWriter::new(&mut buffer);
        for epochs in [[1_200.0, 1_400.0, 2_200.0], [1_500.0, 1_400.0, 2_000.0]] {
            let req = request(epochs);
            let report = evaluator.evaluate(&req);
            writer.write(&Record::from_report(&req, &report)).expect("row");
        }
        writer.finish().expect("flush");
    }

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "depart_mjd2000");
    assert!(headers.iter().any(|h| h == "dv_flyby_powered_km_s"));
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 2);
    let feasible = headers.iter().position(|h| h == "feasible").expect("column");
    assert_eq!(&rows[1][feasible], "false");
    let total = headers.iter().position(|h| h == "dv_total_km_s").expect("column");
    assert_eq!(&rows[1][total], "NaN");
}

#[test]
fn json_report_pairs_request_and_result() {
    let req = request([1_500.0, 1_400.0, 2_000.0]);
    let mut buffer = Vec::new();
    write_json(&mut buffer, &req, &TransferCostReport::infeasible()).expect("json");
    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse");
    assert_eq!(value["feasible"], serde_json::Value::Bool(false));
    assert!(value["report"]["total_delta_v_km_s"].is_null());
    assert_eq!(value["request"]["flyby_body"], "mars");
}
