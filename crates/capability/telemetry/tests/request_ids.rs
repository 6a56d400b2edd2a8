use smartpark_telemetry::{metrics, new_request_ids, record_report_generated};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn report_counter_increments() {
    let before = metrics().snapshot().reports_generated;
    record_report_generated();
    let after = metrics().snapshot().reports_generated;
    assert_eq!(after, before + 1);
}
