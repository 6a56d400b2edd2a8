use domain::{
    PaymentMethodTotals, PeakHour, ReportData, ReportStatus, ReportType, SlotUtilization,
};
use smartpark_reporting::{RenderRecord, ReportingError, ReportingService, render_report};
use smartpark_storage::{
    InMemoryPaymentStore, InMemoryReportStore, InMemorySessionStore, InMemorySlotStore,
    ReportRecord, ReportStore,
};
use std::sync::Arc;

const MARCH_15: i64 = 1_710_460_800_000;

fn service(reports: Arc<InMemoryReportStore>) -> ReportingService {
    ReportingService::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(InMemoryPaymentStore::new()),
        Arc::new(InMemorySlotStore::new()),
        reports,
        true,
    )
}

fn stored_report(report_id: &str, report_type: ReportType) -> ReportRecord {
    ReportRecord {
        report_id: report_id.into(),
        report_type,
        report_date_ms: MARCH_15,
        period_key: "2024-03-15".into(),
        start_ms: MARCH_15,
        end_ms: MARCH_15 + 86_400_000 - 1,
        generated_by: "user-1".into(),
        data: ReportData {
            total_cars_parked: 3,
            total_revenue: 5_000.0,
            total_duration: 150,
            payment_methods: PaymentMethodTotals {
                cash: 3_000.0,
                mobile_money: 0.0,
                card: 2_000.0,
                other: 0.0,
            },
            slot_utilization: Some(SlotUtilization {
                total_slots: 10,
                average_occupancy: 10.0,
                peak_occupancy: 2,
            }),
            peak_hours: vec![
                PeakHour { hour: 8, count: 2 },
                PeakHour { hour: 14, count: 1 },
            ],
            daily_stats: None,
            record_ids: vec!["rec-1".into(), "rec-2".into(), "rec-3".into()],
        },
        signature: None,
        status: ReportStatus::Generated,
        notes: None,
        created_at_ms: MARCH_15,
        updated_at_ms: MARCH_15,
    }
}

#[tokio::test]
async fn sign_sets_signature_and_status() {
    let reports = Arc::new(InMemoryReportStore::new());
    reports
        .create_report(stored_report("rep-1", ReportType::Daily))
        .await
        .expect("create");
    let service = service(reports);

    let signed = service
        .sign_report("rep-1", "Jane Doe", "data:image/png;base64,xyz", None)
        .await
        .expect("sign");
    let signature = signed.signature.as_ref().expect("signature");
    assert_eq!(signature.signed_by, "Jane Doe");
    assert_eq!(signature.position, "Manager");
    assert_eq!(signed.status, ReportStatus::Signed);

    // 重复签名整体覆盖
    let resigned = service
        .sign_report("rep-1", "John Smith", "sig-2", Some("Director"))
        .await
        .expect("resign");
    let signature = resigned.signature.as_ref().expect("signature");
    assert_eq!(signature.signed_by, "John Smith");
    assert_eq!(signature.position, "Director");
}

#[tokio::test]
async fn sign_validation_leaves_report_untouched() {
    let reports = Arc::new(InMemoryReportStore::new());
    reports
        .create_report(stored_report("rep-1", ReportType::Daily))
        .await
        .expect("create");
    let service = service(reports);

    let blank_name = service.sign_report("rep-1", "  ", "sig", None).await;
    assert!(matches!(blank_name, Err(ReportingError::Validation(_))));
    let blank_data = service.sign_report("rep-1", "Jane", "", None).await;
    assert!(matches!(blank_data, Err(ReportingError::Validation(_))));

    let untouched = service.find_report("rep-1").await.expect("find");
    assert_eq!(untouched.status, ReportStatus::Generated);
    assert!(untouched.signature.is_none());
}

#[tokio::test]
async fn sign_unknown_report_is_not_found() {
    let service = service(Arc::new(InMemoryReportStore::new()));
    let result = service.sign_report("ghost", "Jane", "sig", None).await;
    assert!(matches!(result, Err(ReportingError::NotFound)));
}

#[tokio::test]
async fn download_builds_attachment_filename() {
    let reports = Arc::new(InMemoryReportStore::new());
    reports
        .create_report(stored_report("rep-1", ReportType::Daily))
        .await
        .expect("create");
    let service = service(reports);

    let (report, filename) = service.download_report("rep-1").await.expect("download");
    assert_eq!(report.report_id, "rep-1");
    assert_eq!(filename, "daily-report-2024-03-15.json");

    let missing = service.download_report("ghost").await;
    assert!(matches!(missing, Err(ReportingError::NotFound)));
}

#[test]
fn render_daily_report_with_records() {
    let report = stored_report("rep-1", ReportType::Daily);
    let records = vec![
        RenderRecord {
            plate_number: "RAD123A".into(),
            driver_name: "Alice".into(),
            entry_time_ms: MARCH_15 + 8 * 3_600_000,
            duration_minutes: Some(120),
            slot_number: "A1".into(),
        },
        RenderRecord {
            plate_number: "RAE456B".into(),
            driver_name: "Bob".into(),
            entry_time_ms: MARCH_15 + 14 * 3_600_000,
            duration_minutes: None,
            slot_number: "A2".into(),
        },
    ];

    let html = render_report(&report, "manager", &records, MARCH_15);
    assert!(html.contains("Daily Activity Report"));
    assert!(html.contains("March 15, 2024"));
    assert!(html.contains("5,000 RWF"));
    assert!(html.contains("60.0%")); // 现金占比
    assert!(html.contains("8:00 - 9:00"));
    assert!(html.contains("RAD123A"));
    assert!(html.contains("Active")); // 未结束的会话
    assert!(html.contains("2 hrs"));
    // 未签名：渲染空白签名框
    assert!(html.contains("Name: ________________"));
}

#[test]
fn render_handles_zero_revenue_and_signature() {
    let mut report = stored_report("rep-1", ReportType::Monthly);
    report.data.total_revenue = 0.0;
    report.data.payment_methods = PaymentMethodTotals::default();
    report.data.peak_hours.clear();
    report.signature = Some(domain::SignatureBlock {
        signed_by: "Jane Doe".into(),
        signed_at_ms: MARCH_15,
        signature_data: "sig".into(),
        position: "Manager".into(),
    });

    let html = render_report(&report, "manager", &[], MARCH_15);
    assert!(html.contains("Monthly Activity Report"));
    // 零营收不得出现除零
    assert!(html.contains("<td>0%</td>"));
    assert!(!html.contains("NaN"));
    assert!(!html.contains("Peak Hours"));
    assert!(html.contains("Approved By:"));
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("[Digital Signature]"));
}

#[test]
fn render_escapes_untrusted_text() {
    let report = stored_report("rep-1", ReportType::Daily);
    let records = vec![RenderRecord {
        plate_number: "<script>x</script>".into(),
        driver_name: "Eve".into(),
        entry_time_ms: MARCH_15,
        duration_minutes: Some(60),
        slot_number: "A1".into(),
    }];
    let html = render_report(&report, "manager", &records, MARCH_15);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}
