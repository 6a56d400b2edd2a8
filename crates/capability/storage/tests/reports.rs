use domain::{ReportData, ReportStatus, ReportType};
use smartpark_storage::{InMemoryReportStore, ReportRecord, ReportStore};

fn report(report_id: &str, report_type: ReportType, period_key: &str, date_ms: i64) -> ReportRecord {
    ReportRecord {
        report_id: report_id.into(),
        report_type,
        report_date_ms: date_ms,
        period_key: period_key.into(),
        start_ms: date_ms,
        end_ms: date_ms + 86_400_000 - 1,
        generated_by: "user-1".into(),
        data: ReportData::default(),
        signature: None,
        status: ReportStatus::Generated,
        notes: None,
        created_at_ms: date_ms,
        updated_at_ms: date_ms,
    }
}

#[tokio::test]
async fn duplicate_period_is_rejected() {
    let store = InMemoryReportStore::new();
    store
        .create_report(report("rep-1", ReportType::Daily, "2024-03-15", 1_710_460_800_000))
        .await
        .expect("create");

    let duplicate = store
        .create_report(report("rep-2", ReportType::Daily, "2024-03-15", 1_710_460_800_000))
        .await;
    assert!(duplicate.is_err());

    // 同周期键、不同类型是两份报表
    store
        .create_report(report("rep-3", ReportType::Monthly, "2024-03-15", 1_710_460_800_000))
        .await
        .expect("create");
}

#[tokio::test]
async fn find_by_period_and_overwrite() {
    let store = InMemoryReportStore::new();
    store
        .create_report(report("rep-1", ReportType::Monthly, "2024-02", 1_706_745_600_000))
        .await
        .expect("create");

    let found = store
        .find_by_period(ReportType::Monthly, "2024-02")
        .await
        .expect("query")
        .expect("report");
    assert_eq!(found.report_id, "rep-1");

    let mut regenerated = found.clone();
    regenerated.status = ReportStatus::Signed;
    regenerated.updated_at_ms = found.updated_at_ms + 1;
    let updated = store
        .update_report(regenerated)
        .await
        .expect("query")
        .expect("report");
    assert_eq!(updated.status, ReportStatus::Signed);

    let missing = store
        .update_report(report("rep-9", ReportType::Daily, "2024-01-01", 0))
        .await
        .expect("query");
    assert!(missing.is_none());
}

#[tokio::test]
async fn list_is_date_descending_with_type_filter() {
    let store = InMemoryReportStore::new();
    store
        .create_report(report("rep-1", ReportType::Daily, "2024-03-14", 1_710_374_400_000))
        .await
        .expect("create");
    store
        .create_report(report("rep-2", ReportType::Daily, "2024-03-15", 1_710_460_800_000))
        .await
        .expect("create");
    store
        .create_report(report("rep-3", ReportType::Monthly, "2024-03", 1_709_251_200_000))
        .await
        .expect("create");

    let all = store.list_reports(None, 0, 10).await.expect("query");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].report_id, "rep-2");
    assert_eq!(all[1].report_id, "rep-1");

    let daily = store.list_reports(Some(ReportType::Daily), 0, 10).await.expect("query");
    assert_eq!(daily.len(), 2);
    assert_eq!(store.count_reports(Some(ReportType::Monthly)).await.expect("count"), 1);

    let page = store.list_reports(None, 1, 1).await.expect("query");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].report_id, "rep-1");
}
