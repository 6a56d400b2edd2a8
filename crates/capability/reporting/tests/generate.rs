use chrono::NaiveDate;
use domain::{ReportStatus, SessionStatus, SlotStatus, UserContext};
use smartpark_reporting::{ReportingError, ReportingService};
use smartpark_storage::{
    InMemoryPaymentStore, InMemoryReportStore, InMemorySessionStore, InMemorySlotStore,
    PaymentRecord, PaymentStore, SessionRecord, SessionStore, SlotRecord, SlotStore,
};
use std::sync::Arc;

const MARCH_15: i64 = 1_710_460_800_000; // 2024-03-15T00:00:00Z

struct Fixture {
    sessions: Arc<InMemorySessionStore>,
    payments: Arc<InMemoryPaymentStore>,
    slots: Arc<InMemorySlotStore>,
    reports: Arc<InMemoryReportStore>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            payments: Arc::new(InMemoryPaymentStore::new()),
            slots: Arc::new(InMemorySlotStore::new()),
            reports: Arc::new(InMemoryReportStore::new()),
        }
    }

    fn service(&self, allow_regenerate_signed: bool) -> ReportingService {
        ReportingService::new(
            self.sessions.clone(),
            self.payments.clone(),
            self.slots.clone(),
            self.reports.clone(),
            allow_regenerate_signed,
        )
    }

    async fn add_session(&self, record_id: &str, entry_time_ms: i64, duration: Option<i64>) {
        self.sessions
            .create_session(SessionRecord {
                record_id: record_id.into(),
                car_id: format!("car-{record_id}"),
                slot_id: "slot-1".into(),
                entry_time_ms,
                exit_time_ms: duration.map(|minutes| entry_time_ms + minutes * 60_000),
                duration_minutes: duration,
                total_amount: None,
                status: if duration.is_some() {
                    SessionStatus::Completed
                } else {
                    SessionStatus::Active
                },
                notes: None,
                created_at_ms: entry_time_ms,
            })
            .await
            .expect("create session");
    }

    async fn add_payment(&self, payment_id: &str, method: &str, amount: f64, at_ms: i64) {
        self.payments
            .create_payment(PaymentRecord {
                payment_id: payment_id.into(),
                record_id: "rec-1".into(),
                amount_paid: amount,
                payment_method: method.into(),
                payment_date_ms: at_ms,
                created_at_ms: at_ms,
            })
            .await
            .expect("create payment");
    }

    async fn add_slots(&self, count: usize) {
        for index in 0..count {
            self.slots
                .create_slot(SlotRecord {
                    slot_id: format!("slot-{index}"),
                    slot_number: format!("A{index}"),
                    location: "Ground floor".into(),
                    slot_status: SlotStatus::Available,
                    is_active: true,
                    created_at_ms: 0,
                })
                .await
                .expect("create slot");
        }
    }
}

fn ctx() -> UserContext {
    UserContext::new("user-1", "manager", "manager")
}

fn march_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("date")
}

#[tokio::test]
async fn daily_report_matches_reference_scenario() {
    // 2024-03-15：8 点两次、14 点一次进场；现金 3000 + 刷卡 2000
    let fixture = Fixture::new();
    fixture.add_session("rec-1", MARCH_15 + 8 * 3_600_000, Some(60)).await;
    fixture.add_session("rec-2", MARCH_15 + 8 * 3_600_000 + 600_000, Some(90)).await;
    fixture.add_session("rec-3", MARCH_15 + 14 * 3_600_000, None).await;
    fixture.add_payment("pay-1", "cash", 3_000.0, MARCH_15 + 9 * 3_600_000).await;
    fixture.add_payment("pay-2", "card", 2_000.0, MARCH_15 + 15 * 3_600_000).await;
    fixture.add_slots(10).await;

    let service = fixture.service(true);
    let (report, records, summary) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");

    assert_eq!(report.period_key, "2024-03-15");
    assert_eq!(report.status, ReportStatus::Generated);
    assert_eq!(report.generated_by, "user-1");
    assert_eq!(report.data.total_cars_parked, 3);
    assert_eq!(report.data.total_revenue, 5_000.0);
    assert_eq!(report.data.total_duration, 150);
    assert_eq!(report.data.payment_methods.cash, 3_000.0);
    assert_eq!(report.data.payment_methods.mobile_money, 0.0);
    assert_eq!(report.data.payment_methods.card, 2_000.0);
    assert_eq!(report.data.record_ids.len(), 3);

    let peaks = &report.data.peak_hours;
    assert!(peaks.len() <= 5);
    assert_eq!((peaks[0].hour, peaks[0].count), (8, 2));
    assert_eq!((peaks[1].hour, peaks[1].count), (14, 1));

    let utilization = report.data.slot_utilization.as_ref().expect("utilization");
    assert_eq!(utilization.total_slots, 10);
    assert_eq!(utilization.average_occupancy, 10.0); // 1 active / 10 slots
    assert_eq!(utilization.peak_occupancy, 2);

    assert_eq!(records.len(), 3);
    assert_eq!(summary.total_revenue, 5_000.0);
    assert_eq!(summary.peak_hours.len(), 2);
}

#[tokio::test]
async fn daily_window_is_inclusive_at_both_bounds() {
    let fixture = Fixture::new();
    fixture.add_session("first", MARCH_15, Some(10)).await;
    fixture.add_session("last", MARCH_15 + 86_400_000 - 1, Some(10)).await;
    fixture.add_session("next-day", MARCH_15 + 86_400_000, Some(10)).await;
    fixture.add_payment("pay-edge", "cash", 500.0, MARCH_15 + 86_400_000 - 1).await;
    fixture.add_payment("pay-out", "cash", 900.0, MARCH_15 + 86_400_000).await;

    let service = fixture.service(true);
    let (report, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");

    assert_eq!(report.data.total_cars_parked, 2);
    assert_eq!(report.data.total_revenue, 500.0);
}

#[tokio::test]
async fn regeneration_is_idempotent() {
    let fixture = Fixture::new();
    fixture.add_session("rec-1", MARCH_15 + 3_600_000, Some(30)).await;

    let service = fixture.service(true);
    let (first, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");
    let (second, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("regenerate");

    assert_eq!(first.report_id, second.report_id);
    assert_eq!(first.data, second.data);
    assert_eq!(first.created_at_ms, second.created_at_ms);

    let page = service.list_reports(None, 1, 10).await.expect("list");
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn zero_slots_yields_zero_occupancy() {
    let fixture = Fixture::new();
    fixture.add_session("rec-1", MARCH_15 + 3_600_000, None).await;

    let service = fixture.service(true);
    let (report, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");

    let utilization = report.data.slot_utilization.as_ref().expect("utilization");
    assert_eq!(utilization.total_slots, 0);
    assert_eq!(utilization.average_occupancy, 0.0);
}

#[tokio::test]
async fn unknown_payment_method_counts_toward_other() {
    let fixture = Fixture::new();
    fixture.add_payment("pay-1", "cash", 1_000.0, MARCH_15 + 3_600_000).await;
    fixture.add_payment("pay-2", "voucher", 400.0, MARCH_15 + 3_600_000).await;

    let service = fixture.service(true);
    let (report, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");

    let methods = &report.data.payment_methods;
    assert_eq!(methods.other, 400.0);
    assert_eq!(report.data.total_revenue, 1_400.0);
    assert!(methods.cash + methods.mobile_money + methods.card <= report.data.total_revenue);
}

#[tokio::test]
async fn february_2024_has_29_daily_stats_keys() {
    let fixture = Fixture::new();
    // 2024-02-10T12:00:00Z
    fixture.add_session("rec-1", 1_707_566_400_000, Some(45)).await;
    fixture.add_payment("pay-1", "mobile_money", 700.0, 1_707_566_400_000).await;

    let service = fixture.service(true);
    let (report, summary) = service
        .generate_monthly(&ctx(), 2024, 1)
        .await
        .expect("generate");

    assert_eq!(report.period_key, "2024-02");
    let daily_stats = report.data.daily_stats.as_ref().expect("daily stats");
    assert_eq!(daily_stats.len(), 29);
    let day = daily_stats.get("2024-02-10").expect("day");
    assert_eq!(day.cars, 1);
    assert_eq!(day.revenue, 700.0);
    assert_eq!(day.duration, 45);
    let empty = daily_stats.get("2024-02-29").expect("leap day");
    assert_eq!(empty.cars, 0);

    // 摘要只带月末方向的 7 天
    assert_eq!(summary.daily_stats.len(), 7);
    assert_eq!(summary.daily_stats[0].0, "2024-02-23");
    assert_eq!(summary.daily_stats[6].0, "2024-02-29");
    assert!(report.data.slot_utilization.is_none());
    assert!(report.data.peak_hours.is_empty());
}

#[tokio::test]
async fn monthly_rejects_invalid_month_index() {
    let fixture = Fixture::new();
    let service = fixture.service(true);
    let result = service.generate_monthly(&ctx(), 2024, 12).await;
    assert!(matches!(result, Err(ReportingError::Validation(_))));
}

#[tokio::test]
async fn signed_report_regeneration_follows_policy() {
    let fixture = Fixture::new();
    fixture.add_session("rec-1", MARCH_15 + 3_600_000, Some(30)).await;

    // 默认策略：重新生成刷新统计，签名与状态保留
    let service = fixture.service(true);
    let (report, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("generate");
    let signed = service
        .sign_report(&report.report_id, "Jane Doe", "sig-bytes", None)
        .await
        .expect("sign");
    assert_eq!(signed.status, ReportStatus::Signed);

    fixture.add_session("rec-2", MARCH_15 + 7_200_000, Some(15)).await;
    let (refreshed, _, _) = service
        .generate_daily(&ctx(), Some(march_15()))
        .await
        .expect("regenerate");
    assert_eq!(refreshed.report_id, report.report_id);
    assert_eq!(refreshed.status, ReportStatus::Signed);
    assert!(refreshed.signature.is_some());
    assert_eq!(refreshed.data.total_cars_parked, 2);

    // 锁定策略：已签名周期拒绝重新生成，数据保持不变
    let locked = fixture.service(false);
    let result = locked.generate_daily(&ctx(), Some(march_15())).await;
    assert!(matches!(result, Err(ReportingError::SignedLocked)));
    let unchanged = locked.find_report(&report.report_id).await.expect("find");
    assert_eq!(unchanged.data.total_cars_parked, 2);
}
