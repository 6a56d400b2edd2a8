//! 报表统计计算（纯函数）。
//!
//! 输入为窗口内取出的停车会话与支付记录，输出 ReportData 统计块。
//! 日报填充高峰时段与车位利用率；月报填充逐日统计。

use crate::window;
use domain::{
    DayStat, PaymentMethodTotals, PeakHour, ReportData, SessionStatus, SlotUtilization,
    payment_methods,
};
use smartpark_storage::{PaymentRecord, SessionRecord};
use std::collections::BTreeMap;

/// 支付方式分桶。未识别的方式计入 other，保证分桶合计与总营收一致。
fn payment_totals(payments: &[PaymentRecord]) -> PaymentMethodTotals {
    let mut totals = PaymentMethodTotals::default();
    for payment in payments {
        match payment.payment_method.as_str() {
            payment_methods::CASH => totals.cash += payment.amount_paid,
            payment_methods::MOBILE_MONEY => totals.mobile_money += payment.amount_paid,
            payment_methods::CARD => totals.card += payment.amount_paid,
            _ => totals.other += payment.amount_paid,
        }
    }
    totals
}

/// 按进场小时分组（0-23，键升序）。
fn hourly_counts(sessions: &[SessionRecord]) -> BTreeMap<u32, u64> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for session in sessions {
        *counts.entry(window::hour_of_ms(session.entry_time_ms)).or_insert(0) += 1;
    }
    counts
}

/// 高峰时段：按进场数降序取前 5；同数时小时小的在前（稳定排序）。
pub fn peak_hours(sessions: &[SessionRecord]) -> Vec<PeakHour> {
    let mut hours: Vec<PeakHour> = hourly_counts(sessions)
        .into_iter()
        .map(|(hour, count)| PeakHour { hour, count })
        .collect();
    hours.sort_by(|a, b| b.count.cmp(&a.count));
    hours.truncate(5);
    hours
}

fn base_data(sessions: &[SessionRecord], payments: &[PaymentRecord]) -> ReportData {
    ReportData {
        total_cars_parked: sessions.len() as u64,
        total_revenue: payments.iter().map(|payment| payment.amount_paid).sum(),
        // 未结束的会话还没有时长，按 0 计入
        total_duration: sessions
            .iter()
            .map(|session| session.duration_minutes.unwrap_or(0))
            .sum(),
        payment_methods: payment_totals(payments),
        record_ids: sessions.iter().map(|session| session.record_id.clone()).collect(),
        ..ReportData::default()
    }
}

/// 日报统计块。
pub fn daily_data(
    sessions: &[SessionRecord],
    payments: &[PaymentRecord],
    total_slots: u64,
) -> ReportData {
    let mut data = base_data(sessions, payments);
    let counts = hourly_counts(sessions);
    let active_sessions = sessions
        .iter()
        .filter(|session| session.status == SessionStatus::Active)
        .count() as u64;
    let average_occupancy = if total_slots > 0 {
        (active_sessions as f64 / total_slots as f64) * 100.0
    } else {
        0.0
    };
    data.slot_utilization = Some(SlotUtilization {
        total_slots,
        average_occupancy,
        peak_occupancy: counts.values().copied().max().unwrap_or(0),
    });
    data.peak_hours = peak_hours(sessions);
    data
}

/// 月报统计块。
///
/// daily_stats 先按窗口逐日预置零值；窗口外的键一律忽略。
pub fn monthly_data(
    sessions: &[SessionRecord],
    payments: &[PaymentRecord],
    start_ms: i64,
    end_ms: i64,
) -> ReportData {
    let mut data = base_data(sessions, payments);
    let mut daily_stats: BTreeMap<String, DayStat> = window::day_keys_in_window(start_ms, end_ms)
        .into_iter()
        .map(|key| (key, DayStat::default()))
        .collect();
    for session in sessions {
        let key = window::day_key_of_ms(session.entry_time_ms);
        if let Some(stat) = daily_stats.get_mut(&key) {
            stat.cars += 1;
            stat.duration += session.duration_minutes.unwrap_or(0);
        }
    }
    for payment in payments {
        let key = window::day_key_of_ms(payment.payment_date_ms);
        if let Some(stat) = daily_stats.get_mut(&key) {
            stat.revenue += payment.amount_paid;
        }
    }
    data.daily_stats = Some(daily_stats);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SessionStatus;

    fn session(record_id: &str, entry_time_ms: i64, duration: Option<i64>) -> SessionRecord {
        SessionRecord {
            record_id: record_id.into(),
            car_id: "car-1".into(),
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
        }
    }

    fn payment(method: &str, amount: f64) -> PaymentRecord {
        PaymentRecord {
            payment_id: "pay".into(),
            record_id: "rec".into(),
            amount_paid: amount,
            payment_method: method.into(),
            payment_date_ms: 0,
            created_at_ms: 0,
        }
    }

    #[test]
    fn unknown_payment_methods_land_in_other() {
        let payments = [payment("cash", 1_000.0), payment("voucher", 250.0)];
        let data = base_data(&[], &payments);
        assert_eq!(data.payment_methods.cash, 1_000.0);
        assert_eq!(data.payment_methods.other, 250.0);
        let known = data.payment_methods.cash
            + data.payment_methods.mobile_money
            + data.payment_methods.card;
        assert!(known <= data.total_revenue);
        assert_eq!(known + data.payment_methods.other, data.total_revenue);
    }

    #[test]
    fn peak_hours_ties_break_toward_earlier_hour() {
        // 小时 14 两次、8 两次、9 一次：并列时 8 在 14 前
        let sessions = [
            session("a", hour_ms(14), None),
            session("b", hour_ms(14), None),
            session("c", hour_ms(8), None),
            session("d", hour_ms(8), None),
            session("e", hour_ms(9), None),
        ];
        let peaks = peak_hours(&sessions);
        assert_eq!(peaks[0].hour, 8);
        assert_eq!(peaks[1].hour, 14);
        assert_eq!(peaks[2].hour, 9);
    }

    #[test]
    fn zero_slots_reports_zero_occupancy() {
        let sessions = [session("a", hour_ms(8), None)];
        let data = daily_data(&sessions, &[], 0);
        let utilization = data.slot_utilization.expect("utilization");
        assert_eq!(utilization.average_occupancy, 0.0);
        assert_eq!(utilization.peak_occupancy, 1);
    }

    fn hour_ms(hour: i64) -> i64 {
        // 2024-03-15 基准日
        1_710_460_800_000 + hour * 3_600_000
    }
}
