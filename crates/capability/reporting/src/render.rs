//! 报表打印页渲染（纯函数）。
//!
//! 把已持久化的报表转换为可直接打印的 HTML 文档：
//! 页眉（机构名 + 标题 + 周期）、四张摘要卡片、支付方式占比表、
//! 高峰时段表（仅日报）、样本记录表（最多 10 条）、双签名框页脚。
//! 不触碰存储，不产生副作用。

use chrono::{DateTime, Utc};
use domain::ReportType;
use smartpark_storage::ReportRecord;
use std::fmt::Write as _;

/// 样本记录行（由调用方解析好车辆/车位后传入）。
#[derive(Debug, Clone)]
pub struct RenderRecord {
    pub plate_number: String,
    pub driver_name: String,
    pub entry_time_ms: i64,
    /// None 表示会话未结束，渲染为 "Active"。
    pub duration_minutes: Option<i64>,
    pub slot_number: String,
}

const ORGANIZATION: &str = "SmartPark Parking Management";
const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.4; } \
.header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #333; padding-bottom: 20px; } \
.logo { font-size: 24px; font-weight: bold; color: #2563eb; margin-bottom: 10px; } \
.report-title { font-size: 20px; margin: 10px 0; } \
.report-period { color: #666; font-size: 14px; } \
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 30px 0; } \
.summary-card { border: 1px solid #ddd; padding: 15px; border-radius: 8px; text-align: center; } \
.summary-card h3 { margin: 0 0 10px 0; color: #333; font-size: 14px; } \
.summary-card .value { font-size: 24px; font-weight: bold; color: #2563eb; } \
.section { margin: 30px 0; } \
.section h2 { border-bottom: 1px solid #ddd; padding-bottom: 10px; font-size: 18px; } \
table { width: 100%; border-collapse: collapse; margin: 15px 0; } \
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; font-size: 12px; } \
th { background-color: #f5f5f5; font-weight: bold; } \
.signature-section { margin-top: 50px; display: flex; justify-content: space-between; } \
.signature-box { border: 1px solid #333; padding: 20px; width: 200px; text-align: center; font-size: 12px; } \
.footer { margin-top: 50px; text-align: center; color: #666; font-size: 10px; } \
@media print { body { margin: 0; } }";

/// HTML 文本转义。
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `March 15, 2024` 风格的日期。
fn format_date(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|at| at.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

fn format_datetime(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

/// `12,500 RWF` 风格的金额（整 RWF，千位分隔）。
fn format_currency(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{grouped} RWF")
    } else {
        format!("{grouped} RWF")
    }
}

/// 占比列：营收为 0 时固定 `0%`，否则保留一位小数。
fn format_percent(amount: f64, total_revenue: f64) -> String {
    if total_revenue > 0.0 {
        format!("{:.1}%", amount / total_revenue * 100.0)
    } else {
        "0%".to_string()
    }
}

/// 渲染打印页。
///
/// `rendered_at_ms` 为页脚的生成时间，由调用方提供以保持本函数无副作用。
pub fn render_report(
    report: &ReportRecord,
    generated_by_username: &str,
    records: &[RenderRecord],
    rendered_at_ms: i64,
) -> String {
    let is_daily = report.report_type == ReportType::Daily;
    let title = if is_daily { "Daily" } else { "Monthly" };
    let period = if is_daily {
        format_date(report.report_date_ms)
    } else {
        format!(
            "{} - {}",
            format_date(report.start_ms),
            format_date(report.end_ms)
        )
    };
    let data = &report.data;

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>{title} Parking Report</title><style>{STYLE}</style></head><body>"
    );
    let _ = write!(
        html,
        "<div class=\"header\"><div class=\"logo\">{ORGANIZATION}</div>\
         <div class=\"report-title\">{title} Activity Report</div>\
         <div class=\"report-period\">{period}</div></div>"
    );

    // 摘要卡片
    let _ = write!(
        html,
        "<div class=\"summary\">\
         <div class=\"summary-card\"><h3>Total Cars Parked</h3><div class=\"value\">{}</div></div>\
         <div class=\"summary-card\"><h3>Total Revenue</h3><div class=\"value\">{}</div></div>\
         <div class=\"summary-card\"><h3>Total Duration</h3><div class=\"value\">{} hours</div></div>",
        data.total_cars_parked,
        format_currency(data.total_revenue),
        (data.total_duration as f64 / 60.0).round() as i64,
    );
    if let Some(utilization) = &data.slot_utilization {
        let _ = write!(
            html,
            "<div class=\"summary-card\"><h3>Average Occupancy</h3>\
             <div class=\"value\">{:.1}%</div></div>",
            utilization.average_occupancy
        );
    }
    html.push_str("</div>");

    // 支付方式占比
    let methods = &data.payment_methods;
    let _ = write!(
        html,
        "<div class=\"section\"><h2>Payment Methods Breakdown</h2><table>\
         <tr><th>Payment Method</th><th>Amount</th><th>Percentage</th></tr>"
    );
    for (label, amount) in [
        ("Cash", methods.cash),
        ("Mobile Money", methods.mobile_money),
        ("Card", methods.card),
        ("Other", methods.other),
    ] {
        let _ = write!(
            html,
            "<tr><td>{label}</td><td>{}</td><td>{}</td></tr>",
            format_currency(amount),
            format_percent(amount, data.total_revenue)
        );
    }
    html.push_str("</table></div>");

    // 高峰时段（仅日报）
    if !data.peak_hours.is_empty() {
        let _ = write!(
            html,
            "<div class=\"section\"><h2>Peak Hours</h2><table>\
             <tr><th>Hour</th><th>Number of Cars</th></tr>"
        );
        for peak in &data.peak_hours {
            let _ = write!(
                html,
                "<tr><td>{}:00 - {}:00</td><td>{}</td></tr>",
                peak.hour,
                peak.hour + 1,
                peak.count
            );
        }
        html.push_str("</table></div>");
    }

    // 样本记录（最多 10 条）
    if !records.is_empty() {
        let _ = write!(
            html,
            "<div class=\"section\"><h2>Recent Parking Records (Sample)</h2><table>\
             <tr><th>Plate Number</th><th>Driver Name</th><th>Entry Time</th>\
             <th>Duration</th><th>Slot</th></tr>"
        );
        for record in records.iter().take(10) {
            let duration = match record.duration_minutes {
                Some(minutes) => format!("{} hrs", (minutes as f64 / 60.0).round() as i64),
                None => "Active".to_string(),
            };
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{duration}</td><td>{}</td></tr>",
                escape(&record.plate_number),
                escape(&record.driver_name),
                format_datetime(record.entry_time_ms),
                escape(&record.slot_number)
            );
        }
        html.push_str("</table></div>");
    }

    // 双签名框
    let _ = write!(
        html,
        "<div class=\"signature-section\">\
         <div class=\"signature-box\"><div>Generated By:</div>\
         <div style=\"margin: 20px 0;\">{}</div>\
         <div>Date: {}</div></div>",
        escape(generated_by_username),
        format_date(report.created_at_ms)
    );
    match &report.signature {
        Some(signature) => {
            let mark = if signature.signature_data.is_empty() {
                "<div style=\"height: 50px;\"></div>".to_string()
            } else {
                "<div style=\"margin: 10px 0; font-style: italic;\">[Digital Signature]</div>"
                    .to_string()
            };
            let _ = write!(
                html,
                "<div class=\"signature-box\"><div>Approved By:</div>{mark}\
                 <div>{}</div><div>{}</div><div>Date: {}</div></div>",
                escape(&signature.signed_by),
                escape(&signature.position),
                format_date(signature.signed_at_ms)
            );
        }
        None => {
            html.push_str(
                "<div class=\"signature-box\"><div>Signature:</div>\
                 <div style=\"height: 50px; border-bottom: 1px solid #333; margin: 20px 0;\"></div>\
                 <div>Name: ________________</div><div>Date: ________________</div></div>",
            );
        }
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        "<div class=\"footer\">\
         <p>This report was generated automatically by {ORGANIZATION}</p>\
         <p>Generated on: {}</p></div></body></html>",
        format_datetime(rendered_at_ms)
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "0 RWF");
        assert_eq!(format_currency(500.0), "500 RWF");
        assert_eq!(format_currency(12_500.0), "12,500 RWF");
        assert_eq!(format_currency(1_234_567.0), "1,234,567 RWF");
    }

    #[test]
    fn percent_guards_zero_revenue() {
        assert_eq!(format_percent(0.0, 0.0), "0%");
        assert_eq!(format_percent(3_000.0, 5_000.0), "60.0%");
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("<b>&\"x\"</b>"), "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;");
    }
}
