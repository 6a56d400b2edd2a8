//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore：用户存储
//! - CarStore：车辆存储
//! - SlotStore：车位存储
//! - SessionStore：停车记录存储
//! - PaymentStore：支付存储
//! - ReportStore：报表存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 报表聚合只读取 Session/Payment/Slot，只写入 Report

use crate::error::StorageError;
use crate::models::{
    CarRecord, CarUpdate, PaymentRecord, ReportRecord, SessionClose, SessionRecord, SlotRecord,
    UserRecord,
};
use async_trait::async_trait;
use domain::{ReportType, SessionStatus, SlotStatus};

/// 用户存储接口
///
/// 提供登录与展示所需的用户查询（禁止在 handler 中直接连 SQL）。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户（仅活跃账户）
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户 ID 查找用户
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 创建新用户；用户名重复时报错
    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;
}

/// 车辆存储接口
#[async_trait]
pub trait CarStore: Send + Sync {
    /// 列出活跃车辆，search 匹配车牌/司机/电话（大小写不敏感子串）
    async fn list_cars(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CarRecord>, StorageError>;

    /// 统计活跃车辆数（与 list_cars 同口径）
    async fn count_cars(&self, search: Option<&str>) -> Result<u64, StorageError>;

    /// 查找指定车辆
    async fn find_car(&self, car_id: &str) -> Result<Option<CarRecord>, StorageError>;

    /// 按车牌查找活跃车辆（车牌已统一大写）
    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<CarRecord>, StorageError>;

    /// 创建新车辆；车牌重复时报错
    async fn create_car(&self, record: CarRecord) -> Result<CarRecord, StorageError>;

    /// 更新车辆明细；不存在时返回 None
    async fn update_car(
        &self,
        car_id: &str,
        update: CarUpdate,
    ) -> Result<Option<CarRecord>, StorageError>;
}

/// 车位存储接口
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// 列出活跃车位，可按状态过滤，按车位号升序
    async fn list_slots(&self, status: Option<SlotStatus>)
    -> Result<Vec<SlotRecord>, StorageError>;

    /// 统计活跃车位数（报表的占用率分母）
    async fn count_active_slots(&self) -> Result<u64, StorageError>;

    /// 查找指定车位
    async fn find_slot(&self, slot_id: &str) -> Result<Option<SlotRecord>, StorageError>;

    /// 按车位号查找活跃车位
    async fn find_by_number(&self, slot_number: &str)
    -> Result<Option<SlotRecord>, StorageError>;

    /// 创建新车位；车位号重复时报错
    async fn create_slot(&self, record: SlotRecord) -> Result<SlotRecord, StorageError>;

    /// 更新车位占用状态；不存在时返回 false
    async fn set_slot_status(
        &self,
        slot_id: &str,
        status: SlotStatus,
    ) -> Result<bool, StorageError>;
}

/// 停车记录存储接口
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 创建进场记录
    async fn create_session(&self, record: SessionRecord)
    -> Result<SessionRecord, StorageError>;

    /// 查找指定记录
    async fn find_session(&self, record_id: &str)
    -> Result<Option<SessionRecord>, StorageError>;

    /// 查找某车辆的活跃会话（防止重复进场）
    async fn find_active_by_car(
        &self,
        car_id: &str,
    ) -> Result<Option<SessionRecord>, StorageError>;

    /// 离场结算：填充结算字段并迁移到 completed。
    /// 记录不存在或已结束时返回 None。
    async fn close_session(
        &self,
        record_id: &str,
        close: SessionClose,
    ) -> Result<Option<SessionRecord>, StorageError>;

    /// 分页列出记录（entry_time 降序），可按状态过滤
    async fn list_sessions(
        &self,
        status: Option<SessionStatus>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SessionRecord>, StorageError>;

    /// 统计记录数（与 list_sessions 同口径）
    async fn count_sessions(&self, status: Option<SessionStatus>) -> Result<u64, StorageError>;

    /// 报表取数：entry_time 落在 [start_ms, end_ms]（双端含）的全部记录，
    /// entry_time 升序
    async fn find_by_entry_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<SessionRecord>, StorageError>;
}

/// 支付存储接口
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// 创建支付记录
    async fn create_payment(&self, record: PaymentRecord)
    -> Result<PaymentRecord, StorageError>;

    /// 分页列出支付（payment_date 降序）
    async fn list_payments(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PaymentRecord>, StorageError>;

    /// 统计支付总数
    async fn count_payments(&self) -> Result<u64, StorageError>;

    /// 报表取数：payment_date 落在 [start_ms, end_ms]（双端含）的全部支付
    async fn find_by_date_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<PaymentRecord>, StorageError>;
}

/// 报表存储接口
///
/// 周期幂等由调用方通过 find_by_period + create/update 组合实现；
/// 本接口不做范围查询。
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 查找指定报表
    async fn find_report(&self, report_id: &str)
    -> Result<Option<ReportRecord>, StorageError>;

    /// 按 (报表类型, 周期键) 查找报表
    async fn find_by_period(
        &self,
        report_type: ReportType,
        period_key: &str,
    ) -> Result<Option<ReportRecord>, StorageError>;

    /// 插入新报表；周期键重复时报错
    async fn create_report(&self, record: ReportRecord) -> Result<ReportRecord, StorageError>;

    /// 按 report_id 整体覆盖报表；不存在时返回 None
    async fn update_report(
        &self,
        record: ReportRecord,
    ) -> Result<Option<ReportRecord>, StorageError>;

    /// 分页列出报表（report_date 降序），可按类型过滤
    async fn list_reports(
        &self,
        report_type: Option<ReportType>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ReportRecord>, StorageError>;

    /// 统计报表数（与 list_reports 同口径）
    async fn count_reports(&self, report_type: Option<ReportType>) -> Result<u64, StorageError>;
}
