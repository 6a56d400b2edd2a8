//! 车辆 handlers
//!
//! - GET /cars - 分页列出活跃车辆，支持车牌/司机/电话搜索
//! - GET /cars/{id} - 获取车辆详情
//! - GET /cars/plate/{plate} - 按车牌查找
//! - PUT /cars/{id} - 更新司机/电话/车型/颜色
//!
//! 车辆由进场登记自动创建，这里不提供创建接口。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{car_to_dto, not_found_error, storage_error};
use crate::utils::{normalize_optional, page_params, total_pages};
use api_contract::{ApiResponse, CarListResponse, CarsQuery, UpdateCarRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use smartpark_storage::CarUpdate;

#[derive(serde::Deserialize)]
pub struct CarPath {
    car_id: String,
}

#[derive(serde::Deserialize)]
pub struct PlatePath {
    plate_number: String,
}

/// 列出车辆
pub async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarsQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let (page, limit, offset) = page_params(query.page, query.limit);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty());

    let cars = match state.cars.list_cars(search, offset, limit).await {
        Ok(cars) => cars,
        Err(err) => return storage_error(err),
    };
    let total = match state.cars.count_cars(search).await {
        Ok(total) => total,
        Err(err) => return storage_error(err),
    };
    let response = CarListResponse {
        cars: cars.into_iter().map(car_to_dto).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
        total,
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 获取车辆详情
pub async fn get_car(
    State(state): State<AppState>,
    Path(path): Path<CarPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    match state.cars.find_car(&path.car_id).await {
        Ok(Some(car)) => {
            (StatusCode::OK, Json(ApiResponse::success(car_to_dto(car)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 按车牌查找
pub async fn get_car_by_plate(
    State(state): State<AppState>,
    Path(path): Path<PlatePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let plate = path.plate_number.trim().to_uppercase();
    match state.cars.find_by_plate(&plate).await {
        Ok(Some(car)) => {
            (StatusCode::OK, Json(ApiResponse::success(car_to_dto(car)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 更新车辆
pub async fn update_car(
    State(state): State<AppState>,
    Path(path): Path<CarPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateCarRequest>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let driver_name = match normalize_optional(req.driver_name, "driverName") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let phone_number = match normalize_optional(req.phone_number, "phoneNumber") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = CarUpdate {
        driver_name,
        phone_number,
        car_model: req.car_model,
        car_color: req.car_color,
    };
    match state.cars.update_car(&path.car_id, update).await {
        Ok(Some(car)) => {
            (StatusCode::OK, Json(ApiResponse::success(car_to_dto(car)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
