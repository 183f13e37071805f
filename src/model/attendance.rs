use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub trainer_id: u64,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:01:12", value_type = String, nullable = true)]
    pub clock_in: Option<NaiveTime>,
    #[schema(example = "17:32:40", value_type = String, nullable = true)]
    pub clock_out: Option<NaiveTime>,
    #[schema(example = 23.8103, nullable = true)]
    pub clock_in_lat: Option<f64>,
    #[schema(example = 90.4125, nullable = true)]
    pub clock_in_lng: Option<f64>,
    #[schema(example = 23.8103, nullable = true)]
    pub clock_out_lat: Option<f64>,
    #[schema(example = 90.4125, nullable = true)]
    pub clock_out_lng: Option<f64>,
}
