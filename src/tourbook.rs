//! Columns of the tour book view and some tours to show them with.

use std::collections::HashMap;

use colprof::column::{ColumnDefinition, ColumnStyle};
use colprof::formatter::ValueFormat;

use crate::ui::{CellValue, Record};

const CATEGORY_TOUR: &str = "Tour";
const CATEGORY_MOTION: &str = "Motion";
const CATEGORY_ALTITUDE: &str = "Altitude";
const CATEGORY_TIME: &str = "Time";
const CATEGORY_BODY: &str = "Body";

pub fn columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("tourDate", ColumnStyle::Lead)
            .label("Date")
            .category(CATEGORY_TOUR)
            .tooltip_text("Start date of the tour")
            .default_width(10)
            .is_visibility_locked(true)
            .is_default_column(true),
        ColumnDefinition::new("tourTitle", ColumnStyle::Lead)
            .label("Title")
            .category(CATEGORY_TOUR)
            .default_width(22)
            .is_default_column(true),
        ColumnDefinition::new("distance", ColumnStyle::Trail)
            .label("Distance")
            .header_text("km")
            .category(CATEGORY_MOTION)
            .unit("km")
            .default_width(9)
            .is_default_column(true)
            .available_formats(vec![
                ValueFormat::Number0,
                ValueFormat::Number1,
                ValueFormat::Number2,
                ValueFormat::Number3,
            ])
            .default_format(ValueFormat::Number1)
            .default_detail_format(ValueFormat::Number3),
        ColumnDefinition::new("altitudeUp", ColumnStyle::Trail)
            .label("Up")
            .header_text("\u{2191} m")
            .category(CATEGORY_ALTITUDE)
            .unit("m")
            .default_width(7),
        ColumnDefinition::new("movingTime", ColumnStyle::Trail)
            .label("Moving")
            .category(CATEGORY_TIME)
            .unit("h")
            .default_width(9)
            .is_default_column(true)
            .available_formats(vec![
                ValueFormat::TimeHh,
                ValueFormat::TimeHhMm,
                ValueFormat::TimeHhMmSs,
            ])
            .default_format(ValueFormat::TimeHhMm)
            .default_detail_format(ValueFormat::TimeHhMmSs),
        ColumnDefinition::new("pace", ColumnStyle::Trail)
            .label("Pace")
            .category(CATEGORY_MOTION)
            .unit("min/km")
            .default_width(7)
            .available_formats(vec![ValueFormat::PaceMmSs])
            .default_format(ValueFormat::PaceMmSs),
        ColumnDefinition::new("calories", ColumnStyle::Trail)
            .label("Calories")
            .category(CATEGORY_BODY)
            .default_width(9)
            .available_formats(vec![ValueFormat::CaloriesCal, ValueFormat::CaloriesKcal])
            .default_format(ValueFormat::CaloriesKcal),
        ColumnDefinition::new("avgPulse", ColumnStyle::Trail)
            .label("Pulse")
            .category(CATEGORY_BODY)
            .unit("bpm")
            .default_width(7)
            .is_resizable(false),
    ]
}

fn tour(
    date: &str,
    title: &str,
    distance: f64,
    altitude_up: i64,
    moving_time: i64,
    calories: i64,
    avg_pulse: i64,
) -> Record {
    let pace = if distance > 0.0 {
        (moving_time as f64 / distance).round() as i64
    } else {
        0
    };

    HashMap::from([
        ("tourDate".to_string(), CellValue::Text(date.to_string())),
        ("tourTitle".to_string(), CellValue::Text(title.to_string())),
        ("distance".to_string(), CellValue::Double(distance)),
        ("altitudeUp".to_string(), CellValue::Long(altitude_up)),
        ("movingTime".to_string(), CellValue::Long(moving_time)),
        ("pace".to_string(), CellValue::Long(pace)),
        ("calories".to_string(), CellValue::Long(calories)),
        ("avgPulse".to_string(), CellValue::Long(avg_pulse)),
    ])
}

pub fn sample_tours() -> Vec<Record> {
    vec![
        tour("2026-05-02", "Lake loop", 42.35, 310, 6_120, 1_250_000, 128),
        tour("2026-05-09", "Pass road", 88.1, 1_740, 15_305, 2_980_000, 141),
        tour("2026-05-16", "Recovery run", 8.02, 45, 2_890, 0, 0),
        tour("2026-05-23", "Ridge hike", 17.6, 1_120, 21_600, 1_840_000, 112),
    ]
}
