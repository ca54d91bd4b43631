use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed booking, used only as lazy aggregate input to the seasonal
/// analyser and revenue forecaster. No other component reads bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_nights: u32,
    pub revenue: f64,
}
