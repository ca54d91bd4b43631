//! Shared data model for the compliance intelligence service.
//!
//! Types here are split along the same line the spec draws between
//! read-only collaborators (landlords, properties, listings, payments,
//! bookings, compliance events, enforcement actions — produced by external
//! systems) and derived entities this service owns outright (risk scores,
//! area assessments, reports, job history, notifications).

pub mod analytics;
pub mod area;
pub mod booking;
pub mod compliance_event;
pub mod enforcement;
pub mod error;
pub mod hotspot;
pub mod job;
pub mod landlord;
pub mod listing;
pub mod notification;
pub mod payment;
pub mod property;
pub mod report;
pub mod risk;

pub use analytics::{RevenueForecastPoint, SeasonalAnalysis, SeasonalMonthSummary};
pub use area::{AreaAssessment, AreaTrend};
pub use booking::Booking;
pub use compliance_event::{ComplianceEvent, ComplianceEventType};
pub use enforcement::{EnforcementAction, EnforcementTargetType};
pub use error::{CoreError, CoreResult};
pub use hotspot::Hotspot;
pub use job::{JobError, JobHistory, JobStatus};
pub use landlord::{Landlord, PaymentStatus, RegistrationStatus, ResponseTimeSample};
pub use listing::ScrapedListing;
pub use notification::Notification;
pub use payment::{PaymentRecord, TptPaymentStatus};
pub use property::{Property, PropertyRegistrationStatus};
pub use report::{AlertSeverity, Report, ReportAlert, ReportKind, ReportMetric};
pub use risk::{RiskFactor, RiskLevel, RiskScore};
