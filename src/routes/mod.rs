pub mod assessments;

pub mod auth;

pub mod classes;

pub mod dashboards;

pub mod frontend;

pub mod reports;

pub mod submissions;

pub use assessments::configure_assessment_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboards::configure_dashboard_routes;
pub use frontend::configure_frontend_routes;
pub use reports::configure_report_routes;
pub use submissions::configure_submission_routes;
