pub mod json_reports;
