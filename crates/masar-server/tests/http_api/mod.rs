//! HTTP API integration tests

mod auth_test;
mod catalog_test;
mod classroom_flow_test;
mod health_test;
