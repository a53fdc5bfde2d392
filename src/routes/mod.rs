pub mod auth;
pub mod dashboards;
pub mod health;
pub mod pages;
pub mod session;
