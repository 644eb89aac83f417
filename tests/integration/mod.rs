//! Integration tests for smconfig

mod jumpstart_catalog;
mod rule_requests;
mod settings_loading;
