//! Service tests for webserver

pub mod claid_client;
pub mod fixtures;
pub mod image_utils;
