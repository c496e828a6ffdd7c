//! inbox-service: message analysis and reply rewriting on top of an LLM
//! completion API.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod services;
pub mod startup;
