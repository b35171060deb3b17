//! Decision Agent - personal decision support
//!
//! Collects a user profile through an adaptive questionnaire, analyzes
//! decision questions with a tool-using ReAct agent (web search, calculator,
//! probability) and turns the analysis into a probabilistic decision tree.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
