//! Sentiment Console
//!
//! Client-side request controller for a remote sentiment classification
//! service, plus the terminal presenter and configuration around it.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod presentation;


pub use client::{AnalysisRequest, AnalysisResult, Classifier, HttpClassifier};
pub use controller::{ControllerState, Phase, RequestController, SubmitOutcome};
pub use error::{ClassifierError, Result};
