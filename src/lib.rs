pub mod triage_core;
