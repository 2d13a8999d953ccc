// Analysis: the single-flight state machine that drives the matching engine,
// plus its HTTP handlers. All completion calls go through llm_client.

pub mod handlers;
pub mod orchestrator;
pub mod state;
