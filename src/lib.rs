pub mod config;
pub mod decision;
pub mod directory;
pub mod domain {
    pub mod attempt;
    pub mod decision;
    pub mod payment;
}
pub mod error;
pub mod outcomes {
    pub mod card_pool;
    pub mod phase_plan;
}
pub mod payments;
pub mod report;
pub mod service {
    pub mod orchestrator;
}
