//! Policy evaluation: idle detection and usage ceilings.

mod evaluator;

pub use evaluator::{Decision, Evaluation, PolicyEvaluator};
