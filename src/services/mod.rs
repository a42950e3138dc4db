pub mod classifier;
pub mod prompts;
pub mod script;
pub mod solver;
pub mod story;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{Classifier, LlmClassifier};
pub use script::{extract_code_block, LlmScriptGenerator, ScriptGenerator};
pub use solver::{LlmSolver, Solver, SolverRegistry};
pub use story::{LlmStoryGenerator, StoryGenerator};
