/// Knobs for one run. Built by the caller (the CLI fills it from flags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Seed for `Random` and `Math.random`. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Echo each consumed scanner token into the console, as a terminal
    /// shows what the user typed.
    pub echo_input: bool,
    /// Prompt used when no literal prompt precedes any scanner read.
    pub generic_prompt: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            echo_input: true,
            generic_prompt: "Program input".to_string(),
        }
    }
}

impl RunConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_echo(mut self, echo_input: bool) -> Self {
        self.echo_input = echo_input;
        self
    }
}
