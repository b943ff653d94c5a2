use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::scenario::{Scenario, ScenarioCtx};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct ScenarioRunner {
    ctx: ScenarioCtx,
}

impl ScenarioRunner {
    pub const fn new(ctx: ScenarioCtx) -> Self {
        Self { ctx }
    }

    /// Run `scenario` `iterations` times, each on a fresh in-memory store.
    pub async fn run(&self, scenario: &dyn Scenario, iterations: usize) -> ScenarioResult {
        if self.ctx.verbose {
            println!("🧪 Testing scenario: {}", scenario.key().bright_white());
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut timings = Vec::new();

        for i in 0..iterations {
            let start = Instant::now();
            match scenario.run(&self.ctx).await {
                Ok(()) => {
                    successes += 1;
                    let duration = start.elapsed();
                    timings.push(duration);
                    if self.ctx.verbose {
                        println!("  ✅ Iteration {}/{iterations} passed ({duration:?})", i + 1);
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {}: {err:#}", i + 1);
                    if self.ctx.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    log::debug!("{} failed: {err:?}", scenario.key());
                    failures.push(message);
                }
            }
        }

        let average_duration = if timings.is_empty() {
            Duration::ZERO
        } else {
            timings.iter().sum::<Duration>() / u32::try_from(timings.len()).unwrap_or(u32::MAX)
        };

        ScenarioResult {
            scenario_name: scenario.key().to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_micros())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_micros(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::cell::Cell;

    struct Flaky {
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl Scenario for Flaky {
        fn key(&self) -> &'static str {
            "flaky"
        }

        fn description(&self) -> &'static str {
            "fails every other run"
        }

        async fn run(&self, _ctx: &ScenarioCtx) -> Result<()> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            anyhow::ensure!(n % 2 == 0, "odd call {n}");
            Ok(())
        }
    }

    #[tokio::test]
    async fn counts_successes_and_failures() {
        let runner = ScenarioRunner::new(ScenarioCtx::default());
        let scenario = Flaky {
            calls: Cell::new(0),
        };
        let result = runner.run(&scenario, 4).await;
        assert!(!result.passed);
        assert_eq!(result.iterations_run, 4);
        assert_eq!(result.successful_iterations, 2);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("odd call 1"));
    }

    #[tokio::test]
    async fn built_in_scenarios_pass_in_both_checkout_modes() {
        for retain_failed in [false, true] {
            let runner = ScenarioRunner::new(ScenarioCtx {
                retain_failed,
                verbose: false,
            });
            for key in crate::scenario::all_keys() {
                let scenario = crate::scenario::get_scenario(&key).expect("registered");
                let result = runner.run(scenario.as_ref(), 1).await;
                assert!(result.passed, "{key} (retain_failed={retain_failed}): {:?}", result.failures);
            }
        }
    }
}
