//! Agent implementation - orchestrates the model <-> tools loop

use serde::Serialize;
use std::path::Path;
use stepwise_core::prompt;
use stepwise_core::{
    complete_with_retry, evaluate, format_number, parse_plan, parse_single_action,
    strip_code_fences, CompletionProvider, ExecutionOutcome, GoogleTranslate, InterpretError,
    LogRecord, Logbook, Plan, Result, RetryPolicy, Step, StepExecutor, TranslateBackend,
};

/// Log file for plain chat interactions
pub const CHAT_LOG_FILE: &str = "chat_interaction_log.jsonl";
/// Log file for single-tool interactions
pub const TOOL_LOG_FILE: &str = "tool_interaction_log.jsonl";
/// Log file for full plan-and-execute interactions
pub const AGENT_LOG_FILE: &str = "agent_interaction_log.jsonl";

/// Configuration for the agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Print progress while working
    pub verbose: bool,
    /// Directory the interaction logs are written to
    pub log_dir: String,
    /// Retry policy for model queries
    pub retry: RetryPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            log_dir: ".".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Result from a plan-and-execute run
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    /// Final answer shown to the user
    pub answer: String,
    /// The interpreted plan, absent when interpretation failed
    pub plan: Option<Plan>,
    /// Per-step outcomes in plan order
    pub outcome: ExecutionOutcome,
}

/// The agent orchestrator: asks the model for a plan and dispatches it to
/// local tools, appending a record of every interaction to the logbook.
pub struct Agent<P: CompletionProvider, T: TranslateBackend> {
    provider: P,
    executor: StepExecutor<T>,
    config: AgentConfig,
}

impl<P: CompletionProvider> Agent<P, GoogleTranslate> {
    /// Create an agent with default configuration
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AgentConfig::default())
    }

    /// Create an agent with custom configuration
    pub fn with_config(provider: P, config: AgentConfig) -> Self {
        let executor = build_executor(GoogleTranslate::new(), config.verbose);
        Self {
            provider,
            executor,
            config,
        }
    }
}

impl<P: CompletionProvider, T: TranslateBackend> Agent<P, T> {
    /// Swap in a different translation backend
    pub fn with_translator<U: TranslateBackend>(self, translator: U) -> Agent<P, U> {
        let executor = build_executor(translator, self.config.verbose);
        Agent {
            provider: self.provider,
            executor,
            config: self.config,
        }
    }

    /// Answer a question conversationally, no tools involved.
    ///
    /// Query failures after all retries become the answer itself rather
    /// than an error, so the interaction is still logged.
    pub async fn chat(&self, question: &str) -> Result<String> {
        let prompt = prompt::chat_prompt(question);

        let answer = match complete_with_retry(&self.provider, &prompt, &self.config.retry).await
        {
            Ok(reply) => reply.trim().to_string(),
            Err(err) => format!(
                "Failed after {} attempts. Error: {}",
                self.config.retry.attempts, err
            ),
        };

        let record = LogRecord::now(question).with_answer(answer.as_str());
        self.logbook(CHAT_LOG_FILE).append(&record)?;

        Ok(answer)
    }

    /// Answer a question that may require one calculator call.
    ///
    /// The model replies with prose or a single JSON action. Prose passes
    /// through untouched, a calculator action runs locally.
    pub async fn solve(&self, question: &str) -> Result<String> {
        let prompt = prompt::single_tool_prompt(question);

        let reply = match complete_with_retry(&self.provider, &prompt, &self.config.retry).await
        {
            Ok(reply) => reply,
            Err(err) => {
                serde_json::json!({"action": "error", "message": err.to_string()}).to_string()
            }
        };

        let answer = match parse_single_action(&reply) {
            Ok(Step::UseCalculator { expression }) => {
                if self.config.verbose {
                    println!("Calculator called with expression: {}", expression);
                }
                match evaluate(&expression) {
                    Ok(value) => format!(
                        "The result of your calculation is: {}",
                        format_number(value)
                    ),
                    Err(err) => format!("Calculator failed: {}", err),
                }
            }
            Ok(Step::Error { message }) => message,
            Ok(other) => format!(
                "Unexpected JSON structure: {}",
                serde_json::to_string(&other).unwrap_or_default()
            ),
            // Prose replies are not JSON at all; they ARE the answer.
            Err(InterpretError::NotJson(text)) => text,
            Err(err) => format!("Unexpected JSON structure: {}", err),
        };

        let record = LogRecord::now(question).with_answer(answer.as_str());
        self.logbook(TOOL_LOG_FILE).append(&record)?;

        Ok(answer)
    }

    /// Run the full plan-and-execute loop for a question.
    ///
    /// The model proposes an ordered plan, each step runs against a local
    /// tool, and the per-step summaries join into the final answer. A reply
    /// that fails interpretation still produces an answer and a log record.
    pub async fn run(&self, question: &str) -> Result<AgentResult> {
        if self.config.verbose {
            println!("Question: {}\n", question);
        }

        let prompt = prompt::plan_prompt(question);

        let reply = match complete_with_retry(&self.provider, &prompt, &self.config.retry).await
        {
            Ok(reply) => reply,
            Err(err) => serde_json::json!({
                "steps": [{"action": "error", "message": err.to_string()}]
            })
            .to_string(),
        };

        match parse_plan(&reply) {
            Ok(plan) => {
                if self.config.verbose {
                    plan.pretty_print();
                }

                let outcome = self.executor.execute(&plan).await;
                let answer = outcome.combined_summary();

                let record = LogRecord::now(question)
                    .with_plan(serde_json::to_value(&plan).unwrap_or_default())
                    .with_results(outcome.clone())
                    .with_answer(answer.as_str());
                self.logbook(AGENT_LOG_FILE).append(&record)?;

                Ok(AgentResult {
                    answer,
                    plan: Some(plan),
                    outcome,
                })
            }
            Err(err) => {
                let detail = match &err {
                    InterpretError::NotJson(text) => text.clone(),
                    other => other.to_string(),
                };
                let answer = format!("Model did not return a valid plan: {}", detail);

                // Log the raw reply in place of a plan so the failure is auditable.
                let record = LogRecord::now(question)
                    .with_plan(serde_json::Value::String(
                        strip_code_fences(&reply).to_string(),
                    ))
                    .with_results(ExecutionOutcome::default())
                    .with_answer(answer.as_str());
                self.logbook(AGENT_LOG_FILE).append(&record)?;

                Ok(AgentResult {
                    answer,
                    plan: None,
                    outcome: ExecutionOutcome::default(),
                })
            }
        }
    }

    fn logbook(&self, file: &str) -> Logbook {
        Logbook::new(Path::new(&self.config.log_dir).join(file))
    }
}

/// Wire a progress printer into the executor when running verbose
fn build_executor<T: TranslateBackend>(translator: T, verbose: bool) -> StepExecutor<T> {
    let executor = StepExecutor::new(translator);
    if verbose {
        executor.with_progress(|index, step| {
            println!("\nStep {}: {:?}", index + 1, step);
        })
    } else {
        executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::{Error, TranslationError};
    use tempfile::TempDir;

    struct ReplyProvider {
        reply: String,
    }

    impl ReplyProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
            }
        }
    }

    impl CompletionProvider for ReplyProvider {
        fn name(&self) -> &str {
            "reply"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    struct FailingProvider;

    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::completion_failed("model offline"))
        }
    }

    struct FixedTranslate;

    impl TranslateBackend for FixedTranslate {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn translate_to_german(&self, text: &str) -> std::result::Result<String, TranslationError> {
            Ok(format!("[de] {}", text))
        }
    }

    fn test_config(dir: &TempDir) -> AgentConfig {
        AgentConfig {
            verbose: false,
            log_dir: dir.path().display().to_string(),
            retry: RetryPolicy::immediate(1),
        }
    }

    fn agent_with_reply(
        dir: &TempDir,
        reply: &str,
    ) -> Agent<ReplyProvider, FixedTranslate> {
        Agent::with_config(ReplyProvider::new(reply), test_config(dir))
            .with_translator(FixedTranslate)
    }

    #[tokio::test]
    async fn test_run_executes_plan_and_logs() {
        let dir = TempDir::new().unwrap();
        let reply = r#"{
            "steps": [
                {"action": "use_translator", "text": "Good Morning"},
                {"action": "use_calculator", "expression": "5*6"}
            ]
        }"#;
        let agent = agent_with_reply(&dir, reply);

        let result = agent
            .run("Translate 'Good Morning' into German and then multiply 5 and 6.")
            .await
            .unwrap();

        assert!(result
            .answer
            .contains("Translation: 'Good Morning' → '[de] Good Morning'"));
        assert!(result.answer.contains("Calculator result: 5*6 = 30.0"));
        assert_eq!(result.plan.as_ref().unwrap().len(), 2);
        assert_eq!(result.outcome.failed(), 0);

        let records = Logbook::new(dir.path().join(AGENT_LOG_FILE))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].plan.is_some());
        assert_eq!(records[0].results.as_ref().unwrap().len(), 2);
        assert_eq!(records[0].answer.as_deref(), Some(result.answer.as_str()));
    }

    #[tokio::test]
    async fn test_run_accepts_fenced_plans() {
        let dir = TempDir::new().unwrap();
        let reply = "```json\n{\"steps\": [{\"action\": \"use_calculator\", \"expression\": \"5*6\"}]}\n```";
        let agent = agent_with_reply(&dir, reply);

        let result = agent.run("Multiply 5 and 6.").await.unwrap();

        assert_eq!(result.answer, "Calculator result: 5*6 = 30.0");
        assert_eq!(result.outcome.succeeded(), 1);
    }

    #[tokio::test]
    async fn test_run_isolates_step_failures() {
        let dir = TempDir::new().unwrap();
        let reply = r#"{
            "steps": [
                {"action": "use_calculator", "expression": "5/0"},
                {"action": "answer_direct", "response": "All good."}
            ]
        }"#;
        let agent = agent_with_reply(&dir, reply);

        let result = agent.run("Divide 5 by 0, then reassure me.").await.unwrap();

        assert!(result
            .answer
            .contains("Error executing step: division by zero is not allowed"));
        assert!(result.answer.contains("Answer: All good."));
        assert_eq!(result.outcome.succeeded(), 1);
        assert_eq!(result.outcome.failed(), 1);
    }

    #[tokio::test]
    async fn test_run_logs_uninterpretable_replies() {
        let dir = TempDir::new().unwrap();
        let agent = agent_with_reply(&dir, "I cannot help with that.");

        let result = agent.run("Do something.").await.unwrap();

        assert!(result
            .answer
            .starts_with("Model did not return a valid plan:"));
        assert!(result.answer.contains("I cannot help with that."));
        assert!(result.plan.is_none());
        assert!(result.outcome.is_empty());

        let records = Logbook::new(dir.path().join(AGENT_LOG_FILE))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].plan,
            Some(serde_json::Value::String(
                "I cannot help with that.".to_string()
            ))
        );
        assert!(records[0].results.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_turns_query_failure_into_error_step() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.retry = RetryPolicy::immediate(2);
        let agent =
            Agent::with_config(FailingProvider, config).with_translator(FixedTranslate);

        let result = agent.run("Anything at all.").await.unwrap();

        assert!(result.answer.contains("Model error:"));
        assert!(result.answer.contains("model offline"));
        assert_eq!(result.outcome.failed(), 1);
        assert_eq!(result.plan.as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_trims_and_logs() {
        let dir = TempDir::new().unwrap();
        let agent = agent_with_reply(&dir, "  The sky scatters blue light.  \n");

        let answer = agent.chat("Why is the sky blue?").await.unwrap();
        assert_eq!(answer, "The sky scatters blue light.");

        let records = Logbook::new(dir.path().join(CHAT_LOG_FILE))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "Why is the sky blue?");
        assert_eq!(
            records[0].answer.as_deref(),
            Some("The sky scatters blue light.")
        );
    }

    #[tokio::test]
    async fn test_chat_reports_retry_exhaustion() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.retry = RetryPolicy::immediate(2);
        let agent =
            Agent::with_config(FailingProvider, config).with_translator(FixedTranslate);

        let answer = agent.chat("Hello?").await.unwrap();
        assert!(answer.starts_with("Failed after 2 attempts. Error:"));
        assert!(answer.contains("model offline"));

        let records = Logbook::new(dir.path().join(CHAT_LOG_FILE))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_solve_runs_the_calculator() {
        let dir = TempDir::new().unwrap();
        let agent =
            agent_with_reply(&dir, r#"{"action": "use_calculator", "expression": "12+7"}"#);

        let answer = agent.solve("What is 12 + 7?").await.unwrap();
        assert_eq!(answer, "The result of your calculation is: 19.0");

        let records = Logbook::new(dir.path().join(TOOL_LOG_FILE))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_solve_reports_calculator_failures() {
        let dir = TempDir::new().unwrap();
        let agent =
            agent_with_reply(&dir, r#"{"action": "use_calculator", "expression": "10/0"}"#);

        let answer = agent.solve("What is 10 / 0?").await.unwrap();
        assert!(answer.starts_with("Calculator failed:"));
        assert!(answer.contains("division by zero"));
    }

    #[tokio::test]
    async fn test_solve_passes_prose_through() {
        let dir = TempDir::new().unwrap();
        let agent = agent_with_reply(&dir, "Rome was founded in 753 BC.");

        let answer = agent.solve("When was Rome founded?").await.unwrap();
        assert_eq!(answer, "Rome was founded in 753 BC.");
    }

    #[tokio::test]
    async fn test_solve_surfaces_model_error_actions() {
        let dir = TempDir::new().unwrap();
        let agent = agent_with_reply(
            &dir,
            r#"{"action": "error", "message": "Cannot handle multi-step queries yet. Please ask one thing at a time."}"#,
        );

        let answer = agent.solve("Calculate 2+2 and explain gravity.").await.unwrap();
        assert_eq!(
            answer,
            "Cannot handle multi-step queries yet. Please ask one thing at a time."
        );
    }

    #[tokio::test]
    async fn test_solve_flags_unexpected_actions() {
        let dir = TempDir::new().unwrap();
        let agent =
            agent_with_reply(&dir, r#"{"action": "use_translator", "text": "hello"}"#);

        let answer = agent.solve("Translate hello.").await.unwrap();
        assert!(answer.starts_with("Unexpected JSON structure:"));
        assert!(answer.contains("use_translator"));
    }
}
