//! Prompt templates for each agent mode.
//!
//! Each builder takes the user's question and returns the full prompt text.
//! The templates pin down the reply contract the interpreter expects: plain
//! prose for chat, bare JSON (no code fences) for tool and plan modes.

/// Prompt for plain conversational answers.
///
/// Math questions are refused at the prompt level so the model steers users
/// toward the calculator modes instead of doing arithmetic itself.
pub fn chat_prompt(question: &str) -> String {
    format!(
        r#"You are a helpful assistant. Answer every question in a clear step-by-step manner.

Important rules:
1. If the question involves science, history, reasoning, or explanations → give a step-by-step explanation.
2. If the question involves math calculation (e.g., addition, subtraction, multiplication, division, algebra) → DO NOT solve it. Instead, politely refuse and suggest using a calculator.

Question: {question}
Answer step-by-step:"#
    )
}

/// Prompt for the single-tool mode: prose answers or one calculator action.
pub fn single_tool_prompt(question: &str) -> String {
    format!(
        r#"You are a helpful assistant. You have access to a calculator tool.

Rules:
1. If the question involves science, history, reasoning, or explanations → give a step-by-step explanation.
  output format:
  Question: {question}
  Answer step-by-step:
2. If the question involves math (addition, subtraction, multiplication, division) →
   reply strictly in JSON like this:
   {{
     "action": "use_calculator",
     "expression": "<expression>"
   }}

  or  If the question mixes math with any other request (e.g., "calculate X and also explain Y") →
   reply strictly in JSON like this:
   {{
     "action": "error",
     "message": "Cannot handle multi-step queries yet. Please ask one thing at a time."
   }}

Important:
- The JSON must be valid and parseable.
- Do NOT wrap JSON in markdown code fences.
- For math, always return expressions in symbolic form (e.g., "12+7", "100/5", "(25*4)/2").

Question: {question}"#
    )
}

/// Prompt for the planning mode: the model decomposes the question into an
/// ordered JSON plan over all available actions.
pub fn plan_prompt(question: &str) -> String {
    format!(
        r#"You are a helpful assistant. You have access to:
- a calculator tool (for +, -, *, /)
- a translator tool (English → German)
- your own knowledge (for reasoning, history, science answers).

Rules:
1. Break the user query into ordered steps.
2. For each step, decide one of:
   - "use_calculator" with an expression
   - "use_translator" with a phrase
   - "answer_direct" with a reasoning/explanation
3. Return the entire plan in valid JSON.
4. Do NOT wrap in code fences.

Example:
User: "Translate 'Good Morning' into German and then multiply 5 and 6."
Output:
{{
  "steps": [
    {{"action": "use_translator", "text": "Good Morning"}},
    {{"action": "use_calculator", "expression": "5*6"}}
  ]
}}

User: "What is the capital of Italy, then multiply 12 and 12."
Output:
{{
  "steps": [
    {{"action": "answer_direct", "response": "The capital of Italy is Rome."}},
    {{"action": "use_calculator", "expression": "12*12"}}
  ]
}}

Now process this question strictly in the same JSON structure:

Question: {question}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_embeds_question() {
        let prompt = chat_prompt("Why is the sky blue?");
        assert!(prompt.contains("Question: Why is the sky blue?"));
        assert!(prompt.contains("DO NOT solve it"));
    }

    #[test]
    fn test_single_tool_prompt_shows_action_shape() {
        let prompt = single_tool_prompt("What is 12 + 7?");
        assert!(prompt.contains(r#""action": "use_calculator""#));
        assert!(prompt.contains(r#""action": "error""#));
        assert!(prompt.contains("Question: What is 12 + 7?"));
        // The braces in the JSON examples must render literally.
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_plan_prompt_lists_all_actions() {
        let prompt = plan_prompt("Translate 'cat' and add 1 and 2.");
        assert!(prompt.contains("use_calculator"));
        assert!(prompt.contains("use_translator"));
        assert!(prompt.contains("answer_direct"));
        assert!(prompt.contains(r#""steps""#));
        assert!(prompt.contains("Question: Translate 'cat' and add 1 and 2."));
    }
}
